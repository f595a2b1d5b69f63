//! Startup orchestration.
//!
//! # Responsibilities
//! - Install the termination handler before anything else
//! - Initialize all dependencies in order, registering each as it is created
//! - Start the server last (traffic only when ready)
//! - Block the main routine until shutdown is signaled
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, but everything registered before
//!   the failing step is still released exactly once
//! - Dependencies initialize in order, not concurrently
//! - Readiness flips only after the listener is bound and accepting

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;
use uuid::Uuid;

use crate::config::{validate_config, AppConfig, ConfigError};
use crate::health::HealthSignal;
use crate::http::{BindError, GracefulServer};
use crate::lifecycle::registry::{BoxError, ResourceRegistry};
use crate::lifecycle::shutdown::{ShutdownCoordinator, ShutdownSignal};
use crate::lifecycle::signals;
use crate::service::{Event, ExecHandler, ExecutionService, MessagePublisher, ServiceFactory};

/// How a successful run ended.
#[derive(Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// A termination request arrived and teardown completed. Exit 0.
    ShutdownRequested,
}

/// A startup failure. Logged at the top level, process exits 1.
#[derive(Debug, Error)]
pub enum FatalError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Bind(#[from] BindError),

    #[error("failed to initialize {resource}: {source}")]
    Dependency {
        resource: &'static str,
        source: BoxError,
    },
}

/// The composition root: owns the lifecycle primitives and brings the
/// process up and down in a deterministic order.
pub struct Orchestrator {
    config: AppConfig,
    health: HealthSignal,
    registry: Arc<ResourceRegistry>,
    signal: Arc<ShutdownSignal>,
    coordinator: Arc<ShutdownCoordinator>,
    bound: watch::Sender<Option<SocketAddr>>,
}

impl Orchestrator {
    pub fn new(config: AppConfig) -> Self {
        let health = HealthSignal::new();
        let registry = Arc::new(ResourceRegistry::new());
        let signal = Arc::new(ShutdownSignal::new());
        let coordinator = Arc::new(ShutdownCoordinator::new(
            health.clone(),
            Arc::clone(&registry),
            Arc::clone(&signal),
        ));
        let (bound, _) = watch::channel(None);
        Self {
            config,
            health,
            registry,
            signal,
            coordinator,
            bound,
        }
    }

    /// Handle to the process health flags, for probes and tests.
    pub fn health(&self) -> HealthSignal {
        self.health.clone()
    }

    /// Handle to the shutdown coordinator, for programmatic termination.
    pub fn coordinator(&self) -> Arc<ShutdownCoordinator> {
        Arc::clone(&self.coordinator)
    }

    /// Handle to the resource registry.
    pub fn registry(&self) -> Arc<ResourceRegistry> {
        Arc::clone(&self.registry)
    }

    /// Observe the address the listener actually bound. Stays `None` until
    /// the server starts; matters when the configured port is 0.
    pub fn bound_address(&self) -> watch::Receiver<Option<SocketAddr>> {
        self.bound.subscribe()
    }

    /// Bring the process up, block until shutdown is signaled, and tear down.
    ///
    /// Returns [`RunOutcome::ShutdownRequested`] on the normal exit-0 path.
    /// Any startup failure releases whatever was already constructed and
    /// surfaces as a [`FatalError`].
    pub async fn run(self) -> Result<RunOutcome, FatalError> {
        signals::install(Arc::clone(&self.coordinator)).map_err(|source| {
            FatalError::Dependency {
                resource: "signal handler",
                source: Box::new(source),
            }
        })?;

        // Alive before any construction begins: the process is "alive but
        // not ready" for the whole, possibly slow, startup.
        self.health.set_live(true);

        match self.start_all().await {
            Ok(()) => {
                self.health.set_ready(true);
                tracing::info!("exec-gateway started");

                self.signal.wait().await;
                tracing::info!("Main routine woken, waiting for teardown");
                self.coordinator.wait_drained().await;
                Ok(RunOutcome::ShutdownRequested)
            }
            Err(fatal) => {
                // Release everything registered so far; the coordinator makes
                // this exactly-once even if a signal races the failure.
                self.coordinator.trigger().await;
                Err(fatal)
            }
        }
    }

    /// The construction sequence. Every dependency is registered with the
    /// resource registry before the next step runs.
    async fn start_all(&self) -> Result<(), FatalError> {
        // Foundational factory context.
        let factory = Arc::new(ServiceFactory::new(&self.config.service.publication));
        {
            let factory = Arc::clone(&factory);
            self.registry
                .register("service-factory", move || async move {
                    factory.close().await
                });
        }

        // Probe routes, backed by the injected health capability.
        let probes = crate::health::probes::router(self.health.clone());

        // Outbound event router: owned by the factory, not registered.
        let events = factory.event_router();

        // Typed configuration for the downstream service.
        validate_config(&self.config).map_err(ConfigError::Validation)?;
        let service_config = &self.config.service;

        // Business-logic service and its publisher.
        let publisher = MessagePublisher::new(events.clone(), service_config.publication.clone());
        let service = Arc::new(ExecutionService::new(
            service_config.connection.clone(),
            service_config.executions.clone(),
            publisher,
        ));
        {
            let service = Arc::clone(&service);
            self.registry
                .register("execution-service", move || async move {
                    service.close().await
                });
        }

        // Root correlation id; every event of this process hangs off it.
        let root_id = Uuid::new_v4();
        events.publish(Event::root(&service_config.reporting.root_name, root_id));
        tracing::info!(root_id = %root_id, "Root correlation event published");

        let handler = ExecHandler::new(
            service,
            events,
            root_id,
            service_config.reporting.clone(),
        );

        // Server starts last; its stop action is the first thing released.
        let app = handler.router().merge(probes);
        let running = GracefulServer::new(self.config.server.clone())
            .start(app)
            .await?;
        self.bound.send_replace(Some(running.local_addr()));
        let grace_period = Duration::from_millis(self.config.shutdown.grace_period_ms);
        self.registry.register("http-server", move || async move {
            running.stop(grace_period).await;
            Ok(())
        });

        Ok(())
    }
}
