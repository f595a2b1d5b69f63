//! HTTP server with bounded-time graceful shutdown.
//!
//! # Responsibilities
//! - Bind the listener and begin accepting connections
//! - Wire up middleware (request timeout, tracing)
//! - Drain in-flight requests on stop, forcing termination past the deadline
//!
//! The lifecycle is encoded in the types: [`GracefulServer`] is the created
//! state, [`RunningServer`] the running one, and a consumed
//! [`RunningServer::stop`] leaves the server stopped either gracefully or
//! forcefully.

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

/// The configured bind address could not be claimed. Fatal; never retried.
#[derive(Debug, Error)]
#[error("failed to bind {addr}: {source}")]
pub struct BindError {
    pub addr: String,
    #[source]
    source: std::io::Error,
}

/// A server that has not started yet.
pub struct GracefulServer {
    config: ServerConfig,
}

impl GracefulServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Bind the configured address and begin serving `app`.
    pub async fn start(self, app: Router) -> Result<RunningServer, BindError> {
        let bind_error = |source| BindError {
            addr: self.config.bind_address.clone(),
            source,
        };
        let listener = TcpListener::bind(&self.config.bind_address)
            .await
            .map_err(bind_error)?;
        let local_addr = listener.local_addr().map_err(bind_error)?;

        let app = app
            .layer(TimeoutLayer::new(Duration::from_secs(
                self.config.request_timeout_secs,
            )))
            .layer(TraceLayer::new_for_http());

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(async move {
            let drain = async move {
                let _ = shutdown_rx.wait_for(|stop| *stop).await;
            };
            if let Err(error) = axum::serve(listener, app)
                .with_graceful_shutdown(drain)
                .await
            {
                tracing::error!(error = %error, "Server error");
            }
        });

        tracing::info!(address = %local_addr, "Server started");
        Ok(RunningServer {
            local_addr,
            shutdown_tx,
            task,
        })
    }
}

/// A bound, accepting server.
pub struct RunningServer {
    local_addr: SocketAddr,
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl RunningServer {
    /// The address the listener actually bound.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop the server: stop accepting, let in-flight requests finish for up
    /// to `grace_period`, then abort whatever remains. Always completes.
    pub async fn stop(mut self, grace_period: Duration) {
        tracing::info!(grace = ?grace_period, "Stopping server, draining in-flight requests");
        self.shutdown_tx.send_replace(true);

        match tokio::time::timeout(grace_period, &mut self.task).await {
            Ok(joined) => {
                if let Err(error) = joined {
                    tracing::error!(error = %error, "Server task failed during drain");
                } else {
                    tracing::info!("Server stopped gracefully");
                }
            }
            Err(_) => {
                tracing::warn!("Server did not stop gracefully, forcing termination");
                crate::observability::metrics::record_forced_stop();
                self.task.abort();
                let _ = (&mut self.task).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use std::time::Instant;

    fn config(port: u16) -> ServerConfig {
        ServerConfig {
            bind_address: format!("127.0.0.1:{port}"),
            request_timeout_secs: 30,
        }
    }

    fn app_with_delay(delay: Duration) -> Router {
        Router::new().route(
            "/slow",
            get(move || async move {
                tokio::time::sleep(delay).await;
                "done"
            }),
        )
    }

    #[tokio::test]
    async fn bind_failure_is_reported() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = taken.local_addr().unwrap().port();

        let result = GracefulServer::new(config(port))
            .start(Router::new())
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn stop_without_inflight_work_is_graceful() {
        let running = GracefulServer::new(config(0))
            .start(Router::new())
            .await
            .unwrap();

        let started = Instant::now();
        running.stop(Duration::from_secs(1)).await;

        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn short_inflight_work_finishes_within_grace() {
        let running = GracefulServer::new(config(0))
            .start(app_with_delay(Duration::from_millis(100)))
            .await
            .unwrap();
        let url = format!("http://{}/slow", running.local_addr());

        // Build the client up front: constructing one inside the spawned task
        // can take longer than the sleep below, leaving no request in flight.
        let client = reqwest::Client::new();
        let request = tokio::spawn(async move { client.get(url).send().await });
        tokio::time::sleep(Duration::from_millis(20)).await;

        let started = Instant::now();
        running.stop(Duration::from_secs(2)).await;
        let elapsed = started.elapsed();

        assert!(elapsed < Duration::from_secs(1), "stop took {elapsed:?}");
        let response = request.await.unwrap().unwrap();
        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn long_inflight_work_is_forced_at_the_deadline() {
        let running = GracefulServer::new(config(0))
            .start(app_with_delay(Duration::from_secs(30)))
            .await
            .unwrap();
        let url = format!("http://{}/slow", running.local_addr());

        // Build the client up front: constructing one inside the spawned task
        // can take longer than the sleep below, leaving no request in flight.
        let client = reqwest::Client::new();
        let request = tokio::spawn(async move { client.get(url).send().await });
        tokio::time::sleep(Duration::from_millis(50)).await;

        let grace = Duration::from_millis(200);
        let started = Instant::now();
        running.stop(grace).await;
        let elapsed = started.elapsed();

        assert!(elapsed >= grace, "stop returned before the deadline");
        assert!(elapsed < Duration::from_secs(2), "forced stop took {elapsed:?}");
        // The aborted request never completes cleanly.
        assert!(request.await.unwrap().is_err());
    }
}
