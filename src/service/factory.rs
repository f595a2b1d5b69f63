//! Foundational factory context.
//!
//! The first dependency the orchestrator constructs. It owns the outbound
//! event channel and its drain worker; closing the factory flushes whatever
//! is queued and stops the worker. Downstream components only ever see
//! cloneable [`EventRouter`] handles.

use std::sync::Mutex;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::config::PublicationConfig;
use crate::lifecycle::registry::BoxError;
use crate::service::events::{Event, EventRouter};

pub struct ServiceFactory {
    events: EventRouter,
    closed_tx: watch::Sender<bool>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl ServiceFactory {
    pub fn new(publication: &PublicationConfig) -> Self {
        let (tx, mut rx) = mpsc::channel::<Event>(publication.queue_capacity.max(1));
        let (closed_tx, mut closed_rx) = watch::channel(false);
        let session = publication.session_alias.clone();

        let worker = tokio::spawn(async move {
            loop {
                tokio::select! {
                    maybe = rx.recv() => match maybe {
                        Some(event) => emit(&session, &event),
                        None => break,
                    },
                    _ = closed_rx.wait_for(|closed| *closed) => {
                        // Flush what is already queued, then stop.
                        while let Ok(event) = rx.try_recv() {
                            emit(&session, &event);
                        }
                        break;
                    }
                }
            }
            tracing::debug!("Event worker stopped");
        });

        Self {
            events: EventRouter::new(tx),
            closed_tx,
            worker: Mutex::new(Some(worker)),
        }
    }

    /// Handle for publishing outbound events. Owned by the factory; callers
    /// get clones and never register it separately.
    pub fn event_router(&self) -> EventRouter {
        self.events.clone()
    }

    /// Flush queued events and stop the worker. Safe to call once via the
    /// resource registry.
    pub async fn close(&self) -> Result<(), BoxError> {
        self.closed_tx.send_replace(true);
        let handle = {
            let mut worker = match self.worker.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            worker.take()
        };
        if let Some(handle) = handle {
            handle.await.map_err(|e| Box::new(e) as BoxError)?;
        }
        tracing::info!("Service factory closed");
        Ok(())
    }
}

fn emit(session: &str, event: &Event) {
    match serde_json::to_string(event) {
        Ok(payload) => {
            tracing::info!(target: "exec_gateway::events", session, %payload, "event")
        }
        Err(error) => tracing::warn!(error = %error, "Failed to serialize event"),
    }
}
