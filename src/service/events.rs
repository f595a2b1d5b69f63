//! Outbound event types and the router seam.
//!
//! Every event produced during the process lifetime hangs off the root
//! correlation event minted at startup, so downstream tracing can stitch the
//! whole run together. The bus the events ultimately land on is outside this
//! crate; the router only guarantees ordered, non-blocking handoff.

use serde::Serialize;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Outcome attached to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Passed,
    Failed,
}

/// A single outbound event.
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub status: EventStatus,
    pub body: serde_json::Value,
}

impl Event {
    /// The root correlation event, published once at startup.
    pub fn root(name: &str, id: Uuid) -> Self {
        Self {
            id,
            parent_id: None,
            name: name.to_string(),
            status: EventStatus::Passed,
            body: serde_json::json!({ "kind": "root" }),
        }
    }

    /// A child event correlated to `parent`.
    pub fn child(
        parent: Uuid,
        name: impl Into<String>,
        status: EventStatus,
        body: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            parent_id: Some(parent),
            name: name.into(),
            status,
            body,
        }
    }
}

/// Cloneable handle for publishing events to the factory-owned worker.
#[derive(Debug, Clone)]
pub struct EventRouter {
    tx: mpsc::Sender<Event>,
}

impl EventRouter {
    pub(crate) fn new(tx: mpsc::Sender<Event>) -> Self {
        Self { tx }
    }

    /// Queue an event without blocking the caller. A full or closed queue
    /// drops the event with a warning; publication is best-effort.
    pub fn publish(&self, event: Event) {
        if let Err(error) = self.tx.try_send(event) {
            tracing::warn!(error = %error, "Dropping outbound event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_events_carry_the_parent_id() {
        let root = Uuid::new_v4();
        let event = Event::child(root, "execution", EventStatus::Failed, serde_json::json!({}));
        assert_eq!(event.parent_id, Some(root));
        assert_ne!(event.id, root);
    }

    #[tokio::test]
    async fn publish_is_non_blocking_when_queue_is_full() {
        let (tx, _rx) = mpsc::channel(1);
        let router = EventRouter::new(tx);
        let root = Uuid::new_v4();

        router.publish(Event::root("Root", root));
        // Queue is full now; this must not block or panic.
        router.publish(Event::child(root, "dropped", EventStatus::Passed, serde_json::json!({})));
    }
}
