//! Execution result publishing.

use serde_json::json;
use uuid::Uuid;

use crate::config::PublicationConfig;
use crate::service::events::{Event, EventRouter, EventStatus};
use crate::service::exec::ExecutionOutcome;

/// Publishes execution results as events correlated to the root event.
#[derive(Clone)]
pub struct MessagePublisher {
    events: EventRouter,
    config: PublicationConfig,
}

impl MessagePublisher {
    pub fn new(events: EventRouter, config: PublicationConfig) -> Self {
        Self { events, config }
    }

    /// Publish one execution outcome. No-op when publication is disabled.
    pub fn publish_result(&self, parent: Uuid, outcome: &ExecutionOutcome) {
        if !self.config.enabled {
            return;
        }
        let status = if outcome.success() {
            EventStatus::Passed
        } else {
            EventStatus::Failed
        };
        let body = json!({
            "host": outcome.host,
            "username": outcome.username,
            "port": outcome.port,
            "command": outcome.command,
            "exit_code": outcome.exit_code,
            "timed_out": outcome.timed_out,
            "stdout": outcome.stdout,
            "stderr": outcome.stderr,
        });
        self.events.publish(Event::child(
            parent,
            format!("execution '{}'", outcome.alias),
            status,
            body,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn outcome() -> ExecutionOutcome {
        ExecutionOutcome {
            alias: "uptime".to_string(),
            host: "localhost".to_string(),
            username: "exec".to_string(),
            port: 22,
            command: "uptime".to_string(),
            exit_code: Some(0),
            stdout: "up".to_string(),
            stderr: String::new(),
            timed_out: false,
            include_output: true,
        }
    }

    #[tokio::test]
    async fn publishes_result_as_child_event() {
        let (tx, mut rx) = mpsc::channel(4);
        let publisher = MessagePublisher::new(EventRouter::new(tx), PublicationConfig::default());
        let root = Uuid::new_v4();

        publisher.publish_result(root, &outcome());

        let event = rx.recv().await.unwrap();
        assert_eq!(event.parent_id, Some(root));
        assert_eq!(event.status, EventStatus::Passed);
        assert_eq!(event.body["exit_code"], 0);
        assert_eq!(event.body["username"], "exec");
        assert_eq!(event.body["port"], 22);
    }

    #[tokio::test]
    async fn disabled_publication_emits_nothing() {
        let (tx, mut rx) = mpsc::channel(4);
        let config = PublicationConfig {
            enabled: false,
            ..Default::default()
        };
        let publisher = MessagePublisher::new(EventRouter::new(tx), config);

        publisher.publish_result(Uuid::new_v4(), &outcome());

        assert!(rx.try_recv().is_err());
    }
}
