//! The command execution service.
//!
//! Resolves a configured alias, substitutes parameters into the command
//! template, runs the command under its deadline, and publishes the result.
//! The transport is local process execution; remote transports plug in behind
//! the same configuration without touching the orchestration around it.

use std::collections::HashMap;
use std::process::Output;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;
use uuid::Uuid;

use crate::config::{ConnectionConfig, ExecutionConfig};
use crate::lifecycle::registry::BoxError;
use crate::service::publisher::MessagePublisher;

/// Result of one execution.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ExecutionOutcome {
    pub alias: String,
    pub host: String,
    pub username: String,
    pub port: u16,
    pub command: String,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
    /// Whether the configured execution allows output in the response.
    pub include_output: bool,
}

impl ExecutionOutcome {
    pub fn success(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }
}

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("unknown execution alias '{0}'")]
    UnknownAlias(String),

    #[error("missing parameter '{name}' for execution '{alias}'")]
    MissingParameter { alias: String, name: String },

    #[error("failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("execution service is closed")]
    Closed,
}

pub struct ExecutionService {
    connection: ConnectionConfig,
    executions: HashMap<String, ExecutionConfig>,
    publisher: MessagePublisher,
    closed: AtomicBool,
    in_flight: watch::Sender<usize>,
}

impl ExecutionService {
    pub fn new(
        connection: ConnectionConfig,
        executions: Vec<ExecutionConfig>,
        publisher: MessagePublisher,
    ) -> Self {
        let executions = executions
            .into_iter()
            .map(|exec| (exec.alias.to_lowercase(), exec))
            .collect();
        let (in_flight, _) = watch::channel(0);
        tracing::info!(
            host = %connection.host,
            username = %connection.username,
            port = connection.port,
            "Execution service ready"
        );
        Self {
            connection,
            executions,
            publisher,
            closed: AtomicBool::new(false),
            in_flight,
        }
    }

    /// Run the execution registered under `alias` and publish the outcome.
    ///
    /// Parameters supplement and override the configured defaults. The
    /// command is bounded by the execution's deadline; exceeding it kills the
    /// child and reports a timed-out outcome rather than an error.
    pub async fn execute(
        &self,
        alias: &str,
        parameters: &HashMap<String, String>,
        parent: Uuid,
    ) -> Result<ExecutionOutcome, ExecError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ExecError::Closed);
        }
        let execution = self
            .executions
            .get(&alias.to_lowercase())
            .ok_or_else(|| ExecError::UnknownAlias(alias.to_string()))?;

        let command = render_template(execution, parameters)?;
        tracing::debug!(alias = %execution.alias, command = %command, "Executing command");

        let _guard = InFlightGuard::enter(&self.in_flight);
        let deadline = Duration::from_millis(execution.timeout_ms);
        let outcome = match tokio::time::timeout(deadline, run_local(&command)).await {
            Ok(Ok(output)) => self.outcome_from_output(execution, command, output),
            Ok(Err(source)) => return Err(ExecError::Spawn { command, source }),
            Err(_) => {
                tracing::warn!(alias = %execution.alias, deadline = ?deadline, "Execution timed out");
                ExecutionOutcome {
                    alias: execution.alias.clone(),
                    host: self.connection.host.clone(),
                    username: self.connection.username.clone(),
                    port: self.connection.port,
                    command,
                    exit_code: None,
                    stdout: String::new(),
                    stderr: String::new(),
                    timed_out: true,
                    include_output: execution.add_output_to_response,
                }
            }
        };

        crate::observability::metrics::record_execution(&outcome.alias, outcome.success());
        self.publisher.publish_result(parent, &outcome);
        Ok(outcome)
    }

    /// Stop accepting executions, then wait for the in-flight ones to finish,
    /// bounded by the configured stop-wait timeout.
    pub async fn close(&self) -> Result<(), BoxError> {
        self.closed.store(true, Ordering::SeqCst);
        let wait = Duration::from_millis(self.connection.stop_wait_timeout_ms);
        let mut rx = self.in_flight.subscribe();
        match tokio::time::timeout(wait, rx.wait_for(|count| *count == 0)).await {
            Ok(_) => tracing::info!("Execution service closed"),
            Err(_) => {
                let remaining = *self.in_flight.borrow();
                tracing::warn!(
                    remaining,
                    wait = ?wait,
                    "Executions still in flight after the stop-wait deadline"
                );
            }
        }
        Ok(())
    }

    fn outcome_from_output(
        &self,
        execution: &ExecutionConfig,
        command: String,
        output: Output,
    ) -> ExecutionOutcome {
        ExecutionOutcome {
            alias: execution.alias.clone(),
            host: self.connection.host.clone(),
            username: self.connection.username.clone(),
            port: self.connection.port,
            command,
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            timed_out: false,
            include_output: execution.add_output_to_response,
        }
    }
}

/// Counts an execution as in flight until dropped, covering the timeout and
/// spawn-failure paths too.
struct InFlightGuard {
    counter: watch::Sender<usize>,
}

impl InFlightGuard {
    fn enter(counter: &watch::Sender<usize>) -> Self {
        counter.send_modify(|count| *count += 1);
        Self {
            counter: counter.clone(),
        }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.counter.send_modify(|count| *count -= 1);
    }
}

async fn run_local(command: &str) -> std::io::Result<Output> {
    tokio::process::Command::new("sh")
        .arg("-c")
        .arg(command)
        .kill_on_drop(true)
        .output()
        .await
}

/// Substitute `${name}` placeholders from defaults merged with request
/// parameters. Placeholder names are collected from the template before any
/// substitution happens, so parameter values containing `${` pass through
/// verbatim instead of being misread as placeholders.
fn render_template(
    execution: &ExecutionConfig,
    parameters: &HashMap<String, String>,
) -> Result<String, ExecError> {
    let mut merged = execution.default_parameters.clone();
    merged.extend(parameters.clone());

    let missing = |name: &str| ExecError::MissingParameter {
        alias: execution.alias.clone(),
        name: name.to_string(),
    };

    let mut rendered = String::with_capacity(execution.command.len());
    let mut rest = execution.command.as_str();
    while let Some(start) = rest.find("${") {
        rendered.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after.find('}').ok_or_else(|| missing(after))?;
        let name = &after[..end];
        let value = merged.get(name).ok_or_else(|| missing(name))?;
        rendered.push_str(value);
        rest = &after[end + 1..];
    }
    rendered.push_str(rest);
    Ok(rendered)
}
