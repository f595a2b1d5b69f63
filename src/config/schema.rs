//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Root configuration for the gateway process.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration (bind address, request timeout).
    pub server: ServerConfig,

    /// Shutdown configuration (grace period for in-flight requests).
    pub shutdown: ShutdownConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Downstream execution service configuration.
    pub service: ServiceConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Shutdown configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ShutdownConfig {
    /// How long in-flight requests get to finish before the server is
    /// terminated forcefully, in milliseconds.
    pub grace_period_ms: u64,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            grace_period_ms: 1_000,
        }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Whether to expose Prometheus metrics.
    pub metrics_enabled: bool,

    /// Address for the metrics exposition endpoint.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Configuration for the downstream execution service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Target connection parameters.
    pub connection: ConnectionConfig,

    /// Named executions the service accepts. Must not be empty.
    pub executions: Vec<ExecutionConfig>,

    /// Outbound event publication settings.
    pub publication: PublicationConfig,

    /// Reporting settings (root event name, error detail).
    pub reporting: ReportingConfig,
}

/// Connection parameters for the execution target.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Target host, recorded on every execution outcome for correlation.
    pub host: String,

    /// Username the executions run as.
    pub username: String,

    /// Target port.
    pub port: u16,

    /// How long close waits for in-flight executions to finish, in
    /// milliseconds.
    pub stop_wait_timeout_ms: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            username: "exec".to_string(),
            port: 22,
            stop_wait_timeout_ms: 10_000,
        }
    }
}

/// A single named execution.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExecutionConfig {
    /// Unique alias clients use to invoke this execution.
    /// Aliases are case-insensitive.
    pub alias: String,

    /// Command template. `${name}` placeholders are substituted from
    /// default parameters merged with per-request parameters.
    pub command: String,

    /// Parameter defaults, overridable per request.
    #[serde(default)]
    pub default_parameters: HashMap<String, String>,

    /// Whether captured stdout/stderr are included in the response.
    #[serde(default = "default_add_output")]
    pub add_output_to_response: bool,

    /// Execution deadline in milliseconds.
    #[serde(default = "default_execution_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_add_output() -> bool {
    true
}

fn default_execution_timeout_ms() -> u64 {
    5_000
}

/// Outbound event publication settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PublicationConfig {
    /// Whether execution results are published as events.
    pub enabled: bool,

    /// Session alias attached to every published event.
    pub session_alias: String,

    /// Capacity of the outbound event queue.
    pub queue_capacity: usize,
}

impl Default for PublicationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            session_alias: "exec-gateway".to_string(),
            queue_capacity: 64,
        }
    }
}

/// Reporting settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportingConfig {
    /// Name of the root correlation event published at startup.
    pub root_name: String,

    /// Whether error details are attached to failure events.
    pub add_error_details: bool,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            root_name: "ExecGateway".to_string(),
            add_error_details: true,
        }
    }
}
