//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_executions_total` (counter): executions by alias and outcome
//! - `gateway_release_failures_total` (counter): failed resource releases
//! - `gateway_forced_stops_total` (counter): server stops past the grace period
//!
//! # Design Decisions
//! - Exposition on a separate port, enabled by config
//! - Recording is fire-and-forget; a missing recorder is a no-op

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter started"),
        Err(error) => tracing::error!(error = %error, "Failed to start metrics exporter"),
    }
}

pub fn record_execution(alias: &str, success: bool) {
    let outcome = if success { "success" } else { "failure" };
    metrics::counter!(
        "gateway_executions_total",
        "alias" => alias.to_string(),
        "outcome" => outcome,
    )
    .increment(1);
}

pub fn record_release_failure(resource: &str) {
    metrics::counter!(
        "gateway_release_failures_total",
        "resource" => resource.to_string(),
    )
    .increment(1);
}

pub fn record_forced_stop() {
    metrics::counter!("gateway_forced_stops_total").increment(1);
}
