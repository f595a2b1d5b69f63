use std::path::Path;

use exec_gateway::config;
use exec_gateway::lifecycle::{Orchestrator, RunOutcome};
use exec_gateway::observability;

#[tokio::main]
async fn main() {
    observability::logging::init_tracing("exec_gateway=info,tower_http=info");

    tracing::info!("exec-gateway v0.1.0 starting");

    let config_path = std::env::var("EXEC_GATEWAY_CONFIG")
        .unwrap_or_else(|_| "exec-gateway.toml".to_string());
    let config = match config::load_config(Path::new(&config_path)) {
        Ok(config) => config,
        Err(error) => {
            tracing::error!(path = %config_path, error = %error, "Fatal error: failed to load configuration");
            std::process::exit(1);
        }
    };

    tracing::info!(
        bind_address = %config.server.bind_address,
        grace_period_ms = config.shutdown.grace_period_ms,
        executions = config.service.executions.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => observability::metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    match Orchestrator::new(config).run().await {
        Ok(RunOutcome::ShutdownRequested) => {
            tracing::info!("Shutdown complete");
        }
        Err(error) => {
            tracing::error!(error = %error, "Fatal error");
            std::process::exit(1);
        }
    }
}
