//! OS signal handling.
//!
//! # Responsibilities
//! - Register termination signal handlers (SIGTERM, SIGINT)
//! - Translate the first signal into a coordinator trigger
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - Installed before any dependency construction, so a termination request
//!   arriving during slow startup is still handled
//! - Repeated signals are no-ops; the coordinator trigger is idempotent
//! - Only termination signals are handled, nothing else

use std::sync::Arc;

use crate::lifecycle::shutdown::ShutdownCoordinator;

/// Install the termination handler on the current runtime.
///
/// Spawns a task that waits for SIGTERM or SIGINT and runs the shutdown
/// sequence on its own execution context, independent of the main routine.
pub fn install(coordinator: Arc<ShutdownCoordinator>) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;

        tokio::spawn(async move {
            tokio::select! {
                _ = sigterm.recv() => tracing::info!("SIGTERM received"),
                _ = sigint.recv() => tracing::info!("SIGINT received"),
            }
            coordinator.trigger().await;
        });
    }

    #[cfg(not(unix))]
    {
        tokio::spawn(async move {
            if let Err(error) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %error, "Failed to listen for Ctrl+C");
                return;
            }
            tracing::info!("Ctrl+C received");
            coordinator.trigger().await;
        });
    }

    Ok(())
}
