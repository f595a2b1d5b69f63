//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Install signal handler → liveness up → construct + register each
//!     dependency → start server → readiness up → block
//!
//! Shutdown (shutdown.rs):
//!     Trigger → readiness down → wake main → release registry in reverse
//!     → liveness down
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → coordinator trigger (idempotent)
//! ```
//!
//! # Design Decisions
//! - Ordered startup: factory first, then service, then the server
//! - Ordered shutdown: strict reverse of acquisition (registry.rs)
//! - Release failures never abort the remaining releases
//! - Forced server stop after the grace period, never an error

pub mod registry;
pub mod shutdown;
pub mod signals;
pub mod startup;

pub use registry::ResourceRegistry;
pub use shutdown::{ShutdownCoordinator, ShutdownSignal};
pub use startup::{FatalError, Orchestrator, RunOutcome};
