//! Health signalling subsystem.
//!
//! # Data Flow
//! ```text
//! Orchestrator:
//!     set_live(true) before construction → set_ready(true) after bind
//!
//! Shutdown coordinator:
//!     set_ready(false) first → teardown → set_live(false) last
//!
//! Probe endpoints (probes.rs):
//!     GET /health/live, GET /health/ready → 200 or 503
//! ```
//!
//! # Design Decisions
//! - Liveness and readiness are independent booleans, never merged
//! - Readiness is only up while liveness is up
//! - HealthSignal is an injected capability, not a global static

pub mod probes;
pub mod signal;

pub use signal::HealthSignal;
