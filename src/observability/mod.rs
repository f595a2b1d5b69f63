//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters for executions, releases, forced stops)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape, separate port)
//! ```
//!
//! # Design Decisions
//! - Metrics are cheap (atomic increments) and optional
//! - Liveness/readiness live in the health subsystem, not here

pub mod logging;
pub mod metrics;
