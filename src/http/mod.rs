//! HTTP serving subsystem.
//!
//! # Data Flow
//! ```text
//! Orchestrator
//!     → GracefulServer::start (bind, spawn accept loop)
//!     → RunningServer registered with the resource registry
//!
//! Shutdown drain
//!     → RunningServer::stop(grace_period)
//!     → graceful within the deadline, forced after it
//! ```
//!
//! # Design Decisions
//! - Bind failure is fatal and never retried
//! - Forced termination is a warning, not an error; stop always completes
//! - Middleware: per-request timeout and HTTP tracing

pub mod server;

pub use server::{BindError, GracefulServer, RunningServer};
