//! Business-logic collaborators the orchestrator constructs and hands off.
//!
//! # Data Flow
//! ```text
//! Orchestrator
//!     → ServiceFactory (event channel + drain worker)   [registered]
//!     → EventRouter (factory-owned handle)
//!     → MessagePublisher (publication config)
//!     → ExecutionService (aliases, templates, deadlines) [registered]
//!     → ExecHandler (service + events + root id + reporting)
//!     → Router served by the graceful server
//! ```
//!
//! # Design Decisions
//! - The orchestrator only sees construction and close; request handling
//!   stays behind the handler interface
//! - Events are correlated to a root id minted once per process lifetime
//! - Transport is local process execution; remote transports are out of scope

pub mod events;
pub mod exec;
pub mod factory;
pub mod handler;
pub mod publisher;

pub use events::{Event, EventRouter, EventStatus};
pub use exec::{ExecError, ExecutionOutcome, ExecutionService};
pub use factory::ServiceFactory;
pub use handler::ExecHandler;
pub use publisher::MessagePublisher;
