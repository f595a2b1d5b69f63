//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → handed to the orchestrator at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::AppConfig;
pub use schema::ConnectionConfig;
pub use schema::ExecutionConfig;
pub use schema::PublicationConfig;
pub use schema::ReportingConfig;
pub use schema::ServerConfig;
pub use schema::ServiceConfig;
pub use validation::{validate_config, ValidationError};
