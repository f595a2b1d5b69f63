//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check execution aliases are unique (case-insensitive)
//! - Validate value ranges (timeouts > 0, non-blank connection fields)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::AppConfig;

/// A single semantic configuration problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("at least one execution must be configured")]
    NoExecutions,

    #[error("execution aliases are case-insensitive, collision on '{0}'")]
    AliasCollision(String),

    #[error("execution '{0}' has an empty command")]
    EmptyCommand(String),

    #[error("connection host must not be blank")]
    BlankHost,

    #[error("connection username must not be blank")]
    BlankUsername,

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Validate the full configuration, collecting every problem found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let service = &config.service;

    if service.executions.is_empty() {
        errors.push(ValidationError::NoExecutions);
    }

    let mut seen = Vec::new();
    for exec in &service.executions {
        let lowered = exec.alias.to_lowercase();
        if seen.contains(&lowered) {
            errors.push(ValidationError::AliasCollision(exec.alias.clone()));
        } else {
            seen.push(lowered);
        }
        if exec.command.trim().is_empty() {
            errors.push(ValidationError::EmptyCommand(exec.alias.clone()));
        }
        if exec.timeout_ms == 0 {
            errors.push(ValidationError::ZeroTimeout("execution timeout_ms"));
        }
    }

    if service.connection.host.trim().is_empty() {
        errors.push(ValidationError::BlankHost);
    }
    if service.connection.username.trim().is_empty() {
        errors.push(ValidationError::BlankUsername);
    }
    if service.connection.stop_wait_timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout("connection stop_wait_timeout_ms"));
    }
    if config.shutdown.grace_period_ms == 0 {
        errors.push(ValidationError::ZeroTimeout("shutdown grace_period_ms"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
