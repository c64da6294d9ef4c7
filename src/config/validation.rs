//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("server.name is required")]
    MissingServerName,
    #[error("limits.max_line_length must be greater than zero")]
    ZeroLineLength,
    #[error("limits.sendq must be greater than zero")]
    ZeroSendq,
    #[error("limits.write_timeout_secs must be greater than zero")]
    ZeroWriteTimeout,
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.name.is_empty() {
        errors.push(ValidationError::MissingServerName);
    }

    let limits = &config.limits;
    if limits.max_line_length == 0 {
        errors.push(ValidationError::ZeroLineLength);
    }
    // tokio's mpsc::channel panics on zero capacity.
    if limits.sendq == 0 {
        errors.push(ValidationError::ZeroSendq);
    }
    if limits.write_timeout_secs == 0 {
        errors.push(ValidationError::ZeroWriteTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
