//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the service URL can carry the API paths
//! - Validate value ranges (delays > 0, max >= base)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>
//! - Runs before a client is built from the config

use std::fmt;

use url::Url;

use crate::config::schema::{ClientConfig, RetryStrategy};

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Check `config` for semantic errors.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.url.trim().is_empty() {
        errors.push(ValidationError::new("url", "must not be empty"));
    } else {
        match Url::parse(&config.url) {
            Ok(url) if url.cannot_be_a_base() => {
                errors.push(ValidationError::new("url", "must be a base URL such as http://host:port"));
            }
            Ok(_) => {}
            Err(e) => errors.push(ValidationError::new("url", format!("invalid URL: {}", e))),
        }
    }

    if config.token.is_empty() {
        errors.push(ValidationError::new("token", "must not be empty"));
    }

    let retry = &config.retry;
    match retry.strategy {
        RetryStrategy::Fixed if retry.delay_secs == 0 => {
            errors.push(ValidationError::new("retry.delay_secs", "must be greater than 0"));
        }
        RetryStrategy::Exponential if retry.base_delay_ms == 0 => {
            errors.push(ValidationError::new("retry.base_delay_ms", "must be greater than 0"));
        }
        RetryStrategy::Exponential if retry.max_delay_ms < retry.base_delay_ms => {
            errors.push(ValidationError::new(
                "retry.max_delay_ms",
                "must not be smaller than retry.base_delay_ms",
            ));
        }
        _ => {}
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
