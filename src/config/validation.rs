//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, interval > 0)
//! - Check the gateway URL is an http(s) URL
//!
//! Returns all validation errors, not just the first.

use crate::config::schema::ClientConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
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

/// Validate a parsed configuration.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match url::Url::parse(&config.gateway.rpc_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::new(
            "gateway.rpc_url",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(
            "gateway.rpc_url",
            format!("invalid URL: {}", e),
        )),
    }

    if config.gateway.request_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "gateway.request_timeout_secs",
            "must be greater than 0",
        ));
    }

    if config.polling.interval_secs == 0 {
        errors.push(ValidationError::new(
            "polling.interval_secs",
            "must be greater than 0",
        ));
    }

    if config.polling.max_attempts == Some(0) {
        errors.push(ValidationError::new(
            "polling.max_attempts",
            "must be greater than 0 when set",
        ));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<std::net::SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            "must be a socket address",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
