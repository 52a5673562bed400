//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (limits > 0, addresses parse)
//!
//! Returns every validation error, not just the first.

use std::net::{IpAddr, SocketAddr};

use thiserror::Error;

use crate::config::schema::LogItConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("log_dir must not be empty")]
    EmptyLogDir,

    #[error("bind_host {0:?} is not an IP address")]
    InvalidBindHost(String),

    #[error("max_body_bytes must be greater than zero")]
    ZeroBodyLimit,

    #[error("request_timeout_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("metrics_address {0:?} is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Check a configuration before it is accepted into the system.
pub fn validate_config(config: &LogItConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.log_dir.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyLogDir);
    }

    if config.bind_host.parse::<IpAddr>().is_err() {
        errors.push(ValidationError::InvalidBindHost(config.bind_host.clone()));
    }

    if config.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if config.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if config.metrics_enabled && config.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
