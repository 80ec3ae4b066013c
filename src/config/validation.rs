//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check required fields that defaults cannot supply (bucket)
//! - Validate value ranges and address/URL syntax
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::ProxyConfig;

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingBucket,
    InvalidBindAddress(String),
    InvalidEndpoint { field: &'static str, value: String },
    ZeroChunkSize,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingBucket => {
                write!(f, "gcs.bucket is required (set GCS_BUCKET)")
            }
            ValidationError::InvalidBindAddress(addr) => {
                write!(f, "listener.bind_address is not a socket address: {:?}", addr)
            }
            ValidationError::InvalidEndpoint { field, value } => {
                write!(f, "{} is not a valid URL: {:?}", field, value)
            }
            ValidationError::ZeroChunkSize => write!(f, "gcs.chunk_size must be positive"),
        }
    }
}

/// Validate the configuration, collecting every failure.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.gcs.bucket.is_empty() {
        errors.push(ValidationError::MissingBucket);
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    for (field, value) in [
        ("gcs.storage_endpoint", &config.gcs.storage_endpoint),
        ("gcs.token_endpoint", &config.gcs.token_endpoint),
    ] {
        if url::Url::parse(value).is_err() {
            errors.push(ValidationError::InvalidEndpoint {
                field,
                value: value.clone(),
            });
        }
    }

    if config.gcs.chunk_size == 0 {
        errors.push(ValidationError::ZeroChunkSize);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
