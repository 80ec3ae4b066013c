//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the bucket proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Cloud Storage backend settings.
    pub gcs: GcsConfig,

    /// Response header translation settings.
    pub headers: HeaderConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Cloud Storage backend settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GcsConfig {
    /// Bucket every object path is resolved against. Required; startup
    /// fails when empty.
    pub bucket: String,

    /// Base URL of the storage JSON API.
    pub storage_endpoint: String,

    /// URL of the instance metadata token endpoint.
    pub token_endpoint: String,

    /// Seconds a fetched token is reused before being replaced. Kept
    /// well under typical token lifetimes so a token is never presented
    /// close to its expiry.
    pub token_max_age_secs: u64,

    /// Deliver object bodies as a chunk stream instead of buffering.
    pub streaming: bool,

    /// Chunk size in bytes for streaming delivery.
    pub chunk_size: usize,
}

impl Default for GcsConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            storage_endpoint: "https://www.googleapis.com".to_string(),
            token_endpoint:
                "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token"
                    .to_string(),
            token_max_age_secs: 60,
            streaming: false,
            chunk_size: 4096,
        }
    }
}

/// Response header translation settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HeaderConfig {
    /// Backend header names dropped from responses. Matched exactly
    /// (case-sensitive) against the lower-case wire name.
    pub exclude: Vec<String>,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Inbound request timeout in seconds. Covers the time to first
    /// byte of the response; a streaming body may outlive it.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable the Prometheus metrics exporter.
    pub metrics_enabled: bool,

    /// Address the metrics exporter listens on.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
