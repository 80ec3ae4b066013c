//! Configuration loading from disk and environment.

use std::env;
use std::fs;
use std::path::Path;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Env { name: &'static str, value: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Env { name, value } => {
                write!(f, "Invalid value for {}: {:?}", name, value)
            }
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration.
///
/// Values come from the optional TOML file first, then environment
/// variables override individual fields. The bucket must be present
/// from one of the two sources.
pub fn load_config(path: Option<&Path>) -> Result<ProxyConfig, ConfigError> {
    let mut config: ProxyConfig = match path {
        Some(p) => {
            let content = fs::read_to_string(p).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => ProxyConfig::default(),
    };

    apply_env_overrides(&mut config)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment variables onto the loaded configuration.
///
/// Variable names follow the deployment contract: `GCS_BUCKET`,
/// `GCS_PROXY_STREAMING` (integer, positive enables),
/// `GCS_PROXY_HEADER_EXCEPTION` (comma-separated names),
/// `GCS_PROXY_BIND`, `GCS_PROXY_TOKEN_MAX_AGE`,
/// `GCS_PROXY_STORAGE_ENDPOINT`, `GCS_PROXY_TOKEN_ENDPOINT`,
/// `GCS_PROXY_METRICS` (address, presence enables the exporter).
fn apply_env_overrides(config: &mut ProxyConfig) -> Result<(), ConfigError> {
    if let Ok(bucket) = env::var("GCS_BUCKET") {
        config.gcs.bucket = bucket;
    }
    if let Ok(value) = env::var("GCS_PROXY_STREAMING") {
        let flag: i64 = value.trim().parse().map_err(|_| ConfigError::Env {
            name: "GCS_PROXY_STREAMING",
            value: value.clone(),
        })?;
        config.gcs.streaming = flag > 0;
    }
    if let Ok(value) = env::var("GCS_PROXY_HEADER_EXCEPTION") {
        config.headers.exclude = value
            .split(',')
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
    }
    if let Ok(value) = env::var("GCS_PROXY_BIND") {
        config.listener.bind_address = value;
    }
    if let Ok(value) = env::var("GCS_PROXY_TOKEN_MAX_AGE") {
        config.gcs.token_max_age_secs =
            value.trim().parse().map_err(|_| ConfigError::Env {
                name: "GCS_PROXY_TOKEN_MAX_AGE",
                value: value.clone(),
            })?;
    }
    if let Ok(value) = env::var("GCS_PROXY_STORAGE_ENDPOINT") {
        config.gcs.storage_endpoint = value;
    }
    if let Ok(value) = env::var("GCS_PROXY_TOKEN_ENDPOINT") {
        config.gcs.token_endpoint = value;
    }
    if let Ok(value) = env::var("GCS_PROXY_METRICS") {
        config.observability.metrics_enabled = true;
        if !value.is_empty() {
            config.observability.metrics_address = value;
        }
    }
    Ok(())
}
