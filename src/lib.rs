//! HTTP proxy for a Google Cloud Storage bucket.

pub mod auth;
pub mod config;
pub mod error;
pub mod gcs;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::ProxyConfig;
pub use error::{ProxyError, Result};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
