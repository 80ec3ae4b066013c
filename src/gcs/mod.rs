//! Outbound Cloud Storage access.
//!
//! # Data Flow
//! ```text
//! proxy handler
//!     → client.rs (shared HTTP client, path encoding, authed GET)
//!     → metadata.rs (object resource lookup, JSON)
//!     → content.rs (media download, buffered or chunk stream)
//! ```

pub mod client;
pub mod content;
pub mod metadata;

pub use client::GcsClient;
pub use content::{BufferedContent, ContentStream, StreamingContent};
pub use metadata::ObjectMetadata;

/// User-Agent presented on every outbound call, token refreshes included.
pub const USER_AGENT: &str = "GCS Proxy";
