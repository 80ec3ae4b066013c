//! HTTP serving subsystem.
//!
//! # Data Flow
//! ```text
//! GET /{object_path}
//!     → server.rs (Axum setup, request ID, dispatch)
//!     → gcs fetchers (metadata, then content)
//!     → headers.rs (exclusion list + computed Last-Modified)
//!     → response to client
//! ```

pub mod headers;
pub mod server;

pub use server::{AppState, HttpServer};
