//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional TOML file (--config)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (environment variable overrides)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → shared by value into the server at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no hot reload
//! - Environment variables win over file values, matching how the
//!   proxy is deployed (container env is the primary interface)
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::GcsConfig;
pub use schema::HeaderConfig;
pub use schema::ListenerConfig;
pub use schema::ProxyConfig;
