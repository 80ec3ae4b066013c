//! Backend authentication subsystem.
//!
//! # Data Flow
//! ```text
//! request handler needs a backend call
//!     → token.rs (load cached credential, refresh when stale)
//!     → Authorization: Bearer <token> on the outbound request
//! ```
//!
//! # Design Decisions
//! - One credential per process, shared lock-free by every handler
//! - Staleness check and refresh are deliberately non-atomic; two
//!   racing refreshes both succeed and the last store wins

pub mod token;

pub use token::{Credential, TokenCache};
