//! Process lifecycle subsystem.
//!
//! # Design Decisions
//! - One broadcast channel fans the shutdown signal out to the server
//!   and any background tasks
//! - Streaming responses in flight finish on their own; graceful
//!   shutdown stops accepting, it does not sever open downloads

pub mod shutdown;

pub use shutdown::Shutdown;
