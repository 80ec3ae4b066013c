//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → structured log events (tracing, initialized in main)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through all log events via the trace layer
//! - Metric updates are cheap (atomic increments); recording without an
//!   installed exporter is a no-op, so tests need no setup

pub mod metrics;
