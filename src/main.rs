//! GCS Bucket Proxy
//!
//! Serves objects from a single Cloud Storage bucket over plain HTTP,
//! authenticating to the backend with service-account tokens fetched
//! from the instance metadata endpoint.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌───────────────────────────────────────────────┐
//!                    │                 BUCKET PROXY                   │
//!                    │                                                │
//!   Client Request   │  ┌─────────┐   ┌──────────┐   ┌────────────┐  │
//!   ─────────────────┼─▶│  http   │──▶│   gcs    │──▶│  metadata  │  │
//!                    │  │ server  │   │  client  │   │   lookup   │  │
//!                    │  └─────────┘   └────┬─────┘   └─────┬──────┘  │
//!                    │                     │               │         │
//!                    │                ┌────▼─────┐   ┌─────▼──────┐  │       Cloud
//!                    │                │  token   │   │  content   │◀─┼────── Storage
//!                    │                │  cache   │   │  download  │  │       backend
//!                    │                └────┬─────┘   └─────┬──────┘  │
//!                    │                     │               │         │
//!   Client Response  │  ┌─────────┐        │         ┌─────▼──────┐  │
//!   ◀────────────────┼──│ headers │◀───────┴─────────│  buffered  │  │
//!                    │  │translate│                  │ or stream  │  │
//!                    │  └─────────┘                  └────────────┘  │
//!                    │                                                │
//!                    │  Cross-cutting: config, observability,         │
//!                    │  lifecycle (graceful shutdown)                 │
//!                    └───────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod auth;
pub mod config;
pub mod error;
pub mod gcs;
pub mod http;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::load_config;
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "gcs-proxy", about = "HTTP proxy for a Cloud Storage bucket")]
struct Args {
    /// Optional TOML configuration file; environment variables override it.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gcs_proxy=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("gcs-proxy v0.1.0 starting");

    // Missing bucket is a fatal startup condition; load_config rejects it.
    let config = load_config(args.config.as_deref())?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        bucket = %config.gcs.bucket,
        streaming = config.gcs.streaming,
        excluded_headers = config.headers.exclude.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            crate::observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();

    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
