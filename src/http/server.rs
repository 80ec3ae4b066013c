//! HTTP server setup and request orchestration.
//!
//! # Responsibilities
//! - Create Axum Router with the object and liveness routes
//! - Wire up middleware (tracing, timeout, request ID)
//! - Dispatch requests through the fetch pipeline:
//!   resolve path → metadata → content → header translation → response
//! - Map backend failures to HTTP status codes

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderValue, Request},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::auth::TokenCache;
use crate::config::ProxyConfig;
use crate::error::ProxyError;
use crate::gcs::GcsClient;
use crate::http::headers;
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub gcs: Arc<GcsClient>,
    pub streaming: bool,
    pub exclude: Arc<Vec<String>>,
}

/// HTTP server for the bucket proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Self {
        let http = reqwest::Client::new();
        let tokens = Arc::new(TokenCache::new(
            http.clone(),
            config.gcs.token_endpoint.clone(),
            Duration::from_secs(config.gcs.token_max_age_secs),
        ));
        let gcs = Arc::new(GcsClient::new(http, tokens, &config.gcs));

        let state = AppState {
            gcs,
            streaming: config.gcs.streaming,
            exclude: Arc::new(config.headers.exclude.clone()),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route("/", get(default_route))
            .route("/{*path}", get(proxy_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TraceLayer::new_for_http())
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    ))),
            )
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            bucket = %self.config.gcs.bucket,
            streaming = self.config.gcs.streaming,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Request ID maker (UUID v4), set on the request and echoed back.
#[derive(Clone, Copy, Default)]
struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = uuid::Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Object proxy handler.
///
/// Orchestrates the fetch pipeline and converts any failure into a
/// status plus a short plaintext body.
async fn proxy_handler(State(state): State<AppState>, Path(path): Path<String>) -> Response {
    let start = Instant::now();

    match serve_object(&state, &path).await {
        Ok(response) => {
            metrics::record_request("GET", response.status().as_u16(), start);
            response
        }
        Err(e) => {
            let status = e.status_code();
            tracing::warn!(path = %path, status = %status, error = %e, "Request failed");
            metrics::record_request("GET", status.as_u16(), start);
            (status, e.to_string()).into_response()
        }
    }
}

async fn serve_object(state: &AppState, path: &str) -> crate::error::Result<Response> {
    let metadata = state.gcs.fetch_metadata(path).await?;
    tracing::debug!(
        object = %metadata.name,
        size = ?metadata.size_bytes(),
        "Object resolved"
    );

    let last_modified = headers::reformat_updated(&metadata.updated)?;
    let last_modified = HeaderValue::from_str(&last_modified)
        .map_err(|_| ProxyError::Format(metadata.updated.clone()))?;
    let extras = [(header::LAST_MODIFIED, last_modified)];

    let response = if state.streaming {
        let content = state.gcs.fetch_streaming(path).await?;
        let outgoing = headers::translate(&content.headers, &state.exclude, &extras);
        let mut response = Response::new(Body::from_stream(content.stream));
        *response.headers_mut() = outgoing;
        response
    } else {
        let content = state.gcs.fetch_buffered(path).await?;
        let outgoing = headers::translate(&content.headers, &state.exclude, &extras);
        let mut response = Response::new(Body::from(content.body));
        *response.headers_mut() = outgoing;
        response
    };

    Ok(response)
}

/// Liveness route. No backend interaction.
async fn default_route() -> &'static str {
    "OK"
}
