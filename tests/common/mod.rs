//! Shared utilities for integration testing.
//!
//! Stands up mock identity and storage services on ephemeral ports so
//! the proxy under test talks to real HTTP endpoints.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;

use gcs_proxy::config::ProxyConfig;
use gcs_proxy::{HttpServer, Shutdown};

pub const TOKEN_PATH: &str = "/computeMetadata/v1/instance/service-accounts/default/token";

/// Start a mock token endpoint. Returns its address and a counter of
/// refresh calls.
pub async fn start_identity_endpoint() -> (SocketAddr, Arc<AtomicU32>) {
    start_identity_endpoint_with_status(StatusCode::OK).await
}

/// Start a mock token endpoint answering with the given status.
pub async fn start_identity_endpoint_with_status(
    status: StatusCode,
) -> (SocketAddr, Arc<AtomicU32>) {
    let refreshes = Arc::new(AtomicU32::new(0));
    let counter = refreshes.clone();

    let app = Router::new().route(
        TOKEN_PATH,
        get(move |headers: HeaderMap| {
            let counter = counter.clone();
            async move {
                assert_eq!(
                    headers.get("metadata-flavor").map(|v| v.as_bytes()),
                    Some(b"Google".as_slice()),
                    "token request must carry Metadata-Flavor: Google"
                );
                let n = counter.fetch_add(1, Ordering::SeqCst);
                if status != StatusCode::OK {
                    return (status, "no token for you").into_response();
                }
                Json(json!({
                    "access_token": format!("test-token-{}", n),
                    "expires_in": 3599,
                    "token_type": "Bearer",
                }))
                .into_response()
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, refreshes)
}

/// One object served by the mock storage backend.
#[derive(Clone)]
pub struct MockObject {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub updated: &'static str,
    pub extra_headers: Vec<(&'static str, &'static str)>,
    /// When set, both metadata and media calls answer with this status.
    pub fail_status: Option<StatusCode>,
}

impl MockObject {
    pub fn text(body: &'static str) -> Self {
        Self {
            bytes: body.as_bytes().to_vec(),
            content_type: "text/plain",
            updated: "2021-06-01T12:00:00.123Z",
            extra_headers: Vec::new(),
            fail_status: None,
        }
    }
}

#[derive(Clone)]
struct StorageState {
    bucket: &'static str,
    objects: Arc<HashMap<String, MockObject>>,
    metadata_calls: Arc<AtomicU32>,
    media_calls: Arc<AtomicU32>,
}

/// Handle to a running mock storage backend.
pub struct StorageMock {
    pub addr: SocketAddr,
    pub metadata_calls: Arc<AtomicU32>,
    pub media_calls: Arc<AtomicU32>,
}

/// Start a mock storage backend serving the given objects.
pub async fn start_storage_backend(
    bucket: &'static str,
    objects: HashMap<String, MockObject>,
) -> StorageMock {
    let metadata_calls = Arc::new(AtomicU32::new(0));
    let media_calls = Arc::new(AtomicU32::new(0));
    let state = StorageState {
        bucket,
        objects: Arc::new(objects),
        metadata_calls: metadata_calls.clone(),
        media_calls: media_calls.clone(),
    };

    let app = Router::new()
        .route("/storage/v1/b/{bucket}/o/{object}", get(storage_handler))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    StorageMock {
        addr,
        metadata_calls,
        media_calls,
    }
}

async fn storage_handler(
    State(state): State<StorageState>,
    Path((bucket, object)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("Bearer test-token-"))
        .unwrap_or(false);
    if !authorized {
        return (StatusCode::UNAUTHORIZED, "missing bearer token").into_response();
    }

    if bucket != state.bucket {
        return not_found();
    }
    let Some(obj) = state.objects.get(&object) else {
        // Record the lookup so tests can assert call ordering.
        state.metadata_calls.fetch_add(1, Ordering::SeqCst);
        return not_found();
    };

    let is_media = params.get("alt").map(String::as_str) == Some("media");
    if is_media {
        state.media_calls.fetch_add(1, Ordering::SeqCst);
    } else {
        state.metadata_calls.fetch_add(1, Ordering::SeqCst);
    }

    if let Some(status) = obj.fail_status {
        return (status, "backend unavailable").into_response();
    }

    if is_media {
        let mut response = (StatusCode::OK, obj.bytes.clone()).into_response();
        let response_headers = response.headers_mut();
        response_headers.insert(
            "content-type",
            HeaderValue::from_static(obj.content_type),
        );
        for (name, value) in &obj.extra_headers {
            response_headers.insert(*name, HeaderValue::from_static(value));
        }
        response
    } else {
        Json(json!({
            "kind": "storage#object",
            "name": object,
            "bucket": bucket,
            "size": obj.bytes.len().to_string(),
            "contentType": obj.content_type,
            "updated": obj.updated,
            "etag": "CAE=",
            "crc32c": "yZRlqg==",
            "md5Hash": "XrY7u+Ae7tCTyyK7j1rNww==",
        }))
        .into_response()
    }
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": { "code": 404, "message": "No such object" }
        })),
    )
        .into_response()
}

/// Proxy configuration pointed at the two mocks.
pub fn test_config(bucket: &str, storage: SocketAddr, identity: SocketAddr) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.gcs.bucket = bucket.to_string();
    config.gcs.storage_endpoint = format!("http://{}", storage);
    config.gcs.token_endpoint = format!("http://{}{}", identity, TOKEN_PATH);
    config
}

/// Start the proxy on an ephemeral port. Returns its address and the
/// shutdown handle keeping it alive.
pub async fn start_proxy(config: ProxyConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    let server = HttpServer::new(config);
    tokio::spawn(async move {
        let _ = server.run(listener, receiver).await;
    });

    (addr, shutdown)
}
