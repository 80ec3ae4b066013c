//! Proxy error types.

use axum::http::StatusCode;
use thiserror::Error;

/// Result type alias for proxy operations.
pub type Result<T> = std::result::Result<T, ProxyError>;

/// Failures a request can hit on its way through the proxy.
///
/// All variants are handled at the handler boundary and converted to an
/// HTTP status plus a short plaintext body; none of them terminate the
/// process. The next request starts from a clean slate.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// The token endpoint was unreachable or rejected the request.
    #[error("token refresh failed: {0}")]
    Auth(String),

    /// The backend reported the object absent.
    #[error("object not found")]
    NotFound,

    /// The backend answered with a non-success status.
    #[error("upstream returned status {status}")]
    Upstream { status: u16 },

    /// The outbound call failed below the HTTP layer.
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// An upstream timestamp did not match the expected pattern.
    #[error("malformed upstream timestamp: {0:?}")]
    Format(String),
}

impl ProxyError {
    /// HTTP status this error maps to at the handler boundary.
    ///
    /// Upstream failures mirror the backend status verbatim when it is
    /// representable, falling back to 502 otherwise.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::Auth(_) => StatusCode::BAD_GATEWAY,
            ProxyError::NotFound => StatusCode::NOT_FOUND,
            ProxyError::Upstream { status } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ProxyError::Transport(_) => StatusCode::BAD_GATEWAY,
            ProxyError::Format(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
