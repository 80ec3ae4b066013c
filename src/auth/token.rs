//! Service-account token acquisition and caching.

use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwapOption;
use serde::Deserialize;

use crate::error::{ProxyError, Result};
use crate::gcs::USER_AGENT;
use crate::observability::metrics;

/// A bearer credential obtained from the instance metadata service.
#[derive(Debug, Clone)]
pub struct Credential {
    /// Opaque token presented in the Authorization header.
    pub access_token: String,
    /// When this credential was fetched.
    pub issued_at: Instant,
}

impl Credential {
    /// Whether the credential is still inside its freshness window.
    pub fn is_fresh(&self, max_age: Duration) -> bool {
        self.issued_at.elapsed() <= max_age
    }
}

/// Wire format of the token endpoint response. Only the token field is
/// consumed; `expires_in` is ignored in favor of the local freshness
/// window.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Process-wide cache for the service-account bearer token.
///
/// Readers load the current credential without locking. A stale
/// credential is replaced by a single atomic store of a fresh immutable
/// value; two handlers racing past the freshness check may both
/// refresh, the second store wins, and both tokens remain valid.
pub struct TokenCache {
    client: reqwest::Client,
    token_endpoint: String,
    max_age: Duration,
    current: ArcSwapOption<Credential>,
}

impl TokenCache {
    pub fn new(client: reqwest::Client, token_endpoint: String, max_age: Duration) -> Self {
        Self {
            client,
            token_endpoint,
            max_age,
            current: ArcSwapOption::empty(),
        }
    }

    /// Return a token fresh enough to authenticate a backend call,
    /// refreshing from the metadata service when needed.
    pub async fn bearer_token(&self) -> Result<String> {
        if let Some(credential) = self.current.load_full() {
            if credential.is_fresh(self.max_age) {
                return Ok(credential.access_token.clone());
            }
        }

        let credential = self.refresh().await?;
        let token = credential.access_token.clone();
        self.current.store(Some(Arc::new(credential)));
        Ok(token)
    }

    async fn refresh(&self) -> Result<Credential> {
        tracing::debug!(endpoint = %self.token_endpoint, "Refreshing service-account token");

        let response = self
            .client
            .get(&self.token_endpoint)
            .header("Metadata-Flavor", "Google")
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .map_err(|e| ProxyError::Auth(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProxyError::Auth(format!(
                "token endpoint returned {}",
                status
            )));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| ProxyError::Auth(e.to_string()))?;

        metrics::record_token_refresh();

        Ok(Credential {
            access_token: body.access_token,
            issued_at: Instant::now(),
        })
    }
}
