//! Shared outbound HTTP client and URL construction.

use std::sync::Arc;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::auth::TokenCache;
use crate::config::GcsConfig;
use crate::error::Result;

/// Characters percent-encoded in object paths. Everything outside the
/// unreserved set is escaped, so `/` travels as `%2F` and the whole
/// object name occupies a single path segment of the JSON API URL.
const OBJECT_PATH: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode a decoded object path for the JSON API.
pub fn encode_object_path(path: &str) -> String {
    utf8_percent_encode(path, OBJECT_PATH).to_string()
}

/// Authenticated client for the storage JSON API, scoped to one bucket.
pub struct GcsClient {
    http: reqwest::Client,
    tokens: Arc<TokenCache>,
    storage_endpoint: String,
    bucket: String,
    chunk_size: usize,
}

impl GcsClient {
    pub fn new(http: reqwest::Client, tokens: Arc<TokenCache>, config: &GcsConfig) -> Self {
        Self {
            http,
            tokens,
            storage_endpoint: config.storage_endpoint.trim_end_matches('/').to_string(),
            bucket: config.bucket.clone(),
            chunk_size: config.chunk_size,
        }
    }

    /// The bucket all object paths resolve against.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub(crate) fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// URL of the object resource for an already-encoded path.
    pub(crate) fn object_url(&self, encoded_path: &str) -> String {
        format!(
            "{}/storage/v1/b/{}/o/{}",
            self.storage_endpoint, self.bucket, encoded_path
        )
    }

    /// Issue a GET carrying the bearer token and client identification.
    pub(crate) async fn authed_get(&self, url: &str) -> Result<reqwest::Response> {
        let token = self.tokens.bearer_token().await?;
        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .header(reqwest::header::USER_AGENT, super::USER_AGENT)
            .send()
            .await?;
        Ok(response)
    }
}
