//! Object metadata lookup against the JSON API.

use serde::Deserialize;

use crate::error::{ProxyError, Result};
use crate::gcs::client::{encode_object_path, GcsClient};

/// Object resource fields used by the proxy.
///
/// Produced fresh per request, never cached. The JSON API encodes
/// 64-bit integers as decimal strings, hence `size: Option<String>`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMetadata {
    pub name: String,
    pub size: Option<String>,
    pub content_type: Option<String>,
    pub updated: String,
    pub etag: Option<String>,
    pub crc32c: Option<String>,
    pub md5_hash: Option<String>,
    pub content_encoding: Option<String>,
    pub content_language: Option<String>,
}

impl ObjectMetadata {
    /// Object size in bytes, when the backend reported one.
    pub fn size_bytes(&self) -> Option<u64> {
        self.size.as_deref().and_then(|s| s.parse().ok())
    }
}

impl GcsClient {
    /// Fetch the object resource for `object_path` (already URL-decoded).
    ///
    /// One authenticated call, no retry. 404 maps to `NotFound`; any
    /// other non-success status maps to `Upstream` with the backend
    /// status preserved.
    pub async fn fetch_metadata(&self, object_path: &str) -> Result<ObjectMetadata> {
        let url = self.object_url(&encode_object_path(object_path));
        tracing::debug!(url = %url, "Fetching object metadata");

        let response = self.authed_get(&url).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(status = %status, body = %body, "Metadata request rejected");
            return Err(if status == reqwest::StatusCode::NOT_FOUND {
                ProxyError::NotFound
            } else {
                ProxyError::Upstream {
                    status: status.as_u16(),
                }
            });
        }

        let metadata = response.json::<ObjectMetadata>().await?;
        Ok(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_resource_deserialization() {
        let metadata: ObjectMetadata = serde_json::from_str(
            r#"{
                "kind": "storage#object",
                "name": "dir/file.txt",
                "bucket": "assets",
                "size": "2048",
                "contentType": "text/plain",
                "updated": "2021-06-01T12:00:00.123Z",
                "etag": "CAE=",
                "crc32c": "yZRlqg==",
                "md5Hash": "XrY7u+Ae7tCTyyK7j1rNww==",
                "contentEncoding": "gzip"
            }"#,
        )
        .unwrap();

        assert_eq!(metadata.name, "dir/file.txt");
        assert_eq!(metadata.size_bytes(), Some(2048));
        assert_eq!(metadata.content_type.as_deref(), Some("text/plain"));
        assert_eq!(metadata.content_encoding.as_deref(), Some("gzip"));
        assert_eq!(metadata.content_language, None);
    }

    #[test]
    fn test_minimal_resource_deserialization() {
        let metadata: ObjectMetadata = serde_json::from_str(
            r#"{"name": "x", "updated": "2021-06-01T12:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(metadata.size_bytes(), None);
    }
}
