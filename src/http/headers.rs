//! Response header translation.
//!
//! # Responsibilities
//! - Pass backend headers through minus the configured exclusion list
//! - Overlay computed headers (Last-Modified from object metadata)
//! - Reformat backend timestamps into HTTP-dates
//!
//! # Design Decisions
//! - Exclusion names are matched exactly (case-sensitive) against the
//!   lower-case wire name; operators list names as they appear on the wire
//! - Duplicate backend headers collapse last-value-wins

use axum::http::header::{HeaderMap, HeaderName, HeaderValue};
use chrono::NaiveDateTime;

use crate::error::{ProxyError, Result};

/// Copy backend headers minus the exclusion list, then overlay extras.
/// Extras always win on key collision.
pub fn translate(
    backend: &HeaderMap,
    exclude: &[String],
    extras: &[(HeaderName, HeaderValue)],
) -> HeaderMap {
    let mut result = HeaderMap::with_capacity(backend.len() + extras.len());
    for (name, value) in backend {
        if exclude.iter().any(|excluded| excluded == name.as_str()) {
            continue;
        }
        result.insert(name.clone(), value.clone());
    }
    for (name, value) in extras {
        result.insert(name.clone(), value.clone());
    }
    result
}

/// Reformat a backend `updated` timestamp into an HTTP-date.
///
/// Input is ISO-8601-like with optional sub-second precision and either
/// a `Z` or `+00:00` UTC suffix, e.g. `2021-06-01T12:00:00.123Z`. The
/// sub-second part and UTC marker are stripped, the rest parsed as a
/// naive UTC timestamp.
pub fn reformat_updated(timestamp: &str) -> Result<String> {
    let stripped = timestamp.trim_end_matches("+00:00").trim_end_matches('Z');
    let stripped = match stripped.find('.') {
        Some(dot) => &stripped[..dot],
        None => stripped,
    };

    let parsed = NaiveDateTime::parse_from_str(stripped, "%Y-%m-%dT%H:%M:%S")
        .map_err(|_| ProxyError::Format(timestamp.to_string()))?;

    Ok(parsed.format("%a, %d %b %Y %H:%M:%S GMT").to_string())
}
