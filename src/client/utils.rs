//! Utility functions for the OctoPrint HTTP client.
//!
//! This module provides helper functions for:
//! - Building endpoint URLs from unencoded API paths
//! - Retry logic with exponential backoff
//! - Status code classification
//! - Extracting error messages from OctoPrint error bodies

use crate::error::{OctoPrintError, Result};
use std::time::Duration;
use url::Url;

/// Build an endpoint URL below `base`.
///
/// `path` is split on `/` and every non-empty segment is appended to the base
/// URL's path, percent-encoding as needed. Base URLs with a path prefix
/// (reverse proxy setups such as `http://host/octoprint/`) keep the prefix.
///
/// # Examples
///
/// ```
/// use octoprint_client::client::endpoint_url;
/// use url::Url;
///
/// let base = Url::parse("http://octopi.local/").unwrap();
/// let url = endpoint_url(&base, "api/files/local/my part.gcode").unwrap();
/// assert_eq!(url.as_str(), "http://octopi.local/api/files/local/my%20part.gcode");
/// ```
pub fn endpoint_url(base: &Url, path: &str) -> Result<Url> {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    {
        let mut segments = url.path_segments_mut().map_err(|_| {
            OctoPrintError::Config(format!("base url cannot carry a path: {}", base))
        })?;
        segments.pop_if_empty();
        segments.extend(path.split('/').filter(|s| !s.is_empty()));
    }
    Ok(url)
}

/// Join API path fragments with `/`, skipping empty ones.
pub fn join_path(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim_matches('/'))
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Check if status code indicates retryable error
pub fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 425 | 429 | 502 | 503 | 504)
}

/// Exponential backoff delay calculation
pub fn exponential_backoff(attempt: u32, base_ms: u64) -> Duration {
    let delay_ms = base_ms.saturating_mul(2_u64.pow(attempt.min(10)));
    Duration::from_millis(delay_ms)
}

/// Pull a human readable message out of an error response body.
///
/// OctoPrint answers API errors either with `{"error": "..."}` or with a
/// plain text / HTML body. Falls back to `fallback` for empty bodies.
pub fn error_message(body: &str, fallback: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return fallback.to_string();
    }
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Some(serde_json::Value::String(message)) = map.get("error") {
            return message.clone();
        }
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url_encodes_segments() {
        let base = Url::parse("http://localhost:5000").unwrap();
        let url = endpoint_url(&base, "api/files/local/folder/a#b.gcode").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/files/local/folder/a%23b.gcode");
    }

    #[test]
    fn test_endpoint_url_keeps_prefix() {
        let base = Url::parse("http://host/octoprint/").unwrap();
        let url = endpoint_url(&base, "/api/job").unwrap();
        assert_eq!(url.as_str(), "http://host/octoprint/api/job");
    }

    #[test]
    fn test_endpoint_url_rejects_opaque_base() {
        let base = Url::parse("mailto:someone@example.com").unwrap();
        assert!(matches!(endpoint_url(&base, "api/job"), Err(OctoPrintError::Config(_))));
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path(&["api", "files", "local", "", "a/b.gcode"]), "api/files/local/a/b.gcode");
    }

    #[test]
    fn test_is_retryable_status() {
        assert!(is_retryable_status(503));
        assert!(is_retryable_status(429));
        assert!(!is_retryable_status(404));
    }

    #[test]
    fn test_exponential_backoff() {
        assert_eq!(exponential_backoff(0, 100), Duration::from_millis(100));
        assert_eq!(exponential_backoff(2, 100), Duration::from_millis(400));
        assert_eq!(exponential_backoff(40, 1), exponential_backoff(10, 1));
    }

    #[test]
    fn test_error_message() {
        assert_eq!(error_message(r#"{"error": "File not found"}"#, "Not Found"), "File not found");
        assert_eq!(error_message("Printer is not operational", "Conflict"), "Printer is not operational");
        assert_eq!(error_message("  ", "Conflict"), "Conflict");
    }
}
