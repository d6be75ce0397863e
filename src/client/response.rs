//! Normalized HTTP responses.

use crate::error::Result;
use crate::model;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;

/// A successful response with its body normalized to JSON.
///
/// - `204 No Content` and empty bodies become [`Value::Null`]
/// - JSON bodies are parsed and their keys converted to snake_case
/// - anything else is kept as a [`Value::String`]
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers, names lowercased
    pub headers: BTreeMap<String, String>,
    /// Normalized body
    pub body: Value,
}

impl ApiResponse {
    /// Build a normalized response from raw parts.
    pub fn from_parts(status: u16, headers: BTreeMap<String, String>, raw: &Bytes) -> Result<Self> {
        let body = normalize_body(status, &headers, raw)?;
        Ok(Self {
            status,
            headers,
            body,
        })
    }

    /// Deserialize the normalized body.
    pub fn into_model<T: DeserializeOwned>(self) -> Result<T> {
        model::decode_normalized(self.body)
    }

    /// `Location` header, set by OctoPrint on `201 Created`.
    pub fn location(&self) -> Option<&str> {
        self.headers.get("location").map(String::as_str)
    }

    /// Whether the body carried no content.
    pub fn is_empty(&self) -> bool {
        self.body.is_null()
    }
}

fn is_json(headers: &BTreeMap<String, String>) -> bool {
    headers
        .get("content-type")
        .map(|ct| ct.contains("json"))
        .unwrap_or(false)
}

fn normalize_body(status: u16, headers: &BTreeMap<String, String>, raw: &Bytes) -> Result<Value> {
    if status == 204 || raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }

    if is_json(headers) {
        let value: Value = serde_json::from_slice(raw)?;
        return Ok(model::normalize_keys(value));
    }

    // Some endpoints reply with JSON but a text/html content type.
    match serde_json::from_slice::<Value>(raw) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => Ok(model::normalize_keys(value)),
        _ => Ok(Value::String(String::from_utf8_lossy(raw).into_owned())),
    }
}
