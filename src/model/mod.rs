//! Declarative deserialization layer shared by all resources.
//!
//! Every resource type is a plain struct whose shape is declared with serde
//! attributes. Responses go through two steps:
//!
//! 1. [`normalize_keys`] rewrites every object key to snake_case
//! 2. [`decode`] deserializes the normalized value into the target type
//!
//! The attribute vocabulary used across the resource modules:
//!
//! | Need | Declaration |
//! |------|-------------|
//! | Rename an API field | `#[serde(rename = "type")] kind: ...` |
//! | Nested object | a field typed as another model struct |
//! | Single-or-array value | `#[serde(default, deserialize_with = "one_or_many")]` |
//! | `null` means "empty" | `#[serde(default, deserialize_with = "null_as_default")]` |
//! | Keep unknown fields | `#[serde(flatten)] extra: Extra` |
//!
//! # Examples
//!
//! ```
//! use octoprint_client::model::{decode, Extra};
//! use serde::Deserialize;
//! use serde_json::json;
//!
//! #[derive(Deserialize)]
//! struct Progress {
//!     completion: Option<f64>,
//!     print_time_left: Option<f64>,
//!     #[serde(flatten)]
//!     extra: Extra,
//! }
//!
//! let progress: Progress = decode(json!({
//!     "completion": 42.0,
//!     "printTimeLeft": 600,
//!     "printTimeLeftOrigin": "estimate"
//! })).unwrap();
//!
//! assert_eq!(progress.print_time_left, Some(600.0));
//! assert_eq!(progress.extra["print_time_left_origin"], "estimate");
//! ```

mod case;
mod de;

pub use case::{normalize_keys, to_snake_case};
pub use de::{null_as_default, one_or_many};

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;

/// Catch-all bucket for fields a model does not declare.
pub type Extra = BTreeMap<String, Value>;

/// Normalize `value` and deserialize it into `T`.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    decode_normalized(normalize_keys(value))
}

/// Deserialize a value whose keys are already snake_case.
pub fn decode_normalized<T: DeserializeOwned>(value: Value) -> Result<T> {
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Refs {
        resource: String,
        download: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    struct Entry {
        name: String,
        #[serde(rename = "type")]
        kind: String,
        refs: Refs,
        #[serde(default, deserialize_with = "one_or_many")]
        children: Vec<Entry>,
        #[serde(flatten)]
        extra: Extra,
    }

    #[test]
    fn test_decode_declarations() {
        let entry: Entry = decode(json!({
            "name": "parts",
            "type": "folder",
            "refs": {"resource": "http://x/api/files/local/parts"},
            "children": {
                "name": "a.gcode",
                "type": "machinecode",
                "refs": {"resource": "r", "download": "d"},
                "gcodeAnalysis": {"estimatedPrintTime": 10}
            },
            "typePath": ["folder"]
        }))
        .unwrap();

        assert_eq!(entry.kind, "folder");
        assert!(entry.refs.download.is_none());
        assert_eq!(entry.children.len(), 1);
        assert_eq!(entry.children[0].name, "a.gcode");
        assert_eq!(entry.children[0].refs.download.as_deref(), Some("d"));
        assert_eq!(
            entry.children[0].extra["gcode_analysis"]["estimated_print_time"],
            json!(10)
        );
        assert_eq!(entry.extra["type_path"], json!(["folder"]));
        assert!(!entry.extra.contains_key("name"));
    }

    #[test]
    fn test_decode_error_is_deserialize() {
        let err = decode::<Entry>(json!({"name": 1})).unwrap_err();
        assert!(matches!(err, crate::OctoPrintError::Deserialize(_)));
    }
}
