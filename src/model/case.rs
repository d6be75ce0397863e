//! Key case normalization for API payloads.
//!
//! OctoPrint speaks camelCase (`estimatedPrintTime`, `sdReady`) and, in a few
//! places, snake_case or dashed keys. Every response is passed through
//! [`normalize_keys`] before deserialization so models only ever see
//! snake_case keys.

use serde_json::{Map, Value};

/// Convert a single key to snake_case.
///
/// Uppercase runs are treated as one word (`HTTPServer` → `http_server`),
/// dashes become underscores and existing underscores or digits are kept.
///
/// # Examples
///
/// ```
/// use octoprint_client::model::to_snake_case;
///
/// assert_eq!(to_snake_case("printTimeLeft"), "print_time_left");
/// assert_eq!(to_snake_case("tool0"), "tool0");
/// assert_eq!(to_snake_case("_default"), "_default");
/// ```
pub fn to_snake_case(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let mut out = String::with_capacity(key.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == '-' {
            out.push('_');
            continue;
        }
        if c.is_uppercase() {
            if i > 0 {
                let prev = chars[i - 1];
                let next_is_lower = chars.get(i + 1).map(|n| n.is_lowercase()).unwrap_or(false);
                let boundary = prev.is_lowercase()
                    || prev.is_ascii_digit()
                    || (prev.is_uppercase() && next_is_lower);
                if boundary && !out.ends_with('_') {
                    out.push('_');
                }
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }

    out
}

/// Recursively convert every object key in `value` to snake_case.
///
/// Values are never touched, only keys. Arrays are walked element-wise.
pub fn normalize_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let normalized: Map<String, Value> = map
                .into_iter()
                .map(|(k, v)| (to_snake_case(&k), normalize_keys(v)))
                .collect();
            Value::Object(normalized)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_keys).collect()),
        other => other,
    }
}
