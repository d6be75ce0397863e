//! Field-level deserialization helpers used by the resource models.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

/// Accept either a single value or an array of values.
///
/// Missing (with `#[serde(default)]`) and `null` become an empty vector.
///
/// ```
/// use octoprint_client::model::one_or_many;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Holder {
///     #[serde(default, deserialize_with = "one_or_many")]
///     items: Vec<u32>,
/// }
///
/// let one: Holder = serde_json::from_str(r#"{"items": 3}"#).unwrap();
/// let many: Holder = serde_json::from_str(r#"{"items": [1, 2]}"#).unwrap();
/// assert_eq!(one.items, vec![3]);
/// assert_eq!(many.items, vec![1, 2]);
/// ```
pub fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match Option::<OneOrMany<T>>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::Many(items)) => items,
        Some(OneOrMany::One(item)) => vec![item],
    })
}

/// Treat an explicit `null` like a missing field and use the default.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Tag {
        name: String,
    }

    #[derive(Debug, Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "one_or_many")]
        tags: Vec<Tag>,
        #[serde(default, deserialize_with = "null_as_default")]
        label: String,
    }

    #[test]
    fn test_single_object_is_wrapped() {
        let h: Holder = serde_json::from_str(r#"{"tags": {"name": "a"}}"#).unwrap();
        assert_eq!(h.tags, vec![Tag { name: "a".into() }]);
    }

    #[test]
    fn test_null_and_missing() {
        let h: Holder = serde_json::from_str(r#"{"tags": null, "label": null}"#).unwrap();
        assert!(h.tags.is_empty());
        assert_eq!(h.label, "");

        let h: Holder = serde_json::from_str("{}").unwrap();
        assert!(h.tags.is_empty());
    }
}
