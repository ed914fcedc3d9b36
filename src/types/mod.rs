//! Wire-level request types: create bodies, partial-update bodies and list filters.

pub mod account;
pub mod budget;
pub mod category;
pub mod transaction;

use serde::{Deserialize, Deserializer};

/// Deserialize a key that is present in the body, keeping `null` distinct from absence.
///
/// Used with `#[serde(default, deserialize_with = "present")]` on an
/// `Option<Option<T>>`: absent -> `None`, `null` -> `Some(None)`, value -> `Some(Some(v))`.
pub fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "present")]
        memo: Option<Option<String>>,
    }

    #[test]
    fn absent_null_and_value_are_distinguished() {
        let absent: Probe = serde_json::from_str("{}").unwrap();
        let null: Probe = serde_json::from_str(r#"{"memo":null}"#).unwrap();
        let value: Probe = serde_json::from_str(r#"{"memo":"rent"}"#).unwrap();
        assert_eq!(absent.memo, None);
        assert_eq!(null.memo, Some(None));
        assert_eq!(value.memo, Some(Some("rent".to_string())));
    }
}
