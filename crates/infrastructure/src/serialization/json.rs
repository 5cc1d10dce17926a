//! Deterministic JSON output.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::{PrettyFormatter, Serializer};

use super::SerializationError;

/// Serializes a value to deterministic JSON.
///
/// Output format:
/// - 2-space indentation
/// - Trailing newline
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_stable<T: Serialize>(value: &T) -> Result<String, SerializationError> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"  ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;

    let mut json = String::from_utf8(buffer)?;
    json.push('\n');
    Ok(json)
}

/// Deserializes JSON from a string.
///
/// # Errors
///
/// Returns an error if the JSON is invalid or doesn't match the expected type.
pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T, SerializationError> {
    serde_json::from_str(json).map_err(SerializationError::Deserialize)
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use combat_probe_domain::{Assertion, StatusExpectation};
    use std::collections::BTreeMap;

    #[test]
    fn test_stable_serialization_has_trailing_newline() {
        let json = to_json_stable(&Assertion::IsJson).expect("serialization should work");
        assert!(json.ends_with('\n'));
        assert!(!json.ends_with("\n\n"));
    }

    #[test]
    fn test_stable_serialization_uses_two_space_indent() {
        let json = to_json_stable(&Assertion::status(404)).expect("serialization should work");
        assert!(json.contains("\n  \"type\": \"status_code\""));
    }

    #[test]
    fn test_btreemap_keys_are_sorted() {
        let mut map = BTreeMap::new();
        map.insert("zebra", 1);
        map.insert("apple", 2);

        let json = to_json_stable(&map).expect("serialization should work");
        let apple = json.find("apple").expect("apple should be in json");
        let zebra = json.find("zebra").expect("zebra should be in json");
        assert!(apple < zebra);
    }

    #[test]
    fn test_from_json_reports_deserialize_errors() {
        let parsed: StatusExpectation = from_json("[404, 500]").expect("valid expectation");
        assert_eq!(parsed, StatusExpectation::OneOf(vec![404, 500]));

        let err = from_json::<StatusExpectation>("{\"min\": }").expect_err("invalid JSON");
        assert!(matches!(err, SerializationError::Deserialize(_)));
    }
}
