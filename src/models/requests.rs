//! Request DTOs for the cache HTTP adapter
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;
use serde_json::Value;

/// Request body for the SET operation (POST /cache)
///
/// A missing `value` field deserializes to `null`, which the cache
/// rejects as an absent value.
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// The value to store, any JSON
    #[serde(default)]
    pub value: Value,
}

/// Query string carrying the target key (`?key=K`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeyQuery {
    pub key: Option<String>,
}

impl KeyQuery {
    /// Returns the key if one was provided and non-empty.
    pub fn key(self) -> Option<String> {
        self.key.filter(|k| !k.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_request_deserialize() {
        let json = r#"{"key": "test", "value": "hello"}"#;
        let req: SetRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.key, "test");
        assert_eq!(req.value, "hello");
    }

    #[test]
    fn test_set_request_structured_value() {
        let json = r#"{"key": "test", "value": {"n": [1, 2]}}"#;
        let req: SetRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.value["n"][1], 2);
    }

    #[test]
    fn test_set_request_missing_value_is_null() {
        let req: SetRequest = serde_json::from_str(r#"{"key": "test"}"#).unwrap();
        assert!(req.value.is_null());
    }

    #[test]
    fn test_set_request_missing_key_fails() {
        assert!(serde_json::from_str::<SetRequest>(r#"{"value": 1}"#).is_err());
    }

    #[test]
    fn test_key_query_filters_empty() {
        assert_eq!(KeyQuery { key: Some("k".into()) }.key(), Some("k".to_string()));
        assert_eq!(KeyQuery { key: Some(String::new()) }.key(), None);
        assert_eq!(KeyQuery::default().key(), None);
    }
}
