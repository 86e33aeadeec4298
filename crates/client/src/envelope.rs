//! Normalization of list response envelopes.
//!
//! List endpoints answer in one of three shapes: a bare array, an object
//! whose `data` field holds the array, or an object naming the list after
//! the entity (`{"leases": [...]}`). The shape is resolved once here.

use serde_json::{Map, Value};

use crate::error::ClientError;
use crate::kind::EntityKind;

/// Shape of a list response.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// `[...]`
    Bare(Vec<Value>),
    /// `{"data": [...]}`
    Enveloped(Vec<Value>),
    /// `{"<name>": [...], ...}`
    Named(Map<String, Value>),
}

impl Envelope {
    /// Classifies a response body.
    ///
    /// `{"data": {...}}` is unwrapped and classified as a named envelope.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Decode` for scalars and `null`.
    pub fn classify(body: Value) -> Result<Self, ClientError> {
        match body {
            Value::Array(items) => Ok(Self::Bare(items)),
            Value::Object(mut map) => match map.remove("data") {
                Some(Value::Array(items)) => Ok(Self::Enveloped(items)),
                Some(Value::Object(inner)) => Ok(Self::Named(inner)),
                Some(other) => {
                    map.insert("data".to_string(), other);
                    Ok(Self::Named(map))
                }
                None => Ok(Self::Named(map)),
            },
            other => Err(ClientError::decode(format!(
                "expected a list response, got {}",
                type_name(&other)
            ))),
        }
    }

    /// Extracts the list.
    ///
    /// Named envelopes are resolved by `key`, then by the first
    /// array-valued field in key order.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Decode` when a named envelope holds no array.
    pub fn into_items(self, key: &str) -> Result<Vec<Value>, ClientError> {
        match self {
            Self::Bare(items) | Self::Enveloped(items) => Ok(items),
            Self::Named(mut map) => {
                if let Some(Value::Array(items)) = map.remove(key) {
                    return Ok(items);
                }
                map.into_iter()
                    .find_map(|(_, value)| match value {
                        Value::Array(items) => Some(items),
                        _ => None,
                    })
                    .ok_or_else(|| ClientError::decode(format!("no list found for '{key}'")))
            }
        }
    }
}

/// Classifies and extracts the list of `kind` from a response body.
///
/// # Errors
///
/// Returns `ClientError::Decode` when the body holds no list.
pub fn normalize(body: Value, kind: EntityKind) -> Result<Vec<Value>, ClientError> {
    Envelope::classify(body)?.into_items(kind.envelope_key())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!([{"id": 1}, {"id": 2}]))]
    #[case(json!({"data": [{"id": 1}, {"id": 2}]}))]
    #[case(json!({"leases": [{"id": 1}, {"id": 2}], "total": 2}))]
    #[case(json!({"data": {"leases": [{"id": 1}, {"id": 2}]}}))]
    #[case(json!({"count": 2, "results": [{"id": 1}, {"id": 2}]}))]
    fn test_every_shape_yields_the_list(#[case] body: Value) {
        let items = normalize(body, EntityKind::Leases).unwrap();
        assert_eq!(items, vec![json!({"id": 1}), json!({"id": 2})]);
    }

    #[test]
    fn test_classification() {
        assert!(matches!(
            Envelope::classify(json!([])).unwrap(),
            Envelope::Bare(_)
        ));
        assert!(matches!(
            Envelope::classify(json!({"data": []})).unwrap(),
            Envelope::Enveloped(_)
        ));
        assert!(matches!(
            Envelope::classify(json!({"tenants": []})).unwrap(),
            Envelope::Named(_)
        ));
    }

    #[test]
    fn test_named_key_wins_over_other_arrays() {
        let body = json!({"alerts": ["x"], "buildings": [{"id": "B1"}]});
        let items = normalize(body, EntityKind::Buildings).unwrap();
        assert_eq!(items, vec![json!({"id": "B1"})]);
    }

    #[rstest]
    #[case(json!(null))]
    #[case(json!("oops"))]
    #[case(json!({"message": "ok"}))]
    fn test_bodies_without_list_are_decode_errors(#[case] body: Value) {
        assert!(matches!(
            normalize(body, EntityKind::Projects),
            Err(ClientError::Decode(_))
        ));
    }
}
