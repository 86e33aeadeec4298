//! Typed IDs for type-safe entity references.
//!
//! The REST API hands out identifiers either as strings or as integers
//! depending on the endpoint, so every ID is stored as a string and
//! deserialized from either form. Using typed IDs prevents accidentally
//! passing a `LeaseId` where a `BuildingId` is expected.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an ID from its string form.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the ID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                deserializer.deserialize_any(FlexibleIdVisitor).map(Self)
            }
        }
    };
}

/// Accepts string and integer identifiers.
struct FlexibleIdVisitor;

impl Visitor<'_> for FlexibleIdVisitor {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or integer identifier")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            return Err(E::invalid_value(de::Unexpected::Str(v), &self));
        }
        Ok(trimmed.to_string())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(v.to_string())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(v.to_string())
    }
}

typed_id!(BuildingId, "Unique identifier for a building.");
typed_id!(LeaseId, "Unique identifier for a lease.");
typed_id!(ProjectId, "Unique identifier for a construction project.");
typed_id!(RecordId, "Unique identifier for a financial record.");
typed_id!(
    DocumentId,
    "Identifier of a stored document (attachment) in the document store."
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_from_string() {
        let id: BuildingId = serde_json::from_str("\"b-12\"").unwrap();
        assert_eq!(id.as_str(), "b-12");
    }

    #[test]
    fn test_id_from_integer() {
        let id: DocumentId = serde_json::from_str("123").unwrap();
        assert_eq!(id, DocumentId::new("123"));
    }

    #[test]
    fn test_id_trims_whitespace() {
        let id: LeaseId = serde_json::from_str("\"  42 \"").unwrap();
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_empty_id_rejected() {
        let result: Result<ProjectId, _> = serde_json::from_str("\"   \"");
        assert!(result.is_err());
    }

    #[test]
    fn test_id_serializes_as_string() {
        let json = serde_json::to_string(&RecordId::new("tx-1")).unwrap();
        assert_eq!(json, "\"tx-1\"");
    }
}
