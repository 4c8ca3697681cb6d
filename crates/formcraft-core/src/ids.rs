//! Opaque string identifiers.
//!
//! `EntityId`, `FieldId`, `RelationshipId`, and `TranslationKey` carry no
//! structure beyond "non-empty, trimmed" -- unlike a database primary key
//! they are author-supplied and never parsed.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! opaque_string_id {
    ($name:ident, $empty_err:expr) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Result<Self, crate::error::SchemaError> {
                let trimmed = value.into().trim().to_string();
                if trimmed.is_empty() {
                    return Err($empty_err);
                }
                Ok(Self(trimmed))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = crate::error::SchemaError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                $name::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

opaque_string_id!(EntityId, crate::error::SchemaError::InvalidEntityId);
opaque_string_id!(FieldId, crate::error::SchemaError::InvalidFieldId);
opaque_string_id!(
    RelationshipId,
    crate::error::SchemaError::InvalidRelationshipId
);
opaque_string_id!(
    TranslationKey,
    crate::error::SchemaError::InvalidTranslationKey
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_whitespace() {
        let id = EntityId::new("  customer  ").unwrap();
        assert_eq!(id.as_str(), "customer");
    }

    #[test]
    fn rejects_empty() {
        assert!(EntityId::new("   ").is_err());
    }

    #[test]
    fn serde_roundtrip() {
        let id = FieldId::new("name").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"name\"");
        let back: FieldId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn serde_rejects_empty_string() {
        let result: Result<EntityId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn display_matches_as_str() {
        let id = RelationshipId::new("rel-1").unwrap();
        assert_eq!(id.to_string(), id.as_str());
    }
}
