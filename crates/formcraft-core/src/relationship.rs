//! Design-time relationships between entities. No runtime semantics.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::ids::{EntityId, RelationshipId, TranslationKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RelationshipType {
    Contains,
    References,
    Associates,
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contains => write!(f, "CONTAINS"),
            Self::References => write!(f, "REFERENCES"),
            Self::Associates => write!(f, "ASSOCIATES"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: RelationshipId,
    pub source_entity_id: EntityId,
    pub target_entity_id: EntityId,
    pub relationship_type: RelationshipType,
    pub name_key: TranslationKey,
    pub description_key: Option<TranslationKey>,
    pub inverse_name_key: Option<TranslationKey>,
}

impl Relationship {
    pub fn new(
        id: RelationshipId,
        source_entity_id: EntityId,
        target_entity_id: EntityId,
        relationship_type: RelationshipType,
        name_key: TranslationKey,
    ) -> Result<Self, SchemaError> {
        if source_entity_id == target_entity_id {
            return Err(SchemaError::RelationshipSelfLoop {
                relationship_id: id.to_string(),
            });
        }
        Ok(Self {
            id,
            source_entity_id,
            target_entity_id,
            relationship_type,
            name_key,
            description_key: None,
            inverse_name_key: None,
        })
    }
}
