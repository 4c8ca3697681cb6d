//! `Schema`: the full design-time document -- entities plus
//! relationships plus an optional version, matching the external JSON
//! shape (spec §6). This is the unit export/import/compare operate over.

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::SchemaError;
use crate::field_type::FieldType;
use crate::ids::EntityId;
use crate::relationship::Relationship;
use crate::version::SchemaVersion;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub schema_id: String,
    pub version: Option<SchemaVersion>,
    pub entities: Vec<Entity>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<Relationship>,
}

impl Schema {
    pub fn new(schema_id: impl Into<String>) -> Self {
        Self {
            schema_id: schema_id.into(),
            version: None,
            entities: Vec::new(),
            relationships: Vec::new(),
        }
    }

    pub fn entity(&self, id: &EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| &e.id == id)
    }

    /// Invariant 1 (entity half) and invariant 10: duplicate entity ids,
    /// relationships whose endpoints don't exist.
    ///
    /// Also checks invariant 4 (LOOKUP/TABLE fields), which needs
    /// schema-wide knowledge a single `Entity` or `Field` doesn't have:
    /// the target entity must exist, a LOOKUP may not target its own
    /// owning entity, and `lookup_display_field` must name a
    /// displayable-scalar field on the target entity.
    pub fn check_invariants(&self) -> Result<(), SchemaError> {
        let mut seen = std::collections::HashSet::new();
        for e in &self.entities {
            if !seen.insert(e.id.clone()) {
                return Err(SchemaError::DuplicateEntityId {
                    entity_id: e.id.to_string(),
                });
            }
        }
        for rel in &self.relationships {
            if self.entity(&rel.source_entity_id).is_none() || self.entity(&rel.target_entity_id).is_none() {
                return Err(SchemaError::RelationshipEndpointMissing {
                    relationship_id: rel.id.to_string(),
                });
            }
        }
        for entity in &self.entities {
            for field in entity.fields() {
                match field.field_type {
                    FieldType::Lookup => self.check_lookup_field(entity, field)?,
                    FieldType::Table => {
                        if field.child_entity_id.is_none() {
                            return Err(SchemaError::TableChildEntityMissing {
                                field_id: field.id.to_string(),
                            });
                        }
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn check_lookup_field(&self, owning_entity: &Entity, field: &crate::field::Field) -> Result<(), SchemaError> {
        let Some(target_id) = &field.lookup_entity_id else {
            return Err(SchemaError::LookupEntityMissing {
                field_id: field.id.to_string(),
            });
        };
        if target_id == &owning_entity.id {
            return Err(SchemaError::LookupSelfReference {
                field_id: field.id.to_string(),
            });
        }
        let Some(target_entity) = self.entity(target_id) else {
            return Err(SchemaError::LookupEntityMissing {
                field_id: field.id.to_string(),
            });
        };
        if let Some(display_field_id) = &field.lookup_display_field {
            let is_displayable = target_entity
                .field(display_field_id)
                .is_some_and(|f| f.field_type.is_displayable_scalar());
            if !is_displayable {
                return Err(SchemaError::LookupDisplayFieldNotDisplayable {
                    field_id: field.id.to_string(),
                    display_field: display_field_id.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn add_entity(&mut self, entity: Entity) -> Result<(), SchemaError> {
        if self.entity(&entity.id).is_some() {
            return Err(SchemaError::DuplicateEntityId {
                entity_id: entity.id.to_string(),
            });
        }
        self.entities.push(entity);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::TranslationKey;

    #[test]
    fn rejects_duplicate_entity_id() {
        let mut schema = Schema::new("s1");
        let e1 = Entity::new(
            EntityId::new("contact").unwrap(),
            TranslationKey::new("k").unwrap(),
            true,
        );
        let e2 = e1.clone();
        schema.add_entity(e1).unwrap();
        assert!(matches!(
            schema.add_entity(e2),
            Err(SchemaError::DuplicateEntityId { .. })
        ));
    }

    fn entity_with_lookup(owning_id: &str, field_id: &str, target: Option<EntityId>) -> Entity {
        use crate::field::Field;
        use crate::ids::FieldId;

        let mut e = Entity::new(EntityId::new(owning_id).unwrap(), TranslationKey::new("k").unwrap(), true);
        let mut field = Field::new(FieldId::new(field_id).unwrap(), FieldType::Lookup, TranslationKey::new("l").unwrap(), false).unwrap();
        field.lookup_entity_id = target;
        e.add_field(field).unwrap();
        e
    }

    #[test]
    fn rejects_lookup_field_with_no_target() {
        let mut schema = Schema::new("s1");
        schema.add_entity(entity_with_lookup("contact", "manager", None)).unwrap();
        assert!(matches!(
            schema.check_invariants(),
            Err(SchemaError::LookupEntityMissing { .. })
        ));
    }

    #[test]
    fn rejects_lookup_field_targeting_its_own_entity() {
        let mut schema = Schema::new("s1");
        schema
            .add_entity(entity_with_lookup("contact", "manager", Some(EntityId::new("contact").unwrap())))
            .unwrap();
        assert!(matches!(
            schema.check_invariants(),
            Err(SchemaError::LookupSelfReference { .. })
        ));
    }

    #[test]
    fn rejects_lookup_field_targeting_missing_entity() {
        let mut schema = Schema::new("s1");
        schema
            .add_entity(entity_with_lookup("contact", "manager", Some(EntityId::new("nonexistent").unwrap())))
            .unwrap();
        assert!(matches!(
            schema.check_invariants(),
            Err(SchemaError::LookupEntityMissing { .. })
        ));
    }

    #[test]
    fn accepts_lookup_field_targeting_a_different_existing_entity() {
        let mut schema = Schema::new("s1");
        schema.add_entity(Entity::new(EntityId::new("employee").unwrap(), TranslationKey::new("k").unwrap(), true)).unwrap();
        schema
            .add_entity(entity_with_lookup("contact", "manager", Some(EntityId::new("employee").unwrap())))
            .unwrap();
        schema.check_invariants().unwrap();
    }

    #[test]
    fn rejects_table_field_with_no_child_entity() {
        use crate::field::Field;
        use crate::ids::FieldId;

        let mut schema = Schema::new("s1");
        let mut e = Entity::new(EntityId::new("invoice").unwrap(), TranslationKey::new("k").unwrap(), true);
        e.add_field(
            Field::new(FieldId::new("line_items").unwrap(), FieldType::Table, TranslationKey::new("l").unwrap(), false).unwrap(),
        )
        .unwrap();
        schema.add_entity(e).unwrap();
        assert!(matches!(
            schema.check_invariants(),
            Err(SchemaError::TableChildEntityMissing { .. })
        ));
    }

    #[test]
    fn rejects_relationship_with_missing_endpoint() {
        let mut schema = Schema::new("s1");
        schema.add_entity(Entity::new(EntityId::new("contact").unwrap(), TranslationKey::new("k").unwrap(), true)).unwrap();
        schema.relationships.push(Relationship::new(
            crate::ids::RelationshipId::new("r1").unwrap(),
            EntityId::new("contact").unwrap(),
            EntityId::new("nonexistent").unwrap(),
            crate::relationship::RelationshipType::References,
            TranslationKey::new("rel").unwrap(),
        ).unwrap());
        assert!(matches!(
            schema.check_invariants(),
            Err(SchemaError::RelationshipEndpointMissing { .. })
        ));
    }
}
