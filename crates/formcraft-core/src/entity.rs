//! The `Entity` aggregate: an entity plus its fields, with the invariants
//! that can be checked without consulting the rest of the schema.

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::field::Field;
use crate::ids::{EntityId, FieldId, TranslationKey};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub name_key: TranslationKey,
    pub description_key: Option<TranslationKey>,
    pub is_root_entity: bool,
    pub parent_entity_id: Option<EntityId>,
    /// Insertion-order-preserving; fields are matched by id, never by
    /// position.
    fields: Vec<Field>,
}

impl Entity {
    pub fn new(id: EntityId, name_key: TranslationKey, is_root_entity: bool) -> Self {
        Self {
            id,
            name_key,
            description_key: None,
            is_root_entity,
            parent_entity_id: None,
            fields: Vec::new(),
        }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, id: &FieldId) -> Option<&Field> {
        self.fields.iter().find(|f| &f.id == id)
    }

    /// Appends a new field after checking invariant 1 (id uniqueness) and
    /// the field's own self-contained invariants.
    pub fn add_field(&mut self, field: Field) -> Result<(), SchemaError> {
        if self.field(&field.id).is_some() {
            return Err(SchemaError::DuplicateFieldId {
                field_id: field.id.to_string(),
            });
        }
        field.check_self_contained_invariants()?;
        self.fields.push(field);
        Ok(())
    }

    /// Replaces a field in place, rejecting a change of `field_type`
    /// (invariant 2: field-type immutability).
    pub fn update_field(&mut self, field_id: &FieldId, new_field: Field) -> Result<(), SchemaError> {
        let index = self
            .fields
            .iter()
            .position(|f| &f.id == field_id)
            .ok_or_else(|| SchemaError::FieldNotFound {
                field_id: field_id.to_string(),
            })?;
        if &new_field.id != field_id {
            return Err(SchemaError::FieldNotFound {
                field_id: field_id.to_string(),
            });
        }
        if self.fields[index].field_type != new_field.field_type {
            return Err(SchemaError::FieldTypeImmutable {
                field_id: field_id.to_string(),
            });
        }
        new_field.check_self_contained_invariants()?;
        self.fields[index] = new_field;
        Ok(())
    }

    /// Removes a field unconditionally. Dependency-safety checks
    /// (invariant 12) are the caller's responsibility -- they require
    /// scanning every formula and control rule across the schema, which
    /// this aggregate does not have visibility into.
    pub fn remove_field(&mut self, field_id: &FieldId) -> Result<Field, SchemaError> {
        let index = self
            .fields
            .iter()
            .position(|f| &f.id == field_id)
            .ok_or_else(|| SchemaError::FieldNotFound {
                field_id: field_id.to_string(),
            })?;
        Ok(self.fields.remove(index))
    }
}
