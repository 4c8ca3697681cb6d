//! Invariant-violation errors raised by the entity aggregate.
//!
//! These are domain errors, not I/O errors: every variant corresponds to
//! one of the invariants listed in the data model. `formcraft-usecases`
//! wraps these (and its own errors) into the user-facing taxonomy.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SchemaError {
    InvalidEntityId,
    InvalidFieldId,
    InvalidRelationshipId,
    InvalidTranslationKey,
    DuplicateFieldId { field_id: String },
    DuplicateEntityId { entity_id: String },
    FieldTypeImmutable { field_id: String },
    CalculatedFieldHasConstraints { field_id: String },
    CalculatedFieldIsRequired { field_id: String },
    LookupEntityMissing { field_id: String },
    LookupSelfReference { field_id: String },
    LookupDisplayFieldNotDisplayable { field_id: String, display_field: String },
    TableChildEntityMissing { field_id: String },
    DuplicateOptionValue { field_id: String, value: String },
    DuplicateConstraintKind { field_id: String, kind: String },
    IncompatibleConstraint { field_id: String, kind: String, field_type: String },
    ConstraintOrderingViolation { field_id: String, message: String },
    DuplicateControlRule { field_id: String, rule_type: String },
    DuplicateOutputMapping { field_id: String, target: String },
    RelationshipSelfLoop { relationship_id: String },
    RelationshipEndpointMissing { relationship_id: String },
    FieldNotFound { field_id: String },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEntityId => write!(f, "entity id must be a non-empty string"),
            Self::InvalidFieldId => write!(f, "field id must be a non-empty string"),
            Self::InvalidRelationshipId => write!(f, "relationship id must be a non-empty string"),
            Self::InvalidTranslationKey => write!(f, "translation key must be a non-empty string"),
            Self::DuplicateFieldId { field_id } => {
                write!(f, "duplicate field id '{field_id}'")
            }
            Self::DuplicateEntityId { entity_id } => {
                write!(f, "duplicate entity id '{entity_id}'")
            }
            Self::FieldTypeImmutable { field_id } => {
                write!(f, "field '{field_id}' type cannot change after creation")
            }
            Self::CalculatedFieldHasConstraints { field_id } => write!(
                f,
                "CALCULATED field '{field_id}' cannot carry constraints"
            ),
            Self::CalculatedFieldIsRequired { field_id } => write!(
                f,
                "CALCULATED field '{field_id}' cannot be required"
            ),
            Self::LookupEntityMissing { field_id } => {
                write!(f, "LOOKUP field '{field_id}' has no lookup_entity_id")
            }
            Self::LookupSelfReference { field_id } => write!(
                f,
                "LOOKUP field '{field_id}' cannot reference its own owning entity"
            ),
            Self::LookupDisplayFieldNotDisplayable {
                field_id,
                display_field,
            } => write!(
                f,
                "LOOKUP field '{field_id}' display field '{display_field}' is not a displayable scalar"
            ),
            Self::TableChildEntityMissing { field_id } => {
                write!(f, "TABLE field '{field_id}' has no child_entity_id")
            }
            Self::DuplicateOptionValue { field_id, value } => write!(
                f,
                "field '{field_id}' has duplicate option value '{value}'"
            ),
            Self::DuplicateConstraintKind { field_id, kind } => write!(
                f,
                "field '{field_id}' already has a constraint of kind {kind}"
            ),
            Self::IncompatibleConstraint {
                field_id,
                kind,
                field_type,
            } => write!(
                f,
                "constraint {kind} is not compatible with field '{field_id}' of type {field_type}"
            ),
            Self::ConstraintOrderingViolation { field_id, message } => {
                write!(f, "field '{field_id}': {message}")
            }
            Self::DuplicateControlRule { field_id, rule_type } => write!(
                f,
                "field '{field_id}' already has a {rule_type} control rule"
            ),
            Self::DuplicateOutputMapping { field_id, target } => write!(
                f,
                "field '{field_id}' already has an output mapping for target {target}"
            ),
            Self::RelationshipSelfLoop { relationship_id } => write!(
                f,
                "relationship '{relationship_id}' cannot link an entity to itself"
            ),
            Self::RelationshipEndpointMissing { relationship_id } => write!(
                f,
                "relationship '{relationship_id}' refers to an entity that doesn't exist"
            ),
            Self::FieldNotFound { field_id } => write!(f, "no field with id '{field_id}'"),
        }
    }
}

impl std::error::Error for SchemaError {}
