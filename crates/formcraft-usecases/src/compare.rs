//! Schema comparator (spec §4.12): structural diff, compatibility
//! classification, version-bump suggestion. No rename detection -- a
//! rename always surfaces as a remove plus an add.

use std::fmt;

use formcraft_core::{Entity, Schema, SchemaVersion};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaChange {
    EntityAdded { entity_id: String },
    EntityRemoved { entity_id: String },
    FieldAdded { entity_id: String, field_id: String },
    FieldRemoved { entity_id: String, field_id: String },
    FieldTypeChanged { entity_id: String, field_id: String, from: String, to: String },
    FieldRequiredChanged { entity_id: String, field_id: String, from: bool, to: bool },
    ConstraintAdded { entity_id: String, field_id: String, kind: String },
    ConstraintRemoved { entity_id: String, field_id: String, kind: String },
    ConstraintModified { entity_id: String, field_id: String, kind: String },
    OptionAdded { entity_id: String, field_id: String, value: String },
    OptionRemoved { entity_id: String, field_id: String, value: String },
}

impl SchemaChange {
    fn entity_id(&self) -> &str {
        match self {
            Self::EntityAdded { entity_id }
            | Self::EntityRemoved { entity_id }
            | Self::FieldAdded { entity_id, .. }
            | Self::FieldRemoved { entity_id, .. }
            | Self::FieldTypeChanged { entity_id, .. }
            | Self::FieldRequiredChanged { entity_id, .. }
            | Self::ConstraintAdded { entity_id, .. }
            | Self::ConstraintRemoved { entity_id, .. }
            | Self::ConstraintModified { entity_id, .. }
            | Self::OptionAdded { entity_id, .. }
            | Self::OptionRemoved { entity_id, .. } => entity_id,
        }
    }

    fn field_id(&self) -> &str {
        match self {
            Self::EntityAdded { .. } | Self::EntityRemoved { .. } => "",
            Self::FieldAdded { field_id, .. }
            | Self::FieldRemoved { field_id, .. }
            | Self::FieldTypeChanged { field_id, .. }
            | Self::FieldRequiredChanged { field_id, .. }
            | Self::ConstraintAdded { field_id, .. }
            | Self::ConstraintRemoved { field_id, .. }
            | Self::ConstraintModified { field_id, .. }
            | Self::OptionAdded { field_id, .. }
            | Self::OptionRemoved { field_id, .. } => field_id,
        }
    }

    /// Canonical rank matching declaration order, used to sort compare
    /// output by change kind as the second sort key.
    fn kind_rank(&self) -> u8 {
        match self {
            Self::EntityAdded { .. } => 0,
            Self::EntityRemoved { .. } => 1,
            Self::FieldAdded { .. } => 2,
            Self::FieldRemoved { .. } => 3,
            Self::FieldTypeChanged { .. } => 4,
            Self::FieldRequiredChanged { .. } => 5,
            Self::ConstraintAdded { .. } => 6,
            Self::ConstraintRemoved { .. } => 7,
            Self::ConstraintModified { .. } => 8,
            Self::OptionAdded { .. } => 9,
            Self::OptionRemoved { .. } => 10,
        }
    }

    pub fn is_breaking(&self) -> bool {
        matches!(
            self,
            Self::EntityRemoved { .. }
                | Self::FieldRemoved { .. }
                | Self::FieldTypeChanged { .. }
                | Self::OptionRemoved { .. }
        )
    }
}

impl fmt::Display for SchemaChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EntityAdded { entity_id } => write!(f, "ENTITY_ADDED({entity_id})"),
            Self::EntityRemoved { entity_id } => write!(f, "ENTITY_REMOVED({entity_id})"),
            Self::FieldAdded { entity_id, field_id } => write!(f, "FIELD_ADDED({entity_id}, {field_id})"),
            Self::FieldRemoved { entity_id, field_id } => write!(f, "FIELD_REMOVED({entity_id}, {field_id})"),
            Self::FieldTypeChanged { entity_id, field_id, from, to } => {
                write!(f, "FIELD_TYPE_CHANGED({entity_id}, {field_id}, {from} -> {to})")
            }
            Self::FieldRequiredChanged { entity_id, field_id, from, to } => {
                write!(f, "FIELD_REQUIRED_CHANGED({entity_id}, {field_id}, {from} -> {to})")
            }
            Self::ConstraintAdded { entity_id, field_id, kind } => {
                write!(f, "CONSTRAINT_ADDED({entity_id}, {field_id}, {kind})")
            }
            Self::ConstraintRemoved { entity_id, field_id, kind } => {
                write!(f, "CONSTRAINT_REMOVED({entity_id}, {field_id}, {kind})")
            }
            Self::ConstraintModified { entity_id, field_id, kind } => {
                write!(f, "CONSTRAINT_MODIFIED({entity_id}, {field_id}, {kind})")
            }
            Self::OptionAdded { entity_id, field_id, value } => {
                write!(f, "OPTION_ADDED({entity_id}, {field_id}, {value})")
            }
            Self::OptionRemoved { entity_id, field_id, value } => {
                write!(f, "OPTION_REMOVED({entity_id}, {field_id}, {value})")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compatibility {
    Identical,
    Compatible,
    Incompatible,
}

impl fmt::Display for Compatibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Identical => "IDENTICAL",
            Self::Compatible => "COMPATIBLE",
            Self::Incompatible => "INCOMPATIBLE",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompareResult {
    pub changes: Vec<SchemaChange>,
    pub compatibility: Compatibility,
    pub suggested_version: Option<SchemaVersion>,
}

/// Structural diff of `source` against `target`. Deterministic: the
/// resulting change list is sorted by entity id, then by change kind,
/// then by field id, regardless of either schema's own entity/field
/// order.
pub fn compare(source: &Schema, target: &Schema) -> CompareResult {
    let mut changes = Vec::new();

    let source_ids: Vec<&str> = source.entities.iter().map(|e| e.id.as_str()).collect();
    let target_ids: Vec<&str> = target.entities.iter().map(|e| e.id.as_str()).collect();

    for id in &source_ids {
        if !target_ids.contains(id) {
            changes.push(SchemaChange::EntityRemoved {
                entity_id: id.to_string(),
            });
        }
    }
    for id in &target_ids {
        if !source_ids.contains(id) {
            changes.push(SchemaChange::EntityAdded {
                entity_id: id.to_string(),
            });
        }
    }

    for source_entity in &source.entities {
        if let Some(target_entity) = target.entities.iter().find(|e| e.id == source_entity.id) {
            compare_entity(source_entity, target_entity, &mut changes);
        }
    }

    changes.sort_by(|a, b| {
        a.entity_id()
            .cmp(b.entity_id())
            .then(a.kind_rank().cmp(&b.kind_rank()))
            .then(a.field_id().cmp(b.field_id()))
    });

    let compatibility = if changes.is_empty() {
        Compatibility::Identical
    } else if changes.iter().any(SchemaChange::is_breaking) {
        Compatibility::Incompatible
    } else {
        Compatibility::Compatible
    };

    let suggested_version = source.version.as_ref().map(|v| suggest_bump(v, &changes));

    CompareResult {
        changes,
        compatibility,
        suggested_version,
    }
}

fn compare_entity(source: &Entity, target: &Entity, changes: &mut Vec<SchemaChange>) {
    let entity_id = source.id.to_string();

    let source_field_ids: Vec<&str> = source.fields().iter().map(|f| f.id.as_str()).collect();
    let target_field_ids: Vec<&str> = target.fields().iter().map(|f| f.id.as_str()).collect();

    for id in &source_field_ids {
        if !target_field_ids.contains(id) {
            changes.push(SchemaChange::FieldRemoved {
                entity_id: entity_id.clone(),
                field_id: id.to_string(),
            });
        }
    }
    for id in &target_field_ids {
        if !source_field_ids.contains(id) {
            changes.push(SchemaChange::FieldAdded {
                entity_id: entity_id.clone(),
                field_id: id.to_string(),
            });
        }
    }

    for source_field in source.fields() {
        let Some(target_field) = target.fields().iter().find(|f| f.id == source_field.id) else {
            continue;
        };
        let field_id = source_field.id.to_string();

        if source_field.field_type != target_field.field_type {
            changes.push(SchemaChange::FieldTypeChanged {
                entity_id: entity_id.clone(),
                field_id: field_id.clone(),
                from: source_field.field_type.to_string(),
                to: target_field.field_type.to_string(),
            });
        }
        if source_field.required != target_field.required {
            changes.push(SchemaChange::FieldRequiredChanged {
                entity_id: entity_id.clone(),
                field_id: field_id.clone(),
                from: source_field.required,
                to: target_field.required,
            });
        }

        let source_kinds: Vec<_> = source_field.constraints.iter().map(|c| c.kind()).collect();
        let target_kinds: Vec<_> = target_field.constraints.iter().map(|c| c.kind()).collect();
        for c in &source_field.constraints {
            if !target_kinds.contains(&c.kind()) {
                changes.push(SchemaChange::ConstraintRemoved {
                    entity_id: entity_id.clone(),
                    field_id: field_id.clone(),
                    kind: c.kind().to_string(),
                });
            }
        }
        for c in &target_field.constraints {
            if !source_kinds.contains(&c.kind()) {
                changes.push(SchemaChange::ConstraintAdded {
                    entity_id: entity_id.clone(),
                    field_id: field_id.clone(),
                    kind: c.kind().to_string(),
                });
            } else if let Some(source_c) = source_field.constraints.iter().find(|sc| sc.kind() == c.kind()) {
                if source_c != c {
                    changes.push(SchemaChange::ConstraintModified {
                        entity_id: entity_id.clone(),
                        field_id: field_id.clone(),
                        kind: c.kind().to_string(),
                    });
                }
            }
        }

        let source_values: Vec<&str> = source_field.options.iter().map(|o| o.value.as_str()).collect();
        let target_values: Vec<&str> = target_field.options.iter().map(|o| o.value.as_str()).collect();
        for value in &source_values {
            if !target_values.contains(value) {
                changes.push(SchemaChange::OptionRemoved {
                    entity_id: entity_id.clone(),
                    field_id: field_id.clone(),
                    value: value.to_string(),
                });
            }
        }
        for value in &target_values {
            if !source_values.contains(value) {
                changes.push(SchemaChange::OptionAdded {
                    entity_id: entity_id.clone(),
                    field_id: field_id.clone(),
                    value: value.to_string(),
                });
            }
        }
    }
}

fn suggest_bump(current: &SchemaVersion, changes: &[SchemaChange]) -> SchemaVersion {
    if changes.is_empty() {
        return current.clone();
    }
    if changes.iter().any(SchemaChange::is_breaking) {
        return current.bump_major();
    }
    if changes.iter().any(is_structural) {
        return current.bump_minor();
    }
    current.bump_patch()
}

fn is_structural(change: &SchemaChange) -> bool {
    matches!(
        change,
        SchemaChange::EntityAdded { .. }
            | SchemaChange::EntityRemoved { .. }
            | SchemaChange::FieldAdded { .. }
            | SchemaChange::FieldRemoved { .. }
            | SchemaChange::FieldTypeChanged { .. }
            | SchemaChange::OptionAdded { .. }
            | SchemaChange::OptionRemoved { .. }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use formcraft_core::{EntityId, Field, FieldId, FieldType, TranslationKey};

    fn entity_with_field(entity_id: &str, field_id: &str) -> Entity {
        let mut e = Entity::new(
            EntityId::new(entity_id).unwrap(),
            TranslationKey::new("k").unwrap(),
            true,
        );
        e.add_field(
            Field::new(
                FieldId::new(field_id).unwrap(),
                FieldType::Text,
                TranslationKey::new("l").unwrap(),
                false,
            )
            .unwrap(),
        )
        .unwrap();
        e
    }

    #[test]
    fn identical_schemas_compare_equal() {
        let mut schema = Schema::new("s1");
        schema.add_entity(entity_with_field("e", "name")).unwrap();
        let result = compare(&schema, &schema);
        assert!(result.changes.is_empty());
        assert_eq!(result.compatibility, Compatibility::Identical);
    }

    #[test]
    fn s5_field_removal_is_incompatible_and_bumps_major() {
        let mut source = Schema::new("s1");
        source.version = Some(SchemaVersion::new(1, 2, 3));
        source.add_entity(entity_with_field("e", "name")).unwrap();

        let mut target = Schema::new("s1");
        target.add_entity(Entity::new(
            EntityId::new("e").unwrap(),
            TranslationKey::new("k").unwrap(),
            true,
        ))
        .unwrap();

        let result = compare(&source, &target);
        assert_eq!(
            result.changes,
            vec![SchemaChange::FieldRemoved {
                entity_id: "e".to_string(),
                field_id: "name".to_string()
            }]
        );
        assert_eq!(result.compatibility, Compatibility::Incompatible);
        assert_eq!(result.suggested_version, Some(SchemaVersion::new(2, 0, 0)));
    }

    #[test]
    fn changes_are_sorted_by_entity_then_kind_then_field() {
        let mut source = Schema::new("s1");
        source.add_entity(entity_with_field("zebra", "z_field")).unwrap();
        source.add_entity(entity_with_field("alpha", "a_field")).unwrap();

        let target = Schema::new("s1");

        let result = compare(&source, &target);
        let entity_ids: Vec<&str> = result.changes.iter().map(|c| c.entity_id()).collect();
        let mut sorted = entity_ids.clone();
        sorted.sort();
        assert_eq!(entity_ids, sorted);
    }
}
