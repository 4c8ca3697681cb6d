//! Entity, field, relationship and option use-cases (spec §4.8, §4.9).
//!
//! Every function here follows load -> check -> mutate -> save against a
//! single in-memory `Schema` snapshot passed in by the caller (typically
//! the CLI or view-model layer, after one `SchemaRepository::get_by_id`
//! call). No function re-reads the repository mid-operation.

use formcraft_core::{
    Constraint, ControlRule, Entity, EntityId, Field, FieldId, FieldOption, OutputMapping,
    OutputTarget, Relationship, RuleType, Schema, TranslationKey,
};

use crate::constraints;
use crate::dependencies::{entity_references, field_references};
use crate::error::{Location, UseCaseError};

// --- Entity -----------------------------------------------------------

pub fn create_entity(
    schema: &mut Schema,
    id: EntityId,
    name_key: TranslationKey,
    is_root_entity: bool,
) -> Result<(), UseCaseError> {
    let entity = Entity::new(id, name_key, is_root_entity);
    schema.add_entity(entity)?;
    Ok(())
}

pub fn update_entity_metadata(
    schema: &mut Schema,
    entity_id: &EntityId,
    name_key: TranslationKey,
    description_key: Option<TranslationKey>,
) -> Result<(), UseCaseError> {
    let location = Location(format!("entities[{entity_id}]"));
    let index = schema
        .entities
        .iter()
        .position(|e| &e.id == entity_id)
        .ok_or_else(|| UseCaseError::InvalidReference {
            location: location.clone(),
            message: format!("no entity '{entity_id}'"),
        })?;
    schema.entities[index].name_key = name_key;
    schema.entities[index].description_key = description_key;
    Ok(())
}

/// Invariant 11: an entity cannot be deleted while anything still points
/// at it.
pub fn delete_entity(schema: &mut Schema, entity_id: &EntityId) -> Result<Entity, UseCaseError> {
    let location = Location(format!("entities[{entity_id}]"));
    let refs = entity_references(schema, entity_id.as_str());
    if !refs.is_empty() {
        return Err(UseCaseError::CannotDelete {
            location,
            referring: refs
                .into_iter()
                .map(|r| (r.referring_entity_id, r.referring_field_id))
                .collect(),
        });
    }
    let index = schema
        .entities
        .iter()
        .position(|e| &e.id == entity_id)
        .ok_or_else(|| UseCaseError::InvalidReference {
            location: Location(format!("entities[{entity_id}]")),
            message: format!("no entity '{entity_id}'"),
        })?;
    Ok(schema.entities.remove(index))
}

fn entity_mut<'a>(schema: &'a mut Schema, entity_id: &EntityId) -> Result<&'a mut Entity, UseCaseError> {
    schema
        .entities
        .iter_mut()
        .find(|e| &e.id == entity_id)
        .ok_or_else(|| UseCaseError::InvalidReference {
            location: Location(format!("entities[{entity_id}]")),
            message: format!("no entity '{entity_id}'"),
        })
}

// --- Field --------------------------------------------------------------

pub fn add_field(schema: &mut Schema, entity_id: &EntityId, field: Field) -> Result<(), UseCaseError> {
    let entity = entity_mut(schema, entity_id)?;
    entity.add_field(field)?;
    Ok(())
}

pub fn update_field_metadata(
    schema: &mut Schema,
    entity_id: &EntityId,
    field_id: &FieldId,
    new_field: Field,
) -> Result<(), UseCaseError> {
    let entity = entity_mut(schema, entity_id)?;
    entity.update_field(field_id, new_field)?;
    Ok(())
}

/// Assigns or clears a CALCULATED field's formula, gated by the
/// governance engine (spec §4.4: binding policy) rather than a bare
/// parse check -- a cyclic or type-invalid formula is rejected here.
pub fn set_calculated_formula(
    schema: &mut Schema,
    entity_id: &EntityId,
    field_id: &FieldId,
    formula_text: String,
) -> Result<(), UseCaseError> {
    let location = Location(format!("entities[{entity_id}].fields[{field_id}].formula"));
    let entity = schema
        .entity(entity_id)
        .ok_or_else(|| UseCaseError::InvalidReference {
            location: location.clone(),
            message: format!("no entity '{entity_id}'"),
        })?;
    let mut field = entity
        .field(field_id)
        .ok_or_else(|| UseCaseError::InvalidReference {
            location: location.clone(),
            message: format!("no field '{field_id}'"),
        })?
        .clone();
    if field.field_type != formcraft_core::FieldType::Calculated {
        return Err(UseCaseError::InvalidType {
            location,
            message: "formula may only be set on a CALCULATED field".into(),
        });
    }

    let governance = crate::formula_context::validate_calculated_formula(entity, field_id.as_str(), &formula_text);
    use formcraft_formula::binding::{self, BindingStatus, BindingTarget};
    let status = binding::evaluate(&governance, Some(BindingTarget::CalculatedField));
    if !matches!(status, BindingStatus::Allowed | BindingStatus::Cleared) {
        return Err(UseCaseError::ControlRuleInvalid {
            location,
            message: format!("{status}: {}", governance.blocking_reasons.join("; ")),
        });
    }

    field.formula = if formula_text.trim().is_empty() {
        None
    } else {
        Some(formula_text)
    };
    let entity = entity_mut(schema, entity_id)?;
    entity.update_field(field_id, field)?;
    Ok(())
}

/// Points a LOOKUP field at another entity, gated by invariant 4: the
/// target entity must exist, must not be the field's own owning entity,
/// and `display_field` (if given) must name a displayable-scalar field
/// on the target entity.
pub fn set_lookup_target(
    schema: &mut Schema,
    entity_id: &EntityId,
    field_id: &FieldId,
    lookup_entity_id: EntityId,
    display_field: Option<FieldId>,
) -> Result<(), UseCaseError> {
    let location = Location(format!("entities[{entity_id}].fields[{field_id}].lookup_entity_id"));
    let entity = schema
        .entity(entity_id)
        .ok_or_else(|| UseCaseError::InvalidReference {
            location: location.clone(),
            message: format!("no entity '{entity_id}'"),
        })?;
    let mut field = entity
        .field(field_id)
        .ok_or_else(|| UseCaseError::InvalidReference {
            location: location.clone(),
            message: format!("no field '{field_id}'"),
        })?
        .clone();
    if field.field_type != formcraft_core::FieldType::Lookup {
        return Err(UseCaseError::InvalidType {
            location,
            message: "lookup_entity_id may only be set on a LOOKUP field".into(),
        });
    }
    if &lookup_entity_id == entity_id {
        return Err(UseCaseError::InvalidValue {
            location,
            message: format!("LOOKUP field '{field_id}' cannot target its own owning entity"),
        });
    }
    let target_entity = schema
        .entity(&lookup_entity_id)
        .ok_or_else(|| UseCaseError::InvalidReference {
            location: location.clone(),
            message: format!("no entity '{lookup_entity_id}'"),
        })?;
    if let Some(display_field_id) = &display_field {
        let is_displayable = target_entity
            .field(display_field_id)
            .is_some_and(|f| f.field_type.is_displayable_scalar());
        if !is_displayable {
            return Err(UseCaseError::InvalidReference {
                location,
                message: format!(
                    "'{display_field_id}' on entity '{lookup_entity_id}' is not a displayable scalar field"
                ),
            });
        }
    }

    field.lookup_entity_id = Some(lookup_entity_id);
    field.lookup_display_field = display_field;
    let entity = entity_mut(schema, entity_id)?;
    entity.update_field(field_id, field)?;
    Ok(())
}

/// Points a TABLE field at its child entity, gated by invariant 4: the
/// child entity must exist.
pub fn set_table_child_entity(
    schema: &mut Schema,
    entity_id: &EntityId,
    field_id: &FieldId,
    child_entity_id: EntityId,
) -> Result<(), UseCaseError> {
    let location = Location(format!("entities[{entity_id}].fields[{field_id}].child_entity_id"));
    let entity = schema
        .entity(entity_id)
        .ok_or_else(|| UseCaseError::InvalidReference {
            location: location.clone(),
            message: format!("no entity '{entity_id}'"),
        })?;
    let mut field = entity
        .field(field_id)
        .ok_or_else(|| UseCaseError::InvalidReference {
            location: location.clone(),
            message: format!("no field '{field_id}'"),
        })?
        .clone();
    if field.field_type != formcraft_core::FieldType::Table {
        return Err(UseCaseError::InvalidType {
            location,
            message: "child_entity_id may only be set on a TABLE field".into(),
        });
    }
    if schema.entity(&child_entity_id).is_none() {
        return Err(UseCaseError::InvalidReference {
            location,
            message: format!("no entity '{child_entity_id}'"),
        });
    }

    field.child_entity_id = Some(child_entity_id);
    let entity = entity_mut(schema, entity_id)?;
    entity.update_field(field_id, field)?;
    Ok(())
}

/// Invariant 12: a field cannot be deleted while formulas, control
/// rules, output mappings, or lookup display-field pointers reference it.
pub fn delete_field(
    schema: &mut Schema,
    entity_id: &EntityId,
    field_id: &FieldId,
) -> Result<Field, UseCaseError> {
    let owning = schema
        .entity(entity_id)
        .ok_or_else(|| UseCaseError::InvalidReference {
            location: Location(format!("entities[{entity_id}]")),
            message: format!("no entity '{entity_id}'"),
        })?
        .clone();
    let refs = field_references(schema, &owning, field_id.as_str());
    if !refs.is_empty() {
        return Err(UseCaseError::CannotDelete {
            location: Location(format!("entities[{entity_id}].fields[{field_id}]")),
            referring: refs.into_iter().map(|r| (r, None)).collect(),
        });
    }
    let entity = entity_mut(schema, entity_id)?;
    Ok(entity.remove_field(field_id)?)
}

// --- Constraint -----------------------------------------------------------

pub fn add_constraint(
    schema: &mut Schema,
    entity_id: &EntityId,
    field_id: &FieldId,
    constraint: Constraint,
) -> Result<(), UseCaseError> {
    {
        let entity = schema
            .entity(entity_id)
            .ok_or_else(|| UseCaseError::InvalidReference {
                location: Location(format!("entities[{entity_id}]")),
                message: format!("no entity '{entity_id}'"),
            })?;
        constraints::check_add_constraint(entity, field_id, &constraint)?;
    }
    let entity = entity_mut(schema, entity_id)?;
    let mut field = entity
        .field(field_id)
        .cloned()
        .expect("presence checked by check_add_constraint");
    field.constraints.push(constraint);
    entity.update_field(field_id, field)?;
    Ok(())
}

pub fn delete_constraint(
    schema: &mut Schema,
    entity_id: &EntityId,
    field_id: &FieldId,
    kind: formcraft_core::ConstraintKind,
) -> Result<(), UseCaseError> {
    let entity = entity_mut(schema, entity_id)?;
    let mut field = entity
        .field(field_id)
        .ok_or_else(|| UseCaseError::InvalidReference {
            location: Location(format!("entities[{entity_id}].fields[{field_id}]")),
            message: format!("no field '{field_id}'"),
        })?
        .clone();
    field.constraints.retain(|c| c.kind() != kind);
    entity.update_field(field_id, field)?;
    Ok(())
}

// --- Control rule -----------------------------------------------------------

pub fn add_control_rule(
    schema: &mut Schema,
    entity_id: &EntityId,
    field_id: &FieldId,
    rule: ControlRule,
) -> Result<(), UseCaseError> {
    let location = Location(format!("entities[{entity_id}].fields[{field_id}].control_rules"));
    let entity = schema
        .entity(entity_id)
        .ok_or_else(|| UseCaseError::InvalidReference {
            location: location.clone(),
            message: format!("no entity '{entity_id}'"),
        })?;
    let field_snapshot = entity
        .field(field_id)
        .ok_or_else(|| UseCaseError::InvalidReference {
            location: location.clone(),
            message: format!("no field '{field_id}'"),
        })?
        .clone();
    if entity.field(&rule.target_field_id).is_none() {
        return Err(UseCaseError::InvalidReference {
            location,
            message: format!("no field '{}'", rule.target_field_id),
        });
    }
    if field_snapshot.control_rule_of_type(rule.rule_type).is_some() {
        return Err(UseCaseError::InvalidValue {
            location,
            message: format!("a {} control rule already exists on this field", rule.rule_type),
        });
    }
    let validation = crate::formula_context::validate_control_rule(entity, field_id.as_str(), &rule.formula_text);
    use formcraft_formula::control_rule::RuleStatus;
    match validation.status {
        RuleStatus::Allowed | RuleStatus::Cleared => {}
        RuleStatus::Blocked { block_reason } => {
            return Err(UseCaseError::ControlRuleInvalid {
                location,
                message: block_reason,
            });
        }
    }

    let entity = entity_mut(schema, entity_id)?;
    let mut field = field_snapshot;
    field.control_rules.push(rule);
    entity.update_field(field_id, field)?;
    Ok(())
}

pub fn delete_control_rule(
    schema: &mut Schema,
    entity_id: &EntityId,
    field_id: &FieldId,
    rule_type: RuleType,
) -> Result<(), UseCaseError> {
    let entity = entity_mut(schema, entity_id)?;
    let mut field = entity
        .field(field_id)
        .ok_or_else(|| UseCaseError::InvalidReference {
            location: Location(format!("entities[{entity_id}].fields[{field_id}]")),
            message: format!("no field '{field_id}'"),
        })?
        .clone();
    field.control_rules.retain(|r| r.rule_type != rule_type);
    entity.update_field(field_id, field)?;
    Ok(())
}

// --- Output mapping -----------------------------------------------------------

pub fn add_output_mapping(
    schema: &mut Schema,
    entity_id: &EntityId,
    field_id: &FieldId,
    mapping: OutputMapping,
) -> Result<(), UseCaseError> {
    if mapping.formula_text.trim().is_empty() {
        return Err(UseCaseError::OutputMappingInvalid {
            location: Location(format!("entities[{entity_id}].fields[{field_id}].output_mappings")),
            message: "formula text must not be empty".into(),
        });
    }
    let entity = entity_mut(schema, entity_id)?;
    let mut field = entity
        .field(field_id)
        .ok_or_else(|| UseCaseError::InvalidReference {
            location: Location(format!("entities[{entity_id}].fields[{field_id}]")),
            message: format!("no field '{field_id}'"),
        })?
        .clone();
    if field.output_mapping_for(mapping.target).is_some() {
        return Err(UseCaseError::OutputMappingInvalid {
            location: Location(format!("entities[{entity_id}].fields[{field_id}].output_mappings")),
            message: format!("a {} output mapping already exists on this field", mapping.target),
        });
    }
    field.output_mappings.push(mapping);
    entity.update_field(field_id, field)?;
    Ok(())
}

pub fn delete_output_mapping(
    schema: &mut Schema,
    entity_id: &EntityId,
    field_id: &FieldId,
    target: OutputTarget,
) -> Result<(), UseCaseError> {
    let entity = entity_mut(schema, entity_id)?;
    let mut field = entity
        .field(field_id)
        .ok_or_else(|| UseCaseError::InvalidReference {
            location: Location(format!("entities[{entity_id}].fields[{field_id}]")),
            message: format!("no field '{field_id}'"),
        })?
        .clone();
    field.output_mappings.retain(|m| m.target != target);
    entity.update_field(field_id, field)?;
    Ok(())
}

// --- Options (spec §4.9) -----------------------------------------------------------

pub fn add_option(
    schema: &mut Schema,
    entity_id: &EntityId,
    field_id: &FieldId,
    option: FieldOption,
) -> Result<(), UseCaseError> {
    let entity = entity_mut(schema, entity_id)?;
    let mut field = entity
        .field(field_id)
        .ok_or_else(|| UseCaseError::InvalidReference {
            location: Location(format!("entities[{entity_id}].fields[{field_id}]")),
            message: format!("no field '{field_id}'"),
        })?
        .clone();
    field.options.push(option);
    entity.update_field(field_id, field)?;
    Ok(())
}

pub fn update_option_label(
    schema: &mut Schema,
    entity_id: &EntityId,
    field_id: &FieldId,
    value: &str,
    label_key: TranslationKey,
) -> Result<(), UseCaseError> {
    let location = Location(format!("entities[{entity_id}].fields[{field_id}].options[{value}]"));
    let entity = entity_mut(schema, entity_id)?;
    let mut field = entity
        .field(field_id)
        .ok_or_else(|| UseCaseError::InvalidReference {
            location: location.clone(),
            message: format!("no field '{field_id}'"),
        })?
        .clone();
    let opt = field
        .options
        .iter_mut()
        .find(|o| o.value == value)
        .ok_or_else(|| UseCaseError::InvalidReference {
            location: location.clone(),
            message: format!("no option '{value}'"),
        })?;
    opt.label_key = label_key;
    entity.update_field(field_id, field)?;
    Ok(())
}

pub fn delete_option(
    schema: &mut Schema,
    entity_id: &EntityId,
    field_id: &FieldId,
    value: &str,
) -> Result<(), UseCaseError> {
    let entity = entity_mut(schema, entity_id)?;
    let mut field = entity
        .field(field_id)
        .ok_or_else(|| UseCaseError::InvalidReference {
            location: Location(format!("entities[{entity_id}].fields[{field_id}]")),
            message: format!("no field '{field_id}'"),
        })?
        .clone();
    field.options.retain(|o| o.value != value);
    entity.update_field(field_id, field)?;
    Ok(())
}

/// Reorders options to match `new_order` (a permutation of existing
/// values). Fails on duplicates, omissions, or unknown values.
pub fn reorder_options(
    schema: &mut Schema,
    entity_id: &EntityId,
    field_id: &FieldId,
    new_order: &[String],
) -> Result<(), UseCaseError> {
    let location = Location(format!("entities[{entity_id}].fields[{field_id}].options"));
    let entity = entity_mut(schema, entity_id)?;
    let mut field = entity
        .field(field_id)
        .ok_or_else(|| UseCaseError::InvalidReference {
            location: location.clone(),
            message: format!("no field '{field_id}'"),
        })?
        .clone();

    let mut seen = std::collections::HashSet::new();
    for value in new_order {
        if !seen.insert(value.as_str()) {
            return Err(UseCaseError::InvalidValue {
                location,
                message: format!("duplicate value '{value}' in reorder permutation"),
            });
        }
    }
    if seen.len() != field.options.len() {
        return Err(UseCaseError::InvalidValue {
            location,
            message: "reorder permutation omits or adds values".into(),
        });
    }

    let mut reordered = Vec::with_capacity(field.options.len());
    for value in new_order {
        let pos = field.options.iter().position(|o| &o.value == value).ok_or_else(|| {
            UseCaseError::InvalidValue {
                location: location.clone(),
                message: format!("unknown option value '{value}'"),
            }
        })?;
        reordered.push(field.options.remove(pos));
    }
    field.options = reordered;
    entity.update_field(field_id, field)?;
    Ok(())
}

// --- Relationship -----------------------------------------------------------

pub fn create_relationship(schema: &mut Schema, relationship: Relationship) -> Result<(), UseCaseError> {
    if schema.entity(&relationship.source_entity_id).is_none() {
        return Err(UseCaseError::InvalidReference {
            location: Location(format!("relationships[{}]", relationship.id)),
            message: format!("no entity '{}'", relationship.source_entity_id),
        });
    }
    if schema.entity(&relationship.target_entity_id).is_none() {
        return Err(UseCaseError::InvalidReference {
            location: Location(format!("relationships[{}]", relationship.id)),
            message: format!("no entity '{}'", relationship.target_entity_id),
        });
    }
    schema.relationships.push(relationship);
    Ok(())
}

pub fn update_relationship_metadata(
    schema: &mut Schema,
    relationship_id: &formcraft_core::RelationshipId,
    name_key: TranslationKey,
    description_key: Option<TranslationKey>,
    inverse_name_key: Option<TranslationKey>,
) -> Result<(), UseCaseError> {
    let location = Location(format!("relationships[{relationship_id}]"));
    let rel = schema
        .relationships
        .iter_mut()
        .find(|r| &r.id == relationship_id)
        .ok_or_else(|| UseCaseError::InvalidReference {
            location,
            message: format!("no relationship '{relationship_id}'"),
        })?;
    rel.name_key = name_key;
    rel.description_key = description_key;
    rel.inverse_name_key = inverse_name_key;
    Ok(())
}

pub fn delete_relationship(
    schema: &mut Schema,
    relationship_id: &formcraft_core::RelationshipId,
) -> Result<Relationship, UseCaseError> {
    let location = Location(format!("relationships[{relationship_id}]"));
    let index = schema
        .relationships
        .iter()
        .position(|r| &r.id == relationship_id)
        .ok_or_else(|| UseCaseError::InvalidReference {
            location,
            message: format!("no relationship '{relationship_id}'"),
        })?;
    Ok(schema.relationships.remove(index))
}
