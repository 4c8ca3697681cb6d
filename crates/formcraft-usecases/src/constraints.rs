//! Constraint application service (spec §4.7): the steps `add_constraint`
//! runs on top of what `Field::check_self_contained_invariants` already
//! guarantees once the constraint is in place.

use formcraft_core::{Constraint, Entity, FieldId, FieldType};

use crate::error::{Location, UseCaseError};

fn field_type_name(ft: FieldType) -> String {
    ft.to_string()
}

/// Validates that `constraint` may be added to `field_id` on `entity`,
/// without mutating anything. The caller appends the constraint and
/// calls `Field::check_self_contained_invariants` (covers uniqueness and
/// ordering) before saving.
pub fn check_add_constraint(
    entity: &Entity,
    field_id: &FieldId,
    constraint: &Constraint,
) -> Result<(), UseCaseError> {
    let location = Location(format!("entities[{}].fields[{field_id}]", entity.id));
    let field = entity.field(field_id).ok_or_else(|| UseCaseError::InvalidReference {
        location: location.clone(),
        message: format!("no field '{field_id}' on entity '{}'", entity.id),
    })?;

    if field.field_type == FieldType::Calculated {
        return Err(UseCaseError::InvalidType {
            location,
            message: "CALCULATED fields cannot carry constraints".into(),
        });
    }

    if !constraint.is_compatible_with(field.field_type) {
        return Err(UseCaseError::InvalidType {
            location,
            message: format!(
                "{} is not compatible with field type {}",
                constraint.kind(),
                field_type_name(field.field_type)
            ),
        });
    }

    if field.constraint_of_kind(constraint.kind()).is_some() {
        return Err(UseCaseError::InvalidValue {
            location,
            message: format!("a {} constraint already exists on this field", constraint.kind()),
        });
    }

    Ok(())
}
