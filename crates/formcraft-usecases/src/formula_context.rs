//! Builds the formula-analyzer inputs (`known_fields`, cycle graph) from
//! a schema snapshot, and the integration points between the formula
//! crate's pure pipeline and the schema aggregate's use-cases.

use std::collections::{HashMap, HashSet};

use formcraft_core::{Entity, FieldType};
use formcraft_formula::value::InferredType;
use formcraft_formula::{analyzer, control_rule, governance, parser};

fn inferred_type_for(field_type: FieldType) -> InferredType {
    match field_type {
        FieldType::Number => InferredType::Number,
        FieldType::Date => InferredType::Date,
        FieldType::Checkbox => InferredType::Boolean,
        FieldType::Text | FieldType::Textarea | FieldType::Dropdown | FieldType::Radio => {
            InferredType::Text
        }
        FieldType::Calculated | FieldType::Lookup | FieldType::File | FieldType::Image | FieldType::Table => {
            InferredType::Unknown
        }
    }
}

/// The set of field ids and their inferred type, scoped to one entity --
/// formula references only ever resolve within the owning entity.
pub fn known_fields(entity: &Entity) -> HashMap<String, InferredType> {
    entity
        .fields()
        .iter()
        .map(|f| (f.id.to_string(), inferred_type_for(f.field_type)))
        .collect()
}

/// Extracts the field ids a formula references, by parsing it and
/// walking the referenced names against `entity`'s known field ids.
/// Unparseable text yields an empty set -- callers that need the error
/// go through `formcraft_formula::analyzer::validate` directly.
fn referenced_field_ids(formula_text: &str, entity: &Entity) -> HashSet<String> {
    let known = known_fields(entity);
    analyzer::dependencies(formula_text, &known)
        .into_iter()
        .map(|dep| dep.field_id)
        .collect()
}

/// Builds the `field_id -> referenced_field_ids` graph from every
/// CALCULATED field's formula in `entity`, for cycle analysis (spec
/// §4.2, §8 property S3).
pub fn dependency_graph(entity: &Entity) -> HashMap<String, HashSet<String>> {
    let mut graph = HashMap::new();
    for field in entity.fields() {
        if let Some(formula) = &field.formula {
            graph.insert(field.id.to_string(), referenced_field_ids(formula, entity));
        }
    }
    graph
}

/// Validates that `formula_text` may be bound to a CALCULATED field
/// named `field_id` in `entity`, given the cycle analysis of the whole
/// entity's formula graph. Returns the governance result so callers can
/// render warnings as well as hard errors.
pub fn validate_calculated_formula(
    entity: &Entity,
    field_id: &str,
    formula_text: &str,
) -> governance::GovernanceResult {
    let known = known_fields(entity);
    let graph = dependency_graph(entity);
    let cycles = analyzer::analyze_cycles(&graph);
    governance::classify(formula_text, &known, Some(field_id), &cycles.all_cycle_field_ids)
}

pub fn validate_control_rule(
    entity: &Entity,
    field_id: &str,
    formula_text: &str,
) -> control_rule::RuleValidation {
    let known = known_fields(entity);
    let graph = dependency_graph(entity);
    let cycles = analyzer::analyze_cycles(&graph);
    control_rule::validate_rule(formula_text, &known, Some(field_id), &cycles.all_cycle_field_ids)
}

/// Previews a control rule against in-memory field values (spec §4.6).
pub fn preview_control_rule(
    entity: &Entity,
    field_id: &str,
    formula_text: &str,
    values: &HashMap<String, formcraft_formula::Value>,
) -> Result<bool, control_rule::PreviewError> {
    let known = known_fields(entity);
    let graph = dependency_graph(entity);
    let cycles = analyzer::analyze_cycles(&graph);
    control_rule::preview(
        formula_text,
        &known,
        Some(field_id),
        &cycles.all_cycle_field_ids,
        values,
    )
}

/// Re-validates a field's formula assignment at parse time only (used
/// by callers that just need a syntax/reference check, e.g. import L3).
pub fn parses_cleanly(formula_text: &str) -> bool {
    parser::parse(formula_text).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use formcraft_core::{EntityId, Field, FieldId, TranslationKey};

    fn entity_with_cycle() -> Entity {
        let mut e = Entity::new(EntityId::new("e").unwrap(), TranslationKey::new("k").unwrap(), true);
        let mut a = Field::new(
            FieldId::new("a").unwrap(),
            FieldType::Calculated,
            TranslationKey::new("a.label").unwrap(),
            false,
        )
        .unwrap();
        a.formula = Some("{{b}} + 1".into());
        let mut b = Field::new(
            FieldId::new("b").unwrap(),
            FieldType::Calculated,
            TranslationKey::new("b.label").unwrap(),
            false,
        )
        .unwrap();
        b.formula = Some("{{a}} + 1".into());
        e.add_field(a).unwrap();
        e.add_field(b).unwrap();
        e
    }

    #[test]
    fn s3_cycle_in_entity_blocks_governance() {
        let entity = entity_with_cycle();
        let result = validate_calculated_formula(&entity, "a", "{{b}} + 1");
        assert_eq!(result.status, governance::GovernanceStatus::Invalid);
    }
}
