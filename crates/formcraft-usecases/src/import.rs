//! Schema import (spec §4.11): L1 file/JSON, L2 structure, L3 domain
//! conversion, each short-circuiting on failure. L2 accumulates every
//! structural error it finds before failing so callers see the whole list.

use formcraft_core::Schema;

use crate::error::{Location, RepositoryError, UseCaseError};
use crate::formula_context;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImportWarnings {
    pub empty_entities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportResult {
    pub schema: Schema,
    pub warnings: ImportWarnings,
}

/// L1: parses `raw_json` as JSON. A syntax error carries line/column via
/// `serde_json`'s own position tracking.
fn parse_json(raw_json: &str) -> Result<serde_json::Value, UseCaseError> {
    serde_json::from_str(raw_json).map_err(|e| {
        UseCaseError::Repository(RepositoryError::JsonSyntax {
            path: "<input>".into(),
            message: format!("line {}, column {}: {e}", e.line(), e.column()),
        })
    })
}

/// L2: structural shape checks that don't require the full `Schema`
/// type -- missing required keys, wrong JSON types. Collects every
/// problem found rather than stopping at the first.
fn check_structure(value: &serde_json::Value) -> Vec<UseCaseError> {
    let mut errors = Vec::new();
    let Some(root) = value.as_object() else {
        errors.push(UseCaseError::InvalidType {
            location: Location("$".into()),
            message: "root must be a JSON object".into(),
        });
        return errors;
    };

    match root.get("schema_id") {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => {}
        Some(_) => errors.push(UseCaseError::InvalidType {
            location: Location("schema_id".into()),
            message: "must be a non-empty string".into(),
        }),
        None => errors.push(UseCaseError::MissingRequired {
            location: Location("schema_id".into()),
        }),
    }

    match root.get("entities") {
        Some(serde_json::Value::Array(entities)) => {
            for (i, entity) in entities.iter().enumerate() {
                check_entity_shape(entity, i, &mut errors);
            }
        }
        Some(_) => errors.push(UseCaseError::InvalidType {
            location: Location("entities".into()),
            message: "must be an array".into(),
        }),
        None => errors.push(UseCaseError::MissingRequired {
            location: Location("entities".into()),
        }),
    }

    if let Some(relationships) = root.get("relationships") {
        if !relationships.is_array() {
            errors.push(UseCaseError::InvalidType {
                location: Location("relationships".into()),
                message: "must be an array".into(),
            });
        }
    }

    errors
}

fn check_entity_shape(entity: &serde_json::Value, index: usize, errors: &mut Vec<UseCaseError>) {
    let location = Location(format!("entities[{index}]"));
    let Some(obj) = entity.as_object() else {
        errors.push(UseCaseError::InvalidType {
            location,
            message: "entity must be an object".into(),
        });
        return;
    };
    for key in ["id", "name_key"] {
        match obj.get(key) {
            Some(serde_json::Value::String(s)) if !s.trim().is_empty() => {}
            _ => errors.push(UseCaseError::MissingRequired {
                location: Location(format!("{location}.{key}")),
            }),
        }
    }
    if !matches!(obj.get("is_root_entity"), Some(serde_json::Value::Bool(_))) {
        errors.push(UseCaseError::MissingRequired {
            location: Location(format!("{location}.is_root_entity")),
        });
    }
    match obj.get("fields") {
        Some(serde_json::Value::Array(fields)) => {
            for (j, field) in fields.iter().enumerate() {
                check_field_shape(field, &location, j, errors);
            }
        }
        _ => errors.push(UseCaseError::MissingRequired {
            location: Location(format!("{location}.fields")),
        }),
    }
}

const KNOWN_CONSTRAINT_TYPES: &[&str] = &[
    "RequiredConstraint",
    "MinLengthConstraint",
    "MaxLengthConstraint",
    "MinValueConstraint",
    "MaxValueConstraint",
    "PatternConstraint",
    "AllowedValuesConstraint",
    "FileExtensionConstraint",
    "MaxFileSizeConstraint",
];

fn check_field_shape(field: &serde_json::Value, entity_location: &Location, index: usize, errors: &mut Vec<UseCaseError>) {
    let location = Location(format!("{entity_location}.fields[{index}]"));
    let Some(obj) = field.as_object() else {
        errors.push(UseCaseError::InvalidType {
            location,
            message: "field must be an object".into(),
        });
        return;
    };
    for key in ["id", "label_key"] {
        match obj.get(key) {
            Some(serde_json::Value::String(s)) if !s.trim().is_empty() => {}
            _ => errors.push(UseCaseError::MissingRequired {
                location: Location(format!("{location}.{key}")),
            }),
        }
    }
    match obj.get("field_type").and_then(|v| v.as_str()) {
        Some(ft) if is_known_field_type(ft) => {}
        _ => errors.push(UseCaseError::InvalidValue {
            location: Location(format!("{location}.field_type")),
            message: "not a recognized field type".into(),
        }),
    }
    if !matches!(obj.get("required"), Some(serde_json::Value::Bool(_))) {
        errors.push(UseCaseError::MissingRequired {
            location: Location(format!("{location}.required")),
        });
    }

    if let Some(serde_json::Value::Array(constraints)) = obj.get("constraints") {
        for (k, constraint) in constraints.iter().enumerate() {
            let constraint_type = constraint.get("constraint_type").and_then(|v| v.as_str());
            match constraint_type {
                Some(ct) if KNOWN_CONSTRAINT_TYPES.contains(&ct) => {}
                Some(ct) => errors.push(UseCaseError::UnknownConstraint {
                    location: Location(format!("{location}.constraints[{k}]")),
                    constraint_type: ct.to_string(),
                }),
                None => errors.push(UseCaseError::MissingRequired {
                    location: Location(format!("{location}.constraints[{k}].constraint_type")),
                }),
            }
        }
    }
}

fn is_known_field_type(s: &str) -> bool {
    matches!(
        s,
        "text" | "textarea" | "number" | "date" | "dropdown" | "radio" | "checkbox" | "calculated"
            | "lookup" | "file" | "image" | "table"
    )
}

/// L3: converts the checked JSON into a `Schema`, then re-validates
/// control rules and output mappings in context.
fn convert(value: serde_json::Value) -> Result<Schema, UseCaseError> {
    let schema: Schema = serde_json::from_value(value).map_err(|e| UseCaseError::InvalidValue {
        location: Location("$".into()),
        message: format!("failed to convert to a schema: {e}"),
    })?;

    schema.check_invariants()?;

    for entity in &schema.entities {
        for field in entity.fields() {
            field.check_self_contained_invariants()?;
            for rule in &field.control_rules {
                let validation = formula_context::validate_control_rule(entity, field.id.as_str(), &rule.formula_text);
                use formcraft_formula::control_rule::RuleStatus;
                if let RuleStatus::Blocked { block_reason } = validation.status {
                    return Err(UseCaseError::ControlRuleInvalid {
                        location: Location(format!("entities[{}].fields[{}].control_rules", entity.id, field.id)),
                        message: block_reason,
                    });
                }
            }
            for mapping in &field.output_mappings {
                if mapping.formula_text.trim().is_empty() {
                    return Err(UseCaseError::OutputMappingInvalid {
                        location: Location(format!("entities[{}].fields[{}].output_mappings", entity.id, field.id)),
                        message: "formula text must not be empty".into(),
                    });
                }
            }
        }
    }

    Ok(schema)
}

pub fn import_schema(raw_json: &str) -> Result<ImportResult, Vec<UseCaseError>> {
    let value = parse_json(raw_json).map_err(|e| vec![e])?;

    let structure_errors = check_structure(&value);
    if !structure_errors.is_empty() {
        return Err(structure_errors);
    }

    let schema = convert(value).map_err(|e| vec![e])?;

    let mut warnings = ImportWarnings::default();
    for entity in &schema.entities {
        if entity.fields().is_empty() {
            warnings.empty_entities.push(entity.id.to_string());
        }
    }

    Ok(ImportResult { schema, warnings })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s6_unknown_constraint_type_fails_strictly() {
        let raw = serde_json::json!({
            "schema_id": "s1",
            "entities": [{
                "id": "contact",
                "name_key": "k",
                "is_root_entity": true,
                "fields": [{
                    "id": "name",
                    "field_type": "text",
                    "label_key": "name.label",
                    "required": false,
                    "constraints": [{"constraint_type": "FooConstraint", "parameters": {}}]
                }]
            }]
        })
        .to_string();

        let result = import_schema(&raw);
        let errors = result.unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, UseCaseError::UnknownConstraint { constraint_type, .. } if constraint_type == "FooConstraint")));
    }

    #[test]
    fn well_formed_schema_round_trips() {
        let raw = serde_json::json!({
            "schema_id": "s1",
            "entities": [{
                "id": "contact",
                "name_key": "k",
                "is_root_entity": true,
                "fields": [{
                    "id": "name",
                    "field_type": "text",
                    "label_key": "name.label",
                    "required": true
                }]
            }]
        })
        .to_string();

        let result = import_schema(&raw).unwrap();
        assert_eq!(result.schema.schema_id, "s1");
        assert_eq!(result.schema.entities.len(), 1);
    }

    #[test]
    fn missing_schema_id_is_reported() {
        let raw = serde_json::json!({"entities": []}).to_string();
        let errors = import_schema(&raw).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, UseCaseError::MissingRequired { location } if location.0 == "schema_id")));
    }
}
