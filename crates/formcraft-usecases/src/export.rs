//! Schema export (spec §4.10): hard invariant checks, quality warnings,
//! refuse-to-overwrite, then serialize to JSON.

use formcraft_core::Schema;

use crate::error::{Location, RepositoryError, UseCaseError};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExportWarnings {
    pub empty_entities: Vec<String>,
    pub fields_without_help_text: Vec<(String, String)>,
    pub excluded_formulas: usize,
    pub excluded_lookup_references: usize,
    pub excluded_table_children: usize,
}

impl ExportWarnings {
    pub fn is_empty(&self) -> bool {
        self.empty_entities.is_empty()
            && self.fields_without_help_text.is_empty()
            && self.excluded_formulas == 0
            && self.excluded_lookup_references == 0
            && self.excluded_table_children == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportResult {
    pub json: serde_json::Value,
    pub warnings: ExportWarnings,
}

/// Hard invariant checks (step 2) plus quality-warning collection (step
/// 3). Does not touch the filesystem -- callers decide where the bytes
/// land and whether the target already exists.
pub fn export(schema: &Schema) -> Result<ExportResult, UseCaseError> {
    let total_fields: usize = schema.entities.iter().map(|e| e.fields().len()).sum();
    if schema.entities.is_empty() || total_fields == 0 {
        return Err(UseCaseError::InvalidValue {
            location: Location("entities".into()),
            message: "schema must contain at least one entity with at least one field".into(),
        });
    }

    if schema.schema_id.trim().is_empty() {
        return Err(UseCaseError::MissingRequired {
            location: Location("schema_id".into()),
        });
    }

    for entity in &schema.entities {
        if entity.name_key.as_str().trim().is_empty() {
            return Err(UseCaseError::MissingRequired {
                location: Location(format!("entities[{}].name_key", entity.id)),
            });
        }
        for field in entity.fields() {
            if field.label_key.as_str().trim().is_empty() {
                return Err(UseCaseError::MissingRequired {
                    location: Location(format!("entities[{}].fields[{}].label_key", entity.id, field.id)),
                });
            }
        }
    }

    let mut warnings = ExportWarnings::default();
    for entity in &schema.entities {
        if entity.fields().is_empty() {
            warnings.empty_entities.push(entity.id.to_string());
        }
        for field in entity.fields() {
            if field.help_text_key.is_none() {
                warnings
                    .fields_without_help_text
                    .push((entity.id.to_string(), field.id.to_string()));
            }
            if field.formula.is_some() {
                warnings.excluded_formulas += 1;
            }
            if field.lookup_entity_id.is_some() {
                warnings.excluded_lookup_references += 1;
            }
            if field.child_entity_id.is_some() {
                warnings.excluded_table_children += 1;
            }
        }
    }

    let mut json = serde_json::to_value(schema).map_err(|e| {
        UseCaseError::Repository(RepositoryError::Other {
            message: format!("failed to serialize schema: {e}"),
        })
    })?;
    strip_excluded_behavioral_links(&mut json);

    Ok(ExportResult { json, warnings })
}

/// Step 7: `formula`, `lookup_entity_id`, `lookup_display_field` and
/// `child_entity_id` are behavioral links, not exportable document
/// structure -- the warnings collected above already count them. This
/// only trims the export `Value`; the internal storage format (what
/// `formcraft-fsrepo` round-trips through `Schema`'s own `Serialize`
/// impl) keeps them.
fn strip_excluded_behavioral_links(json: &mut serde_json::Value) {
    let Some(entities) = json.get_mut("entities").and_then(|v| v.as_array_mut()) else {
        return;
    };
    for entity in entities {
        let Some(fields) = entity.get_mut("fields").and_then(|v| v.as_array_mut()) else {
            continue;
        };
        for field in fields {
            if let Some(obj) = field.as_object_mut() {
                obj.remove("formula");
                obj.remove("lookup_entity_id");
                obj.remove("lookup_display_field");
                obj.remove("child_entity_id");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formcraft_core::{Entity, EntityId, Field, FieldType, TranslationKey};

    #[test]
    fn empty_schema_is_rejected() {
        let schema = Schema::new("s1");
        assert!(matches!(export(&schema), Err(UseCaseError::InvalidValue { .. })));
    }

    #[test]
    fn entity_with_no_fields_warns_but_does_not_fail() {
        let mut schema = Schema::new("s1");
        let mut populated = Entity::new(
            EntityId::new("contact").unwrap(),
            TranslationKey::new("k").unwrap(),
            true,
        );
        populated
            .add_field(
                Field::new(
                    formcraft_core::FieldId::new("name").unwrap(),
                    FieldType::Text,
                    TranslationKey::new("name.label").unwrap(),
                    false,
                )
                .unwrap(),
            )
            .unwrap();
        let empty = Entity::new(
            EntityId::new("ghost").unwrap(),
            TranslationKey::new("k2").unwrap(),
            false,
        );
        schema.add_entity(populated).unwrap();
        schema.add_entity(empty).unwrap();

        let result = export(&schema).unwrap();
        assert_eq!(result.warnings.empty_entities, vec!["ghost".to_string()]);
    }

    #[test]
    fn excludes_behavioral_links_from_export_json() {
        let mut schema = Schema::new("s1");
        let mut entity = Entity::new(
            EntityId::new("invoice").unwrap(),
            TranslationKey::new("k").unwrap(),
            true,
        );
        let mut total = Field::new(
            formcraft_core::FieldId::new("total").unwrap(),
            FieldType::Calculated,
            TranslationKey::new("total.label").unwrap(),
            false,
        )
        .unwrap();
        total.formula = Some("[qty] * 2".into());
        entity.add_field(total).unwrap();
        schema.add_entity(entity).unwrap();

        let result = export(&schema).unwrap();
        let field_json = &result.json["entities"][0]["fields"][0];
        assert!(field_json.get("formula").is_none());
        assert_eq!(result.warnings.excluded_formulas, 1);
    }
}
