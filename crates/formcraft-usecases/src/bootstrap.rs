//! Bootstrap and sanitization (spec §4.13). Bootstrap provisioning of
//! the persistent store's tables/collections is the repository's job
//! (`formcraft-fsrepo` creates its JSON file and parent directories);
//! this module owns the sanitization pass that runs against whatever
//! the repository loaded.

use formcraft_core::{FieldType, Schema};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SanitizationReport {
    /// `(entity_id, field_id)` of LOOKUP fields deleted for having no
    /// `lookup_entity_id`.
    pub deleted_dangling_lookups: Vec<(String, String)>,
    /// `(entity_id, field_id)` of CALCULATED fields stripped of a
    /// constraint set that should never have been non-empty.
    pub stripped_calculated_constraints: Vec<(String, String)>,
}

impl SanitizationReport {
    pub fn is_clean(&self) -> bool {
        self.deleted_dangling_lookups.is_empty() && self.stripped_calculated_constraints.is_empty()
    }
}

/// Deletes corrupt data that violates hard invariants: LOOKUP fields
/// with no `lookup_entity_id`, and any constraint attached to a
/// CALCULATED field. Valid data is untouched. Per-field failures are
/// logged by the caller and skipped -- this function never fails itself,
/// since it only ever removes data, never rejects it.
pub fn sanitize(schema: &mut Schema) -> SanitizationReport {
    let mut report = SanitizationReport::default();

    for entity in &mut schema.entities {
        let entity_id = entity.id.to_string();
        let dangling: Vec<String> = entity
            .fields()
            .iter()
            .filter(|f| f.field_type == FieldType::Lookup && f.lookup_entity_id.is_none())
            .map(|f| f.id.to_string())
            .collect();

        for field_id in dangling {
            if let Ok(id) = formcraft_core::FieldId::new(field_id.clone()) {
                if entity.remove_field(&id).is_ok() {
                    report.deleted_dangling_lookups.push((entity_id.clone(), field_id));
                }
            }
        }

        for field in entity.fields().to_vec() {
            if field.field_type == FieldType::Calculated && !field.constraints.is_empty() {
                let mut cleaned = field.clone();
                cleaned.constraints = Vec::new();
                if entity.update_field(&field.id, cleaned).is_ok() {
                    report
                        .stripped_calculated_constraints
                        .push((entity_id.clone(), field.id.to_string()));
                }
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use formcraft_core::{Entity, EntityId, Field, FieldId, TranslationKey};

    #[test]
    fn deletes_dangling_lookup_field() {
        let mut schema = Schema::new("s1");
        let mut entity = Entity::new(EntityId::new("order").unwrap(), TranslationKey::new("k").unwrap(), true);
        entity
            .add_field(
                Field::new(
                    FieldId::new("customer").unwrap(),
                    FieldType::Lookup,
                    TranslationKey::new("customer.label").unwrap(),
                    false,
                )
                .unwrap(),
            )
            .unwrap();
        schema.add_entity(entity).unwrap();

        let report = sanitize(&mut schema);
        assert_eq!(
            report.deleted_dangling_lookups,
            vec![("order".to_string(), "customer".to_string())]
        );
        assert!(schema.entities[0].fields().is_empty());
    }

    #[test]
    fn strips_constraints_from_calculated_field() {
        // Built by deserialization, not the `Entity`/`Field` constructors,
        // to simulate a corrupt row arriving straight from storage --
        // the aggregate's own invariant checks would otherwise make this
        // state unreachable.
        let entity: Entity = serde_json::from_value(serde_json::json!({
            "id": "invoice",
            "name_key": "k",
            "is_root_entity": true,
            "fields": [{
                "id": "total",
                "field_type": "calculated",
                "label_key": "total.label",
                "help_text_key": null,
                "required": false,
                "default_value": null,
                "constraints": [{"constraint_type": "RequiredConstraint", "severity": "ERROR"}],
                "formula": null,
                "lookup_entity_id": null,
                "lookup_display_field": null,
                "child_entity_id": null
            }]
        }))
        .unwrap();
        let mut schema = Schema::new("s1");
        schema.add_entity(entity).unwrap();

        let report = sanitize(&mut schema);
        assert_eq!(
            report.stripped_calculated_constraints,
            vec![("invoice".to_string(), "total".to_string())]
        );
        assert!(schema.entities[0].fields()[0].constraints.is_empty());
    }

    #[test]
    fn valid_data_is_untouched() {
        let mut schema = Schema::new("s1");
        let mut entity = Entity::new(EntityId::new("contact").unwrap(), TranslationKey::new("k").unwrap(), true);
        entity
            .add_field(
                Field::new(
                    FieldId::new("name").unwrap(),
                    FieldType::Text,
                    TranslationKey::new("name.label").unwrap(),
                    false,
                )
                .unwrap(),
            )
            .unwrap();
        schema.add_entity(entity).unwrap();

        let report = sanitize(&mut schema);
        assert!(report.is_clean());
    }
}
