//! Cross-entity dependency scanning backing invariants 11 and 12: an
//! entity or field cannot be deleted while something else in the schema
//! still refers to it.

use formcraft_core::{Entity, Schema};

/// Where a reference to `entity_id` was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityReference {
    pub referring_entity_id: String,
    pub referring_field_id: Option<String>,
    pub kind: ReferenceKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Lookup,
    TableChild,
    Relationship,
    ParentEntity,
}

/// Every place in `schema` that points at `entity_id`, other than
/// `entity_id` itself.
pub fn entity_references(schema: &Schema, entity_id: &str) -> Vec<EntityReference> {
    let mut refs = Vec::new();

    for entity in &schema.entities {
        if entity.id.as_str() == entity_id {
            continue;
        }
        if entity.parent_entity_id.as_ref().map(|id| id.as_str()) == Some(entity_id) {
            refs.push(EntityReference {
                referring_entity_id: entity.id.to_string(),
                referring_field_id: None,
                kind: ReferenceKind::ParentEntity,
            });
        }
        for field in entity.fields() {
            if field.lookup_entity_id.as_ref().map(|id| id.as_str()) == Some(entity_id) {
                refs.push(EntityReference {
                    referring_entity_id: entity.id.to_string(),
                    referring_field_id: Some(field.id.to_string()),
                    kind: ReferenceKind::Lookup,
                });
            }
            if field.child_entity_id.as_ref().map(|id| id.as_str()) == Some(entity_id) {
                refs.push(EntityReference {
                    referring_entity_id: entity.id.to_string(),
                    referring_field_id: Some(field.id.to_string()),
                    kind: ReferenceKind::TableChild,
                });
            }
        }
    }

    for rel in &schema.relationships {
        if rel.source_entity_id.as_str() == entity_id || rel.target_entity_id.as_str() == entity_id {
            refs.push(EntityReference {
                referring_entity_id: rel.id.to_string(),
                referring_field_id: None,
                kind: ReferenceKind::Relationship,
            });
        }
    }

    refs
}

/// Where a reference to `field_id` (within `owning_entity`) was found:
/// formula text, control-rule targets, or another field's lookup
/// display-field pointer. Formula/control-rule text is scanned with a
/// plain substring test against the `{{field_id}}` token shape, which is
/// how the formula lexer spells a field reference.
pub fn field_references(schema: &Schema, owning_entity: &Entity, field_id: &str) -> Vec<String> {
    let needle = format!("{{{{{field_id}}}}}");
    let mut refs = Vec::new();

    for entity in &schema.entities {
        for field in entity.fields() {
            if let Some(formula) = &field.formula {
                if formula.contains(&needle) {
                    refs.push(format!("{}.{}: formula", entity.id, field.id));
                }
            }
            for rule in &field.control_rules {
                if rule.formula_text.contains(&needle) || rule.target_field_id.as_str() == field_id {
                    refs.push(format!("{}.{}: control rule", entity.id, field.id));
                }
            }
            for mapping in &field.output_mappings {
                if mapping.formula_text.contains(&needle) {
                    refs.push(format!("{}.{}: output mapping", entity.id, field.id));
                }
            }
            if entity.id.as_str() == owning_entity.id.as_str()
                && field.lookup_display_field.as_ref().map(|id| id.as_str()) == Some(field_id)
            {
                refs.push(format!("{}.{}: lookup display field", entity.id, field.id));
            }
        }
    }

    refs
}

#[cfg(test)]
mod tests {
    use super::*;
    use formcraft_core::{Entity, EntityId, Field, FieldId, FieldType, Schema, TranslationKey};

    fn new_entity(id: &str) -> Entity {
        Entity::new(
            EntityId::new(id).unwrap(),
            TranslationKey::new(format!("{id}.name")).unwrap(),
            false,
        )
    }

    #[test]
    fn lookup_reference_is_found() {
        let parent = new_entity("contact");
        let mut child = new_entity("order");
        let mut lookup_field = Field::new(
            FieldId::new("customer").unwrap(),
            FieldType::Lookup,
            TranslationKey::new("customer.label").unwrap(),
            false,
        )
        .unwrap();
        lookup_field.lookup_entity_id = Some(EntityId::new("contact").unwrap());
        child.add_field(lookup_field).unwrap();

        let mut schema = Schema::new("s1");
        schema.add_entity(parent).unwrap();
        schema.add_entity(child).unwrap();

        let refs = entity_references(&schema, "contact");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].kind, ReferenceKind::Lookup);
        assert_eq!(refs[0].referring_entity_id, "order");
    }

    #[test]
    fn formula_reference_to_field_is_found() {
        let mut entity = new_entity("invoice");
        let qty = Field::new(
            FieldId::new("qty").unwrap(),
            FieldType::Number,
            TranslationKey::new("qty.label").unwrap(),
            false,
        )
        .unwrap();
        let mut total = Field::new(
            FieldId::new("total").unwrap(),
            FieldType::Calculated,
            TranslationKey::new("total.label").unwrap(),
            false,
        )
        .unwrap();
        total.formula = Some("{{qty}} * 2".into());
        entity.add_field(qty).unwrap();
        entity.add_field(total).unwrap();

        let mut schema = Schema::new("s1");
        schema.add_entity(entity.clone()).unwrap();

        let refs = field_references(&schema, &entity, "qty");
        assert_eq!(refs, vec!["invoice.total: formula".to_string()]);
    }

    #[test]
    fn control_rule_target_reference_is_found_even_without_formula_mention() {
        use formcraft_core::{ControlRule, RuleType};

        let mut entity = new_entity("invoice");
        let status = Field::new(
            FieldId::new("status").unwrap(),
            FieldType::Text,
            TranslationKey::new("status.label").unwrap(),
            false,
        )
        .unwrap();
        let mut trigger = Field::new(
            FieldId::new("trigger").unwrap(),
            FieldType::Checkbox,
            TranslationKey::new("trigger.label").unwrap(),
            false,
        )
        .unwrap();
        trigger.control_rules.push(ControlRule::new(
            RuleType::Visibility,
            FieldId::new("status").unwrap(),
            "true",
        ));
        entity.add_field(status).unwrap();
        entity.add_field(trigger).unwrap();

        let mut schema = Schema::new("s1");
        schema.add_entity(entity.clone()).unwrap();

        let refs = field_references(&schema, &entity, "status");
        assert_eq!(refs, vec!["invoice.trigger: control rule".to_string()]);
    }
}
