use formcraft_core::{ControlRule, Entity, EntityId, Field, FieldId, FieldType, RuleType, Schema, TranslationKey};
use formcraft_usecases::entity_usecases::add_control_rule;
use formcraft_usecases::export::export;
use formcraft_usecases::import::import_schema;

fn build_schema() -> Schema {
    let mut schema = Schema::new("onboarding");
    let mut entity = Entity::new(EntityId::new("applicant").unwrap(), TranslationKey::new("applicant").unwrap(), true);
    entity
        .add_field(
            Field::new(
                FieldId::new("is_admin").unwrap(),
                FieldType::Checkbox,
                TranslationKey::new("is_admin.label").unwrap(),
                false,
            )
            .unwrap(),
        )
        .unwrap();
    entity
        .add_field(
            Field::new(
                FieldId::new("target").unwrap(),
                FieldType::Text,
                TranslationKey::new("target.label").unwrap(),
                false,
            )
            .unwrap(),
        )
        .unwrap();
    schema.add_entity(entity).unwrap();
    schema
}

#[test]
fn s1_boolean_control_rule_survives_export_import_round_trip() {
    let mut schema = build_schema();
    let entity_id = EntityId::new("applicant").unwrap();
    let field_id = FieldId::new("target").unwrap();

    add_control_rule(
        &mut schema,
        &entity_id,
        &field_id,
        ControlRule::new(RuleType::Visibility, field_id.clone(), "is_admin == true"),
    )
    .unwrap();

    let exported = export(&schema).unwrap();
    let raw = exported.json.to_string();
    let imported = import_schema(&raw).unwrap();

    let entity = imported.schema.entity(&entity_id).unwrap();
    let field = entity.field(&field_id).unwrap();
    assert_eq!(field.control_rules.len(), 1);
    assert_eq!(field.control_rules[0].formula_text, "is_admin == true");
}

#[test]
fn s2_non_boolean_control_rule_is_rejected_before_persisting() {
    let mut schema = build_schema();
    let entity_id = EntityId::new("applicant").unwrap();
    let field_id = FieldId::new("target").unwrap();

    let result = add_control_rule(
        &mut schema,
        &entity_id,
        &field_id,
        ControlRule::new(RuleType::Visibility, field_id.clone(), "1 + 1"),
    );
    assert!(result.is_err());
    assert!(schema
        .entity(&entity_id)
        .unwrap()
        .field(&field_id)
        .unwrap()
        .control_rules
        .is_empty());
}
