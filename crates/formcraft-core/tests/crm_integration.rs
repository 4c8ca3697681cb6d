use formcraft_core::constraint::{Constraint, Severity};
use formcraft_core::field::Field;
use formcraft_core::field_type::FieldType;
use formcraft_core::ids::{EntityId, FieldId, TranslationKey};
use formcraft_core::schema::Schema;
use formcraft_core::{Entity, SchemaError};

fn tk(s: &str) -> TranslationKey {
    TranslationKey::new(s).unwrap()
}

#[test]
fn build_a_contact_schema() {
    let mut contact = Entity::new(EntityId::new("contact").unwrap(), tk("entity.contact"), true);

    let name = Field::new(FieldId::new("name").unwrap(), FieldType::Text, tk("field.name"), true).unwrap();
    contact.add_field(name).unwrap();

    let mut age = Field::new(FieldId::new("age").unwrap(), FieldType::Number, tk("field.age"), false).unwrap();
    age.constraints.push(Constraint::MinValue {
        min_value: 0.0,
        severity: Severity::Error,
    });
    age.constraints.push(Constraint::MaxValue {
        max_value: 150.0,
        severity: Severity::Error,
    });
    contact.add_field(age).unwrap();

    let mut schema = Schema::new("crm");
    schema.add_entity(contact).unwrap();
    schema.check_invariants().unwrap();

    assert_eq!(schema.entities.len(), 1);
    assert_eq!(schema.entity(&EntityId::new("contact").unwrap()).unwrap().fields().len(), 2);
}

#[test]
fn duplicate_entity_rejected_schema_wide() {
    let mut schema = Schema::new("crm");
    let e1 = Entity::new(EntityId::new("contact").unwrap(), tk("entity.contact"), true);
    schema.add_entity(e1.clone()).unwrap();
    assert!(matches!(schema.add_entity(e1), Err(SchemaError::DuplicateEntityId { .. })));
}
