//! Property tests for the whole-schema invariants that only the
//! use-case layer can exercise (spec §8, invariants 5 and 6).

use proptest::prelude::*;

use formcraft_core::{Entity, EntityId, Field, FieldId, FieldType, Schema, TranslationKey};
use formcraft_usecases::compare::{compare, Compatibility};
use formcraft_usecases::export::export;
use formcraft_usecases::import::import_schema;

fn tk(s: &str) -> TranslationKey {
    TranslationKey::new(s).unwrap()
}

/// Builds a schema with `entity_count` entities, each carrying one
/// required TEXT field named after its index -- enough structural
/// variety to exercise compare/export/import without tripping any
/// field-type-specific invariant.
fn arbitrary_schema(schema_id: &str, entity_count: usize) -> Schema {
    let mut schema = Schema::new(schema_id);
    for i in 0..entity_count {
        let entity_id = EntityId::new(format!("entity_{i}")).unwrap();
        let mut entity = Entity::new(entity_id, tk("entity.label"), i == 0);
        let field = Field::new(
            FieldId::new(format!("field_{i}")).unwrap(),
            FieldType::Text,
            tk("field.label"),
            i % 2 == 0,
        )
        .unwrap();
        entity.add_field(field).unwrap();
        schema.add_entity(entity).unwrap();
    }
    schema
}

proptest! {
    /// Invariant 5: comparing a schema against itself always reports
    /// IDENTICAL with no changes, regardless of its shape.
    #[test]
    fn invariant_5_compare_self_is_always_identical(entity_count in 0usize..8) {
        let schema = arbitrary_schema("s1", entity_count);
        let result = compare(&schema, &schema);
        prop_assert_eq!(result.compatibility, Compatibility::Identical);
        prop_assert!(result.changes.is_empty());
    }

    /// Invariant 6: exporting then importing a schema preserves every
    /// entity and field id, whatever the entity count.
    #[test]
    fn invariant_6_export_import_round_trip_preserves_structure(entity_count in 1usize..8) {
        let schema = arbitrary_schema("s1", entity_count);
        let export_result = export(&schema).unwrap();
        let raw = export_result.json.to_string();

        let import_result = import_schema(&raw).unwrap();
        let roundtripped = import_result.schema;

        let original_ids: Vec<&str> = schema.entities.iter().map(|e| e.id.as_str()).collect();
        let roundtripped_ids: Vec<&str> = roundtripped.entities.iter().map(|e| e.id.as_str()).collect();
        prop_assert_eq!(original_ids.clone(), roundtripped_ids);

        for entity in &schema.entities {
            let other = roundtripped.entity(&entity.id).unwrap();
            let original_field_ids: Vec<&str> = entity.fields().iter().map(|f| f.id.as_str()).collect();
            let roundtripped_field_ids: Vec<&str> = other.fields().iter().map(|f| f.id.as_str()).collect();
            prop_assert_eq!(original_field_ids, roundtripped_field_ids);
        }

        // re-comparing the round-tripped schema against the original must
        // show no structural changes either.
        let diff = compare(&schema, &roundtripped);
        prop_assert!(diff.changes.is_empty());
    }
}
