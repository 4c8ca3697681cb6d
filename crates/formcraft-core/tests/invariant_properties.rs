//! Property tests for the universal invariants a `Field`/`Schema` must
//! hold after any mutation (spec §8, invariants 1, 2, 3, 7).

use proptest::prelude::*;

use formcraft_core::constraint::{Constraint, Severity};
use formcraft_core::field::Field;
use formcraft_core::field_type::FieldType;
use formcraft_core::ids::{EntityId, FieldId, TranslationKey};
use formcraft_core::schema::Schema;
use formcraft_core::Entity;

fn tk(s: &str) -> TranslationKey {
    TranslationKey::new(s).unwrap()
}

fn min_length(n: u32) -> Constraint {
    Constraint::MinLength {
        min_length: n,
        severity: Severity::Error,
    }
}

fn max_length(n: u32) -> Constraint {
    Constraint::MaxLength {
        max_length: n,
        severity: Severity::Error,
    }
}

proptest! {
    /// Invariant 1: a field can never carry two constraints of the same
    /// kind, however many times one is appended and checked.
    #[test]
    fn invariant_1_constraint_kinds_stay_unique(lengths in prop::collection::vec(1u32..100, 1..5)) {
        let mut field = Field::new(FieldId::new("name").unwrap(), FieldType::Text, tk("name.label"), false).unwrap();
        field.constraints.push(min_length(lengths[0]));
        let first_check = field.check_self_contained_invariants();
        prop_assert!(first_check.is_ok());

        for len in &lengths[1..] {
            field.constraints.push(min_length(*len));
            // every kind past the first duplicate must be rejected
            prop_assert!(field.check_self_contained_invariants().is_err());
            field.constraints.pop();
        }
    }

    /// Invariant 2: a CALCULATED field is never required and never
    /// carries constraints, regardless of which flags/constraints a
    /// caller tries to attach.
    #[test]
    fn invariant_2_calculated_field_has_no_constraints_or_required(required in any::<bool>(), attach_constraint in any::<bool>()) {
        let mut field = Field::new(FieldId::new("total").unwrap(), FieldType::Calculated, tk("total.label"), false).unwrap();
        field.required = required;
        if attach_constraint {
            field.constraints.push(Constraint::Required { severity: Severity::Error });
        }

        let result = field.check_self_contained_invariants();
        if required || attach_constraint {
            prop_assert!(result.is_err());
        } else {
            prop_assert!(result.is_ok());
        }
    }

    /// Invariant 3: a LOOKUP field's target entity may never equal its
    /// own owning entity, regardless of the ids chosen.
    #[test]
    fn invariant_3_lookup_field_cannot_target_owning_entity(owner in "[a-z]{3,10}", other in "[a-z]{3,10}") {
        prop_assume!(owner != other);

        let mut entity = Entity::new(EntityId::new(&owner).unwrap(), tk("k"), true);
        let mut field = Field::new(FieldId::new("ref").unwrap(), FieldType::Lookup, tk("ref.label"), false).unwrap();
        field.lookup_entity_id = Some(EntityId::new(&owner).unwrap());
        entity.add_field(field).unwrap();

        let mut schema = Schema::new("s1");
        schema.add_entity(entity).unwrap();
        // self-reference must always be rejected
        prop_assert!(schema.check_invariants().is_err());

        // retargeting at a distinct, existing entity must always succeed
        let mut schema2 = Schema::new("s1");
        let target = Entity::new(EntityId::new(&other).unwrap(), tk("k"), true);
        let mut owning = Entity::new(EntityId::new(&owner).unwrap(), tk("k"), true);
        let mut field2 = Field::new(FieldId::new("ref").unwrap(), FieldType::Lookup, tk("ref.label"), false).unwrap();
        field2.lookup_entity_id = Some(EntityId::new(&other).unwrap());
        owning.add_field(field2).unwrap();
        schema2.add_entity(target).unwrap();
        schema2.add_entity(owning).unwrap();
        prop_assert!(schema2.check_invariants().is_ok());
    }

    /// Invariant 7: whenever both a MIN and MAX of the same kind are
    /// present, the min must never exceed the max.
    #[test]
    fn invariant_7_min_never_exceeds_max(a in 0u32..200, b in 0u32..200) {
        let mut field = Field::new(FieldId::new("name").unwrap(), FieldType::Text, tk("name.label"), false).unwrap();
        field.constraints.push(min_length(a));
        field.constraints.push(max_length(b));

        let result = field.check_self_contained_invariants();
        if a > b {
            prop_assert!(result.is_err());
        } else {
            prop_assert!(result.is_ok());
        }
    }
}
