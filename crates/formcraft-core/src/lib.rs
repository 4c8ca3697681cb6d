//! Design-time schema kernel: typed entities, fields, constraints, and the
//! invariants that must hold after every mutation.
//!
//! This crate has no knowledge of formulas, persistence, or presentation.
//! It is pure: no I/O, no clocks, no randomness.

pub mod constraint;
pub mod entity;
pub mod error;
pub mod field;
pub mod field_type;
pub mod ids;
pub mod option;
pub mod relationship;
pub mod rule;
pub mod schema;
pub mod version;

pub use constraint::{Constraint, ConstraintKind, Severity};
pub use entity::Entity;
pub use error::SchemaError;
pub use field::Field;
pub use field_type::FieldType;
pub use ids::{EntityId, FieldId, RelationshipId, TranslationKey};
pub use option::FieldOption;
pub use relationship::{Relationship, RelationshipType};
pub use rule::{ControlRule, OutputMapping, OutputTarget, RuleType};
pub use schema::Schema;
pub use version::SchemaVersion;
