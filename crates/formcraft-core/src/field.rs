//! The `Field` aggregate member and the invariants it can check without
//! consulting the owning entity or schema (invariants 3, 6, 7, 9).
//!
//! Invariants that require cross-entity knowledge (4, 5, 10, 11, 12) are
//! enforced by `Entity` and by the use-case layer, which alone has access
//! to the full schema.

use serde::{Deserialize, Serialize};

use crate::constraint::{Constraint, ConstraintKind};
use crate::error::SchemaError;
use crate::field_type::FieldType;
use crate::ids::{EntityId, FieldId, TranslationKey};
use crate::option::{self, FieldOption};
use crate::rule::{ControlRule, OutputMapping, OutputTarget, RuleType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub id: FieldId,
    pub field_type: FieldType,
    pub label_key: TranslationKey,
    pub help_text_key: Option<TranslationKey>,
    pub required: bool,
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub control_rules: Vec<ControlRule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub output_mappings: Vec<OutputMapping>,
    pub formula: Option<String>,
    pub lookup_entity_id: Option<EntityId>,
    pub lookup_display_field: Option<FieldId>,
    pub child_entity_id: Option<EntityId>,
}

impl Field {
    pub fn new(
        id: FieldId,
        field_type: FieldType,
        label_key: TranslationKey,
        required: bool,
    ) -> Result<Self, SchemaError> {
        let field = Self {
            id,
            field_type,
            label_key,
            help_text_key: None,
            required,
            default_value: None,
            options: Vec::new(),
            constraints: Vec::new(),
            control_rules: Vec::new(),
            output_mappings: Vec::new(),
            formula: None,
            lookup_entity_id: None,
            lookup_display_field: None,
            child_entity_id: None,
        };
        field.check_self_contained_invariants()?;
        Ok(field)
    }

    /// Invariants that can be checked from the field's own data (3, 6, 7, 9).
    /// Cross-entity invariants (4, 5) are checked by the entity aggregate.
    pub fn check_self_contained_invariants(&self) -> Result<(), SchemaError> {
        if self.field_type == FieldType::Calculated {
            if self.required {
                return Err(SchemaError::CalculatedFieldIsRequired {
                    field_id: self.id.to_string(),
                });
            }
            if !self.constraints.is_empty() {
                return Err(SchemaError::CalculatedFieldHasConstraints {
                    field_id: self.id.to_string(),
                });
            }
        }

        if self.field_type.is_choice() {
            if let Some(dup) = option::find_duplicate_value(&self.options) {
                return Err(SchemaError::DuplicateOptionValue {
                    field_id: self.id.to_string(),
                    value: dup.to_string(),
                });
            }
        }

        self.check_constraint_uniqueness()?;
        self.check_constraint_ordering()?;
        self.check_control_rule_uniqueness()?;
        self.check_output_mapping_uniqueness()?;

        Ok(())
    }

    fn check_constraint_uniqueness(&self) -> Result<(), SchemaError> {
        let mut seen = std::collections::HashSet::new();
        for c in &self.constraints {
            if !seen.insert(c.kind()) {
                return Err(SchemaError::DuplicateConstraintKind {
                    field_id: self.id.to_string(),
                    kind: c.kind().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Invariant 9: MinValue ≤ MaxValue, MinLength ≤ MaxLength.
    fn check_constraint_ordering(&self) -> Result<(), SchemaError> {
        let min_value = self.constraints.iter().find_map(|c| match c {
            Constraint::MinValue { min_value, .. } => Some(*min_value),
            _ => None,
        });
        let max_value = self.constraints.iter().find_map(|c| match c {
            Constraint::MaxValue { max_value, .. } => Some(*max_value),
            _ => None,
        });
        if let (Some(min), Some(max)) = (min_value, max_value) {
            if min > max {
                return Err(SchemaError::ConstraintOrderingViolation {
                    field_id: self.id.to_string(),
                    message: format!("MinValue {min} exceeds MaxValue {max}"),
                });
            }
        }

        let min_length = self.constraints.iter().find_map(|c| match c {
            Constraint::MinLength { min_length, .. } => Some(*min_length),
            _ => None,
        });
        let max_length = self.constraints.iter().find_map(|c| match c {
            Constraint::MaxLength { max_length, .. } => Some(*max_length),
            _ => None,
        });
        if let (Some(min), Some(max)) = (min_length, max_length) {
            if min > max {
                return Err(SchemaError::ConstraintOrderingViolation {
                    field_id: self.id.to_string(),
                    message: format!("MinLength {min} exceeds MaxLength {max}"),
                });
            }
        }
        Ok(())
    }

    fn check_control_rule_uniqueness(&self) -> Result<(), SchemaError> {
        let mut seen = std::collections::HashSet::new();
        for r in &self.control_rules {
            if !seen.insert(r.rule_type) {
                return Err(SchemaError::DuplicateControlRule {
                    field_id: self.id.to_string(),
                    rule_type: r.rule_type.to_string(),
                });
            }
        }
        Ok(())
    }

    fn check_output_mapping_uniqueness(&self) -> Result<(), SchemaError> {
        let mut seen = std::collections::HashSet::new();
        for m in &self.output_mappings {
            if !seen.insert(m.target) {
                return Err(SchemaError::DuplicateOutputMapping {
                    field_id: self.id.to_string(),
                    target: m.target.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn constraint_of_kind(&self, kind: ConstraintKind) -> Option<&Constraint> {
        self.constraints.iter().find(|c| c.kind() == kind)
    }

    pub fn control_rule_of_type(&self, rule_type: RuleType) -> Option<&ControlRule> {
        self.control_rules.iter().find(|r| r.rule_type == rule_type)
    }

    pub fn output_mapping_for(&self, target: OutputTarget) -> Option<&OutputMapping> {
        self.output_mappings.iter().find(|m| m.target == target)
    }
}
