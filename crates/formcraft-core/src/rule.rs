//! Control rules and output mappings. Both bind opaque `formula_text` to
//! a target; the formula itself is never parsed here (spec §9: "formula
//! text is opaque at the schema layer").

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::FieldId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RuleType {
    Visibility,
    Enabled,
    Required,
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Visibility => write!(f, "VISIBILITY"),
            Self::Enabled => write!(f, "ENABLED"),
            Self::Required => write!(f, "REQUIRED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlRule {
    pub rule_type: RuleType,
    pub target_field_id: FieldId,
    pub formula_text: String,
}

impl ControlRule {
    pub fn new(rule_type: RuleType, target_field_id: FieldId, formula_text: impl Into<String>) -> Self {
        Self {
            rule_type,
            target_field_id,
            formula_text: formula_text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutputTarget {
    Text,
    Number,
    Boolean,
}

impl fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "TEXT"),
            Self::Number => write!(f, "NUMBER"),
            Self::Boolean => write!(f, "BOOLEAN"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputMapping {
    pub target: OutputTarget,
    pub formula_text: String,
}

impl OutputMapping {
    pub fn new(target: OutputTarget, formula_text: impl Into<String>) -> Self {
        Self {
            target,
            formula_text: formula_text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_type_display_matches_wire_format() {
        assert_eq!(RuleType::Visibility.to_string(), "VISIBILITY");
    }

    #[test]
    fn serde_uppercase() {
        let json = serde_json::to_string(&OutputTarget::Boolean).unwrap();
        assert_eq!(json, "\"BOOLEAN\"");
    }
}
