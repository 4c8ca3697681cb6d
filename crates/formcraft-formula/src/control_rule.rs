//! Control-rule validator (spec §4.5) and previewer (spec §4.6).

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::eval::{self, EvalError};
use crate::governance::{self, GovernanceResult, GovernanceStatus};
use crate::parser::parse;
use crate::value::{InferredType, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum RuleStatus {
    Allowed,
    Blocked { block_reason: String },
    Cleared,
}

impl fmt::Display for RuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allowed => write!(f, "ALLOWED"),
            Self::Blocked { block_reason } => write!(f, "BLOCKED: {block_reason}"),
            Self::Cleared => write!(f, "CLEARED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleValidation {
    pub status: RuleStatus,
    pub governance: GovernanceResult,
}

/// Wraps the formula analyzer and adds the BOOLEAN-result requirement.
pub fn validate_rule(
    text: &str,
    known_fields: &HashMap<String, InferredType>,
    owning_field_id: Option<&str>,
    cycle_field_ids: &HashSet<String>,
) -> RuleValidation {
    let governance = governance::classify(text, known_fields, owning_field_id, cycle_field_ids);

    let status = match governance.status {
        GovernanceStatus::Empty => RuleStatus::Cleared,
        GovernanceStatus::Invalid => RuleStatus::Blocked {
            block_reason: governance.blocking_reasons.join("; "),
        },
        GovernanceStatus::Valid | GovernanceStatus::ValidWithWarnings => {
            if governance.analysis.inferred_type == InferredType::Boolean {
                RuleStatus::Allowed
            } else {
                RuleStatus::Blocked {
                    block_reason: format!(
                        "control rule must evaluate to BOOLEAN, found {}",
                        governance.analysis.inferred_type
                    ),
                }
            }
        }
    };

    RuleValidation { status, governance }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PreviewError {
    NotAllowed(RuleStatus),
    Eval(EvalError),
}

impl fmt::Display for PreviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAllowed(status) => write!(f, "rule is not previewable: {status}"),
            Self::Eval(e) => write!(f, "{e}"),
        }
    }
}

/// Validates the rule, then (if ALLOWED) evaluates it against `values`.
/// Pure: no persistence, no I/O.
pub fn preview(
    text: &str,
    known_fields: &HashMap<String, InferredType>,
    owning_field_id: Option<&str>,
    cycle_field_ids: &HashSet<String>,
    values: &HashMap<String, Value>,
) -> Result<bool, PreviewError> {
    let validation = validate_rule(text, known_fields, owning_field_id, cycle_field_ids);
    if validation.status != RuleStatus::Allowed {
        return Err(PreviewError::NotAllowed(validation.status));
    }
    let expr = parse(text).expect("ALLOWED status implies the formula parses");
    match eval::evaluate(&expr, values).map_err(PreviewError::Eval)? {
        Value::Boolean(b) => Ok(b),
        other => Err(PreviewError::Eval(EvalError::TypeMismatch(format!(
            "expected BOOLEAN at preview time, found {}",
            other.inferred_type()
        )))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, InferredType)]) -> HashMap<String, InferredType> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn values(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
        pairs.iter().cloned().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn s1_boolean_rule_allowed() {
        let known = fields(&[("is_admin", InferredType::Boolean)]);
        let result = validate_rule("is_admin == true", &known, None, &HashSet::new());
        assert_eq!(result.status, RuleStatus::Allowed);
    }

    #[test]
    fn s2_non_boolean_rule_blocked_mentions_types() {
        let known = fields(&[("age", InferredType::Number)]);
        let result = validate_rule("age + 10", &known, None, &HashSet::new());
        match result.status {
            RuleStatus::Blocked { block_reason } => {
                assert!(block_reason.contains("BOOLEAN"));
                assert!(block_reason.contains("NUMBER"));
            }
            other => panic!("expected Blocked, got {other:?}"),
        }
    }

    #[test]
    fn empty_formula_is_cleared() {
        let result = validate_rule("   ", &fields(&[]), None, &HashSet::new());
        assert_eq!(result.status, RuleStatus::Cleared);
    }

    #[test]
    fn preview_evaluates_allowed_rule() {
        let known = fields(&[("is_admin", InferredType::Boolean)]);
        let vals = values(&[("is_admin", Value::Boolean(true))]);
        let result = preview("is_admin == true", &known, None, &HashSet::new(), &vals);
        assert_eq!(result, Ok(true));
    }

    #[test]
    fn preview_rejects_non_boolean_rule() {
        let known = fields(&[("age", InferredType::Number)]);
        let vals = values(&[("age", Value::Number(5.0))]);
        let result = preview("age + 10", &known, None, &HashSet::new(), &vals);
        assert!(matches!(result, Err(PreviewError::NotAllowed(_))));
    }
}
