//! Binding policy (Phase F-7, spec §4.4): decides whether a formula may
//! be bound to a target kind.

use std::fmt;

use crate::governance::GovernanceResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingTarget {
    CalculatedField,
    ValidationRule,
    OutputMapping,
}

/// The currently supported binding targets. Activating `ValidationRule`
/// or `OutputMapping` later is a change to this constant, not a schema
/// migration -- see DESIGN.md's Open Question decision.
pub const SUPPORTED_BINDING_TARGETS: &[BindingTarget] = &[BindingTarget::CalculatedField];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingStatus {
    NoTarget,
    Cleared,
    BlockedInvalidFormula,
    BlockedUnsupportedTarget,
    Allowed,
}

impl fmt::Display for BindingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NoTarget => "NO_TARGET",
            Self::Cleared => "CLEARED",
            Self::BlockedInvalidFormula => "BLOCKED_INVALID_FORMULA",
            Self::BlockedUnsupportedTarget => "BLOCKED_UNSUPPORTED_TARGET",
            Self::Allowed => "ALLOWED",
        };
        f.write_str(s)
    }
}

pub fn evaluate(
    governance: &GovernanceResult,
    target: Option<BindingTarget>,
) -> BindingStatus {
    use crate::governance::GovernanceStatus;

    let Some(target) = target else {
        return BindingStatus::NoTarget;
    };

    if governance.status == GovernanceStatus::Empty {
        return BindingStatus::Cleared;
    }

    if governance.status == GovernanceStatus::Invalid {
        return BindingStatus::BlockedInvalidFormula;
    }

    if !SUPPORTED_BINDING_TARGETS.contains(&target) {
        return BindingStatus::BlockedUnsupportedTarget;
    }

    BindingStatus::Allowed
}
