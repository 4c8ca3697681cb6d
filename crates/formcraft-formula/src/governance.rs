//! The governance engine: classifies a formula into EMPTY / INVALID /
//! VALID_WITH_WARNINGS / VALID (spec §4.3).

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::analyzer::{self, AnalysisResult};
use crate::value::InferredType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GovernanceStatus {
    Empty,
    Invalid,
    ValidWithWarnings,
    Valid,
}

impl fmt::Display for GovernanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Empty => "EMPTY",
            Self::Invalid => "INVALID",
            Self::ValidWithWarnings => "VALID_WITH_WARNINGS",
            Self::Valid => "VALID",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GovernanceResult {
    pub status: GovernanceStatus,
    pub analysis: AnalysisResult,
    pub blocking_reasons: Vec<String>,
    pub warning_reasons: Vec<String>,
}

impl GovernanceResult {
    pub fn is_allowed(&self) -> bool {
        matches!(
            self.status,
            GovernanceStatus::Empty | GovernanceStatus::Valid | GovernanceStatus::ValidWithWarnings
        )
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self.status, GovernanceStatus::Invalid)
    }
}

/// `owning_field_id` identifies the field this formula lives on, so
/// membership in `cycle_field_ids` (from `analyzer::analyze_cycles`) can
/// force INVALID even when the formula type-checks in isolation (S3).
pub fn classify(
    text: &str,
    known_fields: &HashMap<String, InferredType>,
    owning_field_id: Option<&str>,
    cycle_field_ids: &HashSet<String>,
) -> GovernanceResult {
    if text.trim().is_empty() {
        return GovernanceResult {
            status: GovernanceStatus::Empty,
            analysis: AnalysisResult {
                errors: Vec::new(),
                warnings: Vec::new(),
                inferred_type: InferredType::Unknown,
            },
            blocking_reasons: Vec::new(),
            warning_reasons: Vec::new(),
        };
    }

    let analysis = analyzer::validate(text, known_fields);
    let mut blocking_reasons = analysis.errors.clone();

    let in_cycle = owning_field_id.is_some_and(|id| cycle_field_ids.contains(id));
    if in_cycle {
        blocking_reasons.push(format!(
            "field '{}' participates in a formula dependency cycle",
            owning_field_id.unwrap_or_default()
        ));
    }

    let status = if !blocking_reasons.is_empty() {
        GovernanceStatus::Invalid
    } else if !analysis.warnings.is_empty() {
        GovernanceStatus::ValidWithWarnings
    } else {
        GovernanceStatus::Valid
    };

    GovernanceResult {
        warning_reasons: analysis.warnings.clone(),
        blocking_reasons,
        analysis,
        status,
    }
}
