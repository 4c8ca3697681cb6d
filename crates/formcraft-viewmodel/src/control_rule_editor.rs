//! Observable state for a control-rule (VISIBILITY/ENABLED/REQUIRED)
//! editor (spec §4.14).

use formcraft_core::{Entity, RuleType};
use formcraft_formula::analyzer;
use formcraft_formula::control_rule::RuleStatus;
use formcraft_formula::governance::GovernanceStatus;
use formcraft_formula::value::InferredType;
use formcraft_usecases::formula_context;

use crate::publisher::PropertyPublisher;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlRuleEditorProperty {
    FormulaText,
    InferredType,
    IsValid,
    Errors,
    Warnings,
    Dependencies,
    UnknownFields,
    CycleAnalysis,
    GovernanceStatus,
    RuleType,
    TargetFieldId,
    IsRuleAllowed,
    IsRuleBlocked,
    IsBooleanFormula,
    BlockingReason,
    AllDiagnosticErrors,
    AllDiagnosticWarnings,
    AllDiagnosticInfo,
    StatusMessage,
}

const ALL_PROPERTIES: &[ControlRuleEditorProperty] = &[
    ControlRuleEditorProperty::FormulaText,
    ControlRuleEditorProperty::InferredType,
    ControlRuleEditorProperty::IsValid,
    ControlRuleEditorProperty::Errors,
    ControlRuleEditorProperty::Warnings,
    ControlRuleEditorProperty::Dependencies,
    ControlRuleEditorProperty::UnknownFields,
    ControlRuleEditorProperty::CycleAnalysis,
    ControlRuleEditorProperty::GovernanceStatus,
    ControlRuleEditorProperty::RuleType,
    ControlRuleEditorProperty::TargetFieldId,
    ControlRuleEditorProperty::IsRuleAllowed,
    ControlRuleEditorProperty::IsRuleBlocked,
    ControlRuleEditorProperty::IsBooleanFormula,
    ControlRuleEditorProperty::BlockingReason,
    ControlRuleEditorProperty::AllDiagnosticErrors,
    ControlRuleEditorProperty::AllDiagnosticWarnings,
    ControlRuleEditorProperty::AllDiagnosticInfo,
    ControlRuleEditorProperty::StatusMessage,
];

pub struct ControlRuleEditorViewModel {
    entity: Entity,
    rule_type: RuleType,
    target_field_id: String,

    formula_text: String,
    inferred_type: InferredType,
    errors: Vec<String>,
    warnings: Vec<String>,
    dependencies: Vec<String>,
    unknown_fields: Vec<String>,
    cycle_analysis: Vec<String>,
    governance_status: GovernanceStatus,
    status: RuleStatus,
    status_message: String,
    info: Vec<String>,

    publisher: PropertyPublisher<ControlRuleEditorProperty>,
}

impl ControlRuleEditorViewModel {
    pub fn new(entity: Entity, rule_type: RuleType, target_field_id: impl Into<String>) -> Self {
        let mut vm = Self {
            entity,
            rule_type,
            target_field_id: target_field_id.into(),
            formula_text: String::new(),
            inferred_type: InferredType::Unknown,
            errors: Vec::new(),
            warnings: Vec::new(),
            dependencies: Vec::new(),
            unknown_fields: Vec::new(),
            cycle_analysis: Vec::new(),
            governance_status: GovernanceStatus::Empty,
            status: RuleStatus::Cleared,
            status_message: String::new(),
            info: Vec::new(),
            publisher: PropertyPublisher::new(),
        };
        vm.recompute();
        vm
    }

    pub fn subscribe(&mut self, property: ControlRuleEditorProperty, subscriber: crate::publisher::Subscriber) {
        self.publisher.subscribe(property, subscriber);
    }

    pub fn set_formula_text(&mut self, text: impl Into<String>) {
        self.formula_text = text.into();
        self.recompute();
    }

    pub fn set_schema_context(&mut self, entity: Entity) {
        self.entity = entity;
        self.recompute();
    }

    /// Reduces the rule to CLEARED without persisting, e.g. a "clear
    /// rule" button in the editor before the user commits a save.
    pub fn clear_rule(&mut self) {
        self.formula_text.clear();
        self.recompute();
    }

    pub fn dispose(&mut self) {
        self.publisher.clear();
        self.formula_text.clear();
        self.recompute();
    }

    fn recompute(&mut self) {
        let known = formula_context::known_fields(&self.entity);
        let validation = formula_context::validate_control_rule(
            &self.entity,
            &self.target_field_id,
            &self.formula_text,
        );

        let deps = analyzer::dependencies(&self.formula_text, &known);
        self.dependencies = deps.iter().map(|d| d.field_id.clone()).collect();
        self.unknown_fields = deps
            .iter()
            .filter(|d| !d.known)
            .map(|d| d.field_id.clone())
            .collect();

        let graph = formula_context::dependency_graph(&self.entity);
        let cycles = analyzer::analyze_cycles(&graph);
        self.cycle_analysis = cycles
            .all_cycle_field_ids
            .iter()
            .filter(|id| self.dependencies.contains(id) || *id == &self.target_field_id)
            .cloned()
            .collect();
        self.cycle_analysis.sort();

        self.inferred_type = validation.governance.analysis.inferred_type;
        self.errors = validation.governance.blocking_reasons.clone();
        self.warnings = validation.governance.warning_reasons.clone();
        self.governance_status = validation.governance.status;
        self.status = validation.status.clone();

        self.status_message = match &self.status {
            RuleStatus::Cleared => "no rule set".to_string(),
            RuleStatus::Blocked { block_reason } => format!("blocked: {block_reason}"),
            RuleStatus::Allowed => "allowed".to_string(),
        };

        self.info.clear();
        if !self.formula_text.trim().is_empty() {
            self.info.push(format!("Result type: {}", self.inferred_type));
            if !self.dependencies.is_empty() {
                self.info.push(format!("Depends on: {}", self.dependencies.join(", ")));
            }
            self.info
                .push(format!("Analyzed {} field(s)", known.len()));
        }

        self.publisher.notify_all(ALL_PROPERTIES);
    }

    pub fn formula_text(&self) -> &str {
        &self.formula_text
    }

    pub fn inferred_type(&self) -> InferredType {
        self.inferred_type
    }

    pub fn is_valid(&self) -> bool {
        self.governance_status != GovernanceStatus::Invalid
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    pub fn unknown_fields(&self) -> &[String] {
        &self.unknown_fields
    }

    pub fn cycle_analysis(&self) -> &[String] {
        &self.cycle_analysis
    }

    pub fn governance_status(&self) -> GovernanceStatus {
        self.governance_status
    }

    pub fn rule_type(&self) -> RuleType {
        self.rule_type
    }

    pub fn target_field_id(&self) -> &str {
        &self.target_field_id
    }

    pub fn is_rule_allowed(&self) -> bool {
        matches!(self.status, RuleStatus::Allowed)
    }

    pub fn is_rule_blocked(&self) -> bool {
        matches!(self.status, RuleStatus::Blocked { .. })
    }

    pub fn is_boolean_formula(&self) -> bool {
        self.inferred_type == InferredType::Boolean
    }

    pub fn blocking_reason(&self) -> Option<&str> {
        match &self.status {
            RuleStatus::Blocked { block_reason } => Some(block_reason),
            _ => None,
        }
    }

    pub fn all_diagnostic_errors(&self) -> &[String] {
        &self.errors
    }

    pub fn all_diagnostic_warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn all_diagnostic_info(&self) -> &[String] {
        &self.info
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formcraft_core::{EntityId, Field, FieldId, FieldType, TranslationKey};

    fn entity_with_checkbox() -> Entity {
        let mut e = Entity::new(EntityId::new("e").unwrap(), TranslationKey::new("k").unwrap(), true);
        e.add_field(
            Field::new(
                FieldId::new("is_admin").unwrap(),
                FieldType::Checkbox,
                TranslationKey::new("is_admin.label").unwrap(),
                false,
            )
            .unwrap(),
        )
        .unwrap();
        e
    }

    #[test]
    fn boolean_formula_is_allowed() {
        let mut vm = ControlRuleEditorViewModel::new(entity_with_checkbox(), RuleType::Visibility, "target");
        vm.set_formula_text("is_admin == true");
        assert!(vm.is_rule_allowed());
        assert!(vm.is_boolean_formula());
        assert!(vm.blocking_reason().is_none());
    }

    #[test]
    fn non_boolean_formula_is_blocked_with_reason() {
        let mut vm = ControlRuleEditorViewModel::new(entity_with_checkbox(), RuleType::Visibility, "target");
        vm.set_formula_text("1 + 1");
        assert!(vm.is_rule_blocked());
        assert!(vm.blocking_reason().unwrap().contains("BOOLEAN"));
    }

    #[test]
    fn diagnostic_info_reports_result_type_and_dependencies() {
        let mut vm = ControlRuleEditorViewModel::new(entity_with_checkbox(), RuleType::Visibility, "target");
        vm.set_formula_text("is_admin == true");

        let info = vm.all_diagnostic_info();
        assert!(info.iter().any(|i| i.contains("Result type:")));
        assert!(info.iter().any(|i| i.contains("Depends on:") && i.contains("is_admin")));
        assert!(info.iter().any(|i| i.contains("Analyzed")));
    }

    #[test]
    fn clear_rule_reduces_to_cleared_without_persisting() {
        let mut vm = ControlRuleEditorViewModel::new(entity_with_checkbox(), RuleType::Visibility, "target");
        vm.set_formula_text("is_admin == true");
        assert!(vm.is_rule_allowed());

        vm.clear_rule();
        assert_eq!(vm.formula_text(), "");
        assert!(!vm.is_rule_allowed());
        assert!(!vm.is_rule_blocked());
    }
}
