//! Observable state for a calculated-field formula editor (spec §4.14).

use formcraft_core::Entity;
use formcraft_formula::analyzer;
use formcraft_formula::binding::{self, BindingStatus, BindingTarget};
use formcraft_formula::governance::GovernanceStatus;
use formcraft_formula::value::InferredType;
use formcraft_usecases::formula_context;

use crate::publisher::PropertyPublisher;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormulaEditorProperty {
    FormulaText,
    InferredType,
    IsValid,
    Errors,
    Warnings,
    Dependencies,
    UnknownFields,
    CycleAnalysis,
    GovernanceStatus,
    IsFormulaAllowed,
    IsFormulaBlocked,
    BindingTarget,
    BindingStatus,
    CanSaveBinding,
    AllDiagnosticErrors,
    AllDiagnosticWarnings,
    AllDiagnosticInfo,
    StatusMessage,
}

const ALL_PROPERTIES: &[FormulaEditorProperty] = &[
    FormulaEditorProperty::FormulaText,
    FormulaEditorProperty::InferredType,
    FormulaEditorProperty::IsValid,
    FormulaEditorProperty::Errors,
    FormulaEditorProperty::Warnings,
    FormulaEditorProperty::Dependencies,
    FormulaEditorProperty::UnknownFields,
    FormulaEditorProperty::CycleAnalysis,
    FormulaEditorProperty::GovernanceStatus,
    FormulaEditorProperty::IsFormulaAllowed,
    FormulaEditorProperty::IsFormulaBlocked,
    FormulaEditorProperty::BindingTarget,
    FormulaEditorProperty::BindingStatus,
    FormulaEditorProperty::CanSaveBinding,
    FormulaEditorProperty::AllDiagnosticErrors,
    FormulaEditorProperty::AllDiagnosticWarnings,
    FormulaEditorProperty::AllDiagnosticInfo,
    FormulaEditorProperty::StatusMessage,
];

/// Observable facade over a calculated field's formula-authoring state.
/// Owns a read-only snapshot of the entity it formulas against -- it
/// never mutates the schema; saving the formula goes through
/// `formcraft_usecases::entity_usecases::set_calculated_formula`.
pub struct FormulaEditorViewModel {
    entity: Entity,
    field_id: String,
    binding_target: Option<BindingTarget>,

    formula_text: String,
    inferred_type: InferredType,
    is_valid: bool,
    errors: Vec<String>,
    warnings: Vec<String>,
    dependencies: Vec<String>,
    unknown_fields: Vec<String>,
    cycle_analysis: Vec<String>,
    governance_status: GovernanceStatus,
    binding_status: BindingStatus,
    status_message: String,
    info: Vec<String>,

    publisher: PropertyPublisher<FormulaEditorProperty>,
}

impl FormulaEditorViewModel {
    /// `binding_target` is `Some` for a formula that will be bound
    /// somewhere on save (spec §4.4); `None` for a scratch/preview
    /// editor with nothing to bind.
    pub fn new(entity: Entity, field_id: impl Into<String>, binding_target: Option<BindingTarget>) -> Self {
        let mut vm = Self {
            entity,
            field_id: field_id.into(),
            binding_target,
            formula_text: String::new(),
            inferred_type: InferredType::Unknown,
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            dependencies: Vec::new(),
            unknown_fields: Vec::new(),
            cycle_analysis: Vec::new(),
            governance_status: GovernanceStatus::Empty,
            binding_status: BindingStatus::NoTarget,
            status_message: String::new(),
            info: Vec::new(),
            publisher: PropertyPublisher::new(),
        };
        vm.recompute();
        vm
    }

    pub fn subscribe(&mut self, property: FormulaEditorProperty, subscriber: crate::publisher::Subscriber) {
        self.publisher.subscribe(property, subscriber);
    }

    /// Re-runs the analyzer pipeline synchronously and notifies every
    /// subscriber, since every published property derives from
    /// `formula_text` and the current entity context.
    pub fn set_formula_text(&mut self, text: impl Into<String>) {
        self.formula_text = text.into();
        self.recompute();
    }

    /// Re-validates the current formula against a new entity snapshot,
    /// e.g. after a field was added or removed elsewhere in the schema.
    pub fn set_schema_context(&mut self, entity: Entity) {
        self.entity = entity;
        self.recompute();
    }

    pub fn dispose(&mut self) {
        self.publisher.clear();
        self.formula_text.clear();
        self.recompute();
    }

    fn recompute(&mut self) {
        let known = formula_context::known_fields(&self.entity);
        let graph = formula_context::dependency_graph(&self.entity);
        let cycles = analyzer::analyze_cycles(&graph);
        let governance = formula_context::validate_calculated_formula(
            &self.entity,
            &self.field_id,
            &self.formula_text,
        );

        let deps = analyzer::dependencies(&self.formula_text, &known);
        self.dependencies = deps.iter().map(|d| d.field_id.clone()).collect();
        self.unknown_fields = deps
            .iter()
            .filter(|d| !d.known)
            .map(|d| d.field_id.clone())
            .collect();
        self.cycle_analysis = cycles
            .all_cycle_field_ids
            .iter()
            .filter(|id| self.dependencies.contains(id) || *id == &self.field_id)
            .cloned()
            .collect();
        self.cycle_analysis.sort();

        self.inferred_type = governance.analysis.inferred_type;
        self.is_valid = governance.status != GovernanceStatus::Invalid;
        self.errors = governance.blocking_reasons.clone();
        self.warnings = governance.warning_reasons.clone();
        self.governance_status = governance.status;
        self.binding_status = binding::evaluate(&governance, self.binding_target);

        self.status_message = match self.governance_status {
            GovernanceStatus::Empty => "no formula set".to_string(),
            GovernanceStatus::Invalid => format!("invalid: {}", self.errors.join("; ")),
            GovernanceStatus::ValidWithWarnings => format!("valid with warnings: {}", self.warnings.join("; ")),
            GovernanceStatus::Valid => "valid".to_string(),
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
        self.is_valid
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

    pub fn is_formula_allowed(&self) -> bool {
        self.is_valid
    }

    pub fn is_formula_blocked(&self) -> bool {
        !self.is_valid
    }

    pub fn binding_target(&self) -> Option<BindingTarget> {
        self.binding_target
    }

    pub fn binding_status(&self) -> BindingStatus {
        self.binding_status
    }

    pub fn can_save_binding(&self) -> bool {
        matches!(self.binding_status, BindingStatus::Allowed | BindingStatus::Cleared)
    }

    pub fn all_diagnostic_errors(&self) -> &[String] {
        &self.errors
    }

    pub fn all_diagnostic_warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Result type, dependency list, and analyzed-field count for the
    /// current formula -- empty until a formula is set.
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
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn entity_with_age() -> Entity {
        let mut e = Entity::new(EntityId::new("e").unwrap(), TranslationKey::new("k").unwrap(), true);
        e.add_field(
            Field::new(
                FieldId::new("age").unwrap(),
                FieldType::Number,
                TranslationKey::new("age.label").unwrap(),
                false,
            )
            .unwrap(),
        )
        .unwrap();
        e
    }

    #[test]
    fn empty_formula_is_allowed_and_cleared() {
        let vm = FormulaEditorViewModel::new(entity_with_age(), "total", Some(BindingTarget::CalculatedField));
        assert!(vm.is_valid());
        assert_eq!(vm.binding_status(), BindingStatus::Cleared);
        assert!(vm.can_save_binding());
    }

    #[test]
    fn setting_formula_text_updates_dependencies_and_notifies() {
        let mut vm = FormulaEditorViewModel::new(entity_with_age(), "total", Some(BindingTarget::CalculatedField));
        let notified = Arc::new(AtomicUsize::new(0));
        let n = notified.clone();
        vm.subscribe(
            FormulaEditorProperty::Dependencies,
            Box::new(move || {
                n.fetch_add(1, Ordering::SeqCst);
            }),
        );

        vm.set_formula_text("age + 1");

        assert_eq!(vm.dependencies(), ["age"]);
        assert!(vm.unknown_fields().is_empty());
        assert_eq!(vm.inferred_type(), InferredType::Number);
        assert!(notified.load(Ordering::SeqCst) >= 1);
    }

    #[test]
    fn unknown_field_reference_is_invalid_and_blocks_binding() {
        let mut vm = FormulaEditorViewModel::new(entity_with_age(), "total", Some(BindingTarget::CalculatedField));
        vm.set_formula_text("{{ghost}}");
        assert!(!vm.is_valid());
        assert_eq!(vm.unknown_fields(), ["ghost"]);
        assert_eq!(vm.binding_status(), BindingStatus::BlockedInvalidFormula);
        assert!(!vm.can_save_binding());
    }

    #[test]
    fn diagnostic_info_reports_result_type_and_dependencies() {
        let mut vm = FormulaEditorViewModel::new(entity_with_age(), "total", Some(BindingTarget::CalculatedField));
        vm.set_formula_text("age + 1");

        let info = vm.all_diagnostic_info();
        assert!(info.iter().any(|i| i.contains("Result type:")));
        assert!(info.iter().any(|i| i.contains("Depends on:") && i.contains("age")));
        assert!(info.iter().any(|i| i.contains("Analyzed")));
    }

    #[test]
    fn diagnostic_info_is_empty_without_a_formula() {
        let vm = FormulaEditorViewModel::new(entity_with_age(), "total", Some(BindingTarget::CalculatedField));
        assert!(vm.all_diagnostic_info().is_empty());
    }

    #[test]
    fn dispose_clears_subscriptions_and_state() {
        let mut vm = FormulaEditorViewModel::new(entity_with_age(), "total", None);
        vm.set_formula_text("age + 1");
        let notified = Arc::new(AtomicUsize::new(0));
        let n = notified.clone();
        vm.subscribe(
            FormulaEditorProperty::FormulaText,
            Box::new(move || {
                n.fetch_add(1, Ordering::SeqCst);
            }),
        );
        vm.dispose();
        assert_eq!(vm.formula_text(), "");
        assert_eq!(notified.load(Ordering::SeqCst), 0);
    }
}
