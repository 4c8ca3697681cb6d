//! Observable view-model layer (spec §4.14): the only thing a UI host
//! depends on. Each view-model holds a read-only snapshot of the entity
//! it's authoring against and republishes derived properties whenever
//! the formula text or schema context changes; it never mutates the
//! schema itself -- saving goes through `formcraft-usecases`.

pub mod control_rule_editor;
pub mod formula_editor;
pub mod publisher;

pub use control_rule_editor::{ControlRuleEditorProperty, ControlRuleEditorViewModel};
pub use formula_editor::{FormulaEditorProperty, FormulaEditorViewModel};
pub use publisher::PropertyPublisher;
