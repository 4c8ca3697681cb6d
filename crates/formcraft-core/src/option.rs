//! Options for DROPDOWN/RADIO fields: an ordered sequence of `(value,
//! label_key)` pairs.

use serde::{Deserialize, Serialize};

use crate::ids::TranslationKey;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOption {
    pub value: String,
    pub label_key: TranslationKey,
}

impl FieldOption {
    pub fn new(value: impl Into<String>, label_key: TranslationKey) -> Self {
        Self {
            value: value.into(),
            label_key,
        }
    }
}

/// Returns the first duplicated option value, if any (invariant 6).
pub fn find_duplicate_value(options: &[FieldOption]) -> Option<&str> {
    let mut seen = std::collections::HashSet::new();
    for opt in options {
        if !seen.insert(opt.value.as_str()) {
            return Some(opt.value.as_str());
        }
    }
    None
}
