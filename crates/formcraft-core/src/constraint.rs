//! Constraint model: nine tagged variants plus the severity and
//! per-field-type compatibility matrix from spec §4.7.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::field_type::FieldType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "ERROR"),
            Self::Warning => write!(f, "WARNING"),
            Self::Info => write!(f, "INFO"),
        }
    }
}

/// A constraint kind, without its parameters or severity -- used for the
/// uniqueness check (invariant 7: at most one constraint of each kind).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    Required,
    MinLength,
    MaxLength,
    MinValue,
    MaxValue,
    Pattern,
    AllowedValues,
    FileExtension,
    MaxFileSize,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Required => "Required",
            Self::MinLength => "MinLength",
            Self::MaxLength => "MaxLength",
            Self::MinValue => "MinValue",
            Self::MaxValue => "MaxValue",
            Self::Pattern => "Pattern",
            Self::AllowedValues => "AllowedValues",
            Self::FileExtension => "FileExtension",
            Self::MaxFileSize => "MaxFileSize",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "constraint_type")]
#[non_exhaustive]
pub enum Constraint {
    #[serde(rename = "RequiredConstraint")]
    Required { severity: Severity },
    #[serde(rename = "MinLengthConstraint")]
    MinLength { min_length: u32, severity: Severity },
    #[serde(rename = "MaxLengthConstraint")]
    MaxLength { max_length: u32, severity: Severity },
    #[serde(rename = "MinValueConstraint")]
    MinValue { min_value: f64, severity: Severity },
    #[serde(rename = "MaxValueConstraint")]
    MaxValue { max_value: f64, severity: Severity },
    #[serde(rename = "PatternConstraint")]
    Pattern {
        pattern: String,
        description: Option<String>,
        severity: Severity,
    },
    #[serde(rename = "AllowedValuesConstraint")]
    AllowedValues {
        allowed_values: Vec<String>,
        severity: Severity,
    },
    #[serde(rename = "FileExtensionConstraint")]
    FileExtension {
        allowed_extensions: Vec<String>,
        severity: Severity,
    },
    #[serde(rename = "MaxFileSizeConstraint")]
    MaxFileSize { max_size_bytes: u64, severity: Severity },
}

impl Constraint {
    pub fn kind(&self) -> ConstraintKind {
        match self {
            Self::Required { .. } => ConstraintKind::Required,
            Self::MinLength { .. } => ConstraintKind::MinLength,
            Self::MaxLength { .. } => ConstraintKind::MaxLength,
            Self::MinValue { .. } => ConstraintKind::MinValue,
            Self::MaxValue { .. } => ConstraintKind::MaxValue,
            Self::Pattern { .. } => ConstraintKind::Pattern,
            Self::AllowedValues { .. } => ConstraintKind::AllowedValues,
            Self::FileExtension { .. } => ConstraintKind::FileExtension,
            Self::MaxFileSize { .. } => ConstraintKind::MaxFileSize,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::Required { severity }
            | Self::MinLength { severity, .. }
            | Self::MaxLength { severity, .. }
            | Self::MinValue { severity, .. }
            | Self::MaxValue { severity, .. }
            | Self::Pattern { severity, .. }
            | Self::AllowedValues { severity, .. }
            | Self::FileExtension { severity, .. }
            | Self::MaxFileSize { severity, .. } => *severity,
        }
    }

    /// Spec §4.7 step 3: the field types a constraint kind may attach to.
    pub fn compatible_field_types(kind: ConstraintKind) -> &'static [FieldType] {
        use FieldType::*;
        match kind {
            ConstraintKind::MinValue | ConstraintKind::MaxValue => &[Number, Date],
            ConstraintKind::MinLength | ConstraintKind::MaxLength => &[Text, Textarea],
            ConstraintKind::FileExtension | ConstraintKind::MaxFileSize => &[File, Image],
            ConstraintKind::AllowedValues => &[Text, Textarea, Number, Dropdown, Radio],
            ConstraintKind::Pattern => &[Text, Textarea],
            // Required is valid on any non-CALCULATED type; the caller
            // checks CALCULATED separately (invariant 3).
            ConstraintKind::Required => &[
                Text, Textarea, Number, Date, Dropdown, Radio, Checkbox, Lookup, File, Image,
                Table,
            ],
        }
    }

    pub fn is_compatible_with(&self, field_type: FieldType) -> bool {
        Self::compatible_field_types(self.kind()).contains(&field_type)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind(), self.severity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_dedups_by_variant_not_parameters() {
        let a = Constraint::MinLength {
            min_length: 3,
            severity: Severity::Error,
        };
        let b = Constraint::MinLength {
            min_length: 99,
            severity: Severity::Warning,
        };
        assert_eq!(a.kind(), b.kind());
    }

    #[test]
    fn min_value_only_compatible_with_number_and_date() {
        let c = Constraint::MinValue {
            min_value: 1.0,
            severity: Severity::Error,
        };
        assert!(c.is_compatible_with(FieldType::Number));
        assert!(c.is_compatible_with(FieldType::Date));
        assert!(!c.is_compatible_with(FieldType::Text));
    }

    #[test]
    fn serde_roundtrip_with_severity() {
        let c = Constraint::Pattern {
            pattern: "^[a-z]+$".into(),
            description: Some("lowercase only".into()),
            severity: Severity::Warning,
        };
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["constraint_type"], "PatternConstraint");
        let back: Constraint = serde_json::from_value(json).unwrap();
        assert_eq!(back, c);
    }
}
