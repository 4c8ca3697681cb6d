//! `FieldType`: the closed set of field kinds a schema may declare.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set -- unlike the teacher's `FieldType`, this carries no
/// per-variant constraint payload. Constraints live on `Field` as an
/// unordered set keyed by kind (see `crate::constraint`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Textarea,
    Number,
    Date,
    Dropdown,
    Radio,
    Checkbox,
    Calculated,
    Lookup,
    File,
    Image,
    Table,
}

impl FieldType {
    pub fn is_choice(self) -> bool {
        matches!(self, Self::Dropdown | Self::Radio)
    }

    /// Any type except CALCULATED, TABLE, FILE, IMAGE -- usable as a
    /// LOOKUP's `lookup_display_field` target (invariant 4).
    pub fn is_displayable_scalar(self) -> bool {
        !matches!(self, Self::Calculated | Self::Table | Self::File | Self::Image)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Number => "number",
            Self::Date => "date",
            Self::Dropdown => "dropdown",
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
            Self::Calculated => "calculated",
            Self::Lookup => "lookup",
            Self::File => "file",
            Self::Image => "image",
            Self::Table => "table",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_roundtrip() {
        for ft in [
            FieldType::Text,
            FieldType::Calculated,
            FieldType::Table,
            FieldType::Lookup,
        ] {
            let json = serde_json::to_string(&ft).unwrap();
            let back: FieldType = serde_json::from_str(&json).unwrap();
            assert_eq!(ft, back);
        }
    }

    #[test]
    fn lowercase_wire_format() {
        let json = serde_json::to_string(&FieldType::Dropdown).unwrap();
        assert_eq!(json, "\"dropdown\"");
    }

    #[test]
    fn displayable_scalar_excludes_calculated_table_file_image() {
        assert!(!FieldType::Calculated.is_displayable_scalar());
        assert!(!FieldType::Table.is_displayable_scalar());
        assert!(!FieldType::File.is_displayable_scalar());
        assert!(!FieldType::Image.is_displayable_scalar());
        assert!(FieldType::Text.is_displayable_scalar());
        assert!(FieldType::Lookup.is_displayable_scalar());
    }
}
