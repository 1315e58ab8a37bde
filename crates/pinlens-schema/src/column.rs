//! Column descriptors
//!
//! A column's [`ColumnType`] decides both how its values compare when a view
//! sorts on it and how each cell renders.

use serde::Serialize;
use std::fmt;

/// Column type tag
///
/// Closed set: every match over it in the view engine is exhaustive, so a new
/// type is a compile-time checked change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Free text, truncated when long
    Text,
    /// Numeric value, locale grouped
    Number,
    /// Date or timestamp
    Date,
    /// Single select, rendered as a status chip
    Select,
    /// Boolean flag
    Checkbox,
    /// Link target
    Url,
    /// Array of attachment objects
    Attachment,
    /// Array of linked record references
    Linked,
}

impl ColumnType {
    /// All column types in declaration order
    pub const ALL: [ColumnType; 8] = [
        ColumnType::Text,
        ColumnType::Number,
        ColumnType::Date,
        ColumnType::Select,
        ColumnType::Checkbox,
        ColumnType::Url,
        ColumnType::Attachment,
        ColumnType::Linked,
    ];

    /// Stable lowercase name
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ColumnType::Text => "text",
            ColumnType::Number => "number",
            ColumnType::Date => "date",
            ColumnType::Select => "select",
            ColumnType::Checkbox => "checkbox",
            ColumnType::Url => "url",
            ColumnType::Attachment => "attachment",
            ColumnType::Linked => "linked",
        }
    }

    /// Whether the cell value is computed rather than shown raw
    ///
    /// Computed cells never render the empty placeholder: a missing checkbox
    /// is an explicit "false".
    #[inline]
    #[must_use]
    pub const fn is_computed(self) -> bool {
        matches!(self, ColumnType::Checkbox)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One column of a table schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnDescriptor {
    /// Raw field key in the record
    pub key: &'static str,
    /// Header label
    pub label: &'static str,
    /// Column type
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// Pinned as primary display
    pub sticky: bool,
}

impl ColumnDescriptor {
    /// Create a non-sticky column
    #[inline]
    #[must_use]
    pub const fn new(key: &'static str, label: &'static str, column_type: ColumnType) -> Self {
        Self {
            key,
            label,
            column_type,
            sticky: false,
        }
    }

    /// Mark column as sticky
    #[inline]
    #[must_use]
    pub const fn sticky(mut self) -> Self {
        self.sticky = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_type_names_are_unique() {
        let mut names: Vec<_> = ColumnType::ALL.iter().map(|t| t.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ColumnType::ALL.len());
    }

    #[test]
    fn only_checkbox_is_computed() {
        for ty in ColumnType::ALL {
            assert_eq!(ty.is_computed(), ty == ColumnType::Checkbox);
        }
    }

    #[test]
    fn descriptor_sticky_builder() {
        let col = ColumnDescriptor::new("Topic", "Topic", ColumnType::Text);
        assert!(!col.sticky);
        assert!(col.sticky().sticky);
    }

    #[test]
    fn descriptor_serializes_type_tag() {
        let col = ColumnDescriptor::new("Saves", "Saves", ColumnType::Number);
        let json = serde_json::to_value(col).unwrap();
        assert_eq!(json["type"], "number");
        assert_eq!(json["key"], "Saves");
    }
}
