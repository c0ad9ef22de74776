//! Core type definitions for column profiling.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Inferred data type for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Every sampled value parses as a number.
    Numeric,
    /// Free text, or a mix of kinds.
    Text,
    /// Every sampled value is a calendar date.
    Date,
    /// Every sampled value is one of true/false/1/0.
    Boolean,
    /// No non-missing values were sampled.
    #[default]
    Empty,
}

impl ColumnType {
    /// Returns true if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Numeric)
    }

    /// Lower-case label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            ColumnType::Numeric => "numeric",
            ColumnType::Text => "text",
            ColumnType::Date => "date",
            ColumnType::Boolean => "boolean",
            ColumnType::Empty => "empty",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_and_display() {
        assert_eq!(ColumnType::default(), ColumnType::Empty);
        assert_eq!(format!("{:<8}|", ColumnType::Date), "date    |");
        assert!(ColumnType::Numeric.is_numeric());
    }
}
