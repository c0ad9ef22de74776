//! Dataset-level profile.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::column::ColumnProfile;

/// Advisory data-quality warning. Never blocks processing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QualityWarning {
    /// Missing cells exceed the configured share of all cells.
    HighMissingRatio { ratio: f64 },
    /// A single column is mostly missing.
    ColumnMostlyMissing { column: String, ratio: f64 },
    /// Row count exceeds the configured large-dataset threshold.
    LargeDataset { rows: usize, threshold: usize },
}

impl fmt::Display for QualityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityWarning::HighMissingRatio { ratio } => {
                write!(f, "High share of missing values ({:.1}%)", ratio * 100.0)
            }
            QualityWarning::ColumnMostlyMissing { column, ratio } => {
                write!(f, "Column '{}' is {:.1}% missing", column, ratio * 100.0)
            }
            QualityWarning::LargeDataset { rows, threshold } => write!(
                f,
                "Large dataset ({} rows, more than {}). Consider splitting it.",
                rows, threshold
            ),
        }
    }
}

/// Derived summary of a dataset.
///
/// Always computed fresh from a dataset; pipeline stages replace it instead of
/// editing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetProfile {
    pub row_count: usize,
    pub column_count: usize,
    /// Profiles for each column, in header order.
    pub columns: Vec<ColumnProfile>,
    /// Rows minus structurally distinct rows.
    pub duplicate_row_count: usize,
    /// Byte length of the compact JSON form of the rows.
    pub memory_estimate_bytes: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<QualityWarning>,
}

impl DatasetProfile {
    /// Get a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get all column names.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Total missing cells over every column.
    pub fn total_missing(&self) -> usize {
        self.columns.iter().map(|c| c.missing_count).sum()
    }

    /// Missing cells as a share of all cells.
    pub fn missing_ratio(&self) -> f64 {
        let cells = self.row_count * self.column_count;
        if cells == 0 {
            0.0
        } else {
            self.total_missing() as f64 / cells as f64
        }
    }

    /// Memory estimate formatted as kilobytes, e.g. `1.25 KB`.
    pub fn memory_estimate_label(&self) -> String {
        format!("{:.2} KB", self.memory_estimate_bytes as f64 / 1024.0)
    }
}
