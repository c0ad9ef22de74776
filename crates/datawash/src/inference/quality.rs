//! Dataset-wide quality checks: duplicates, memory footprint, advisory warnings.

use std::io;

use crate::dataset::Dataset;
use crate::schema::{ColumnProfile, QualityWarning};

use super::statistical::ProfilerConfig;

/// Dataset-wide quality figures.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityReport {
    pub duplicate_row_count: usize,
    pub memory_estimate_bytes: usize,
    pub warnings: Vec<QualityWarning>,
}

/// Runs the dataset-wide checks that complement per-column profiling.
pub struct QualityAnalyzer {
    missing_ratio_warning: f64,
    large_dataset_rows: usize,
}

impl QualityAnalyzer {
    pub fn new(config: &ProfilerConfig) -> Self {
        Self {
            missing_ratio_warning: config.missing_ratio_warning,
            large_dataset_rows: config.large_dataset_rows,
        }
    }

    pub fn analyze(&self, dataset: &Dataset, columns: &[ColumnProfile]) -> QualityReport {
        QualityReport {
            duplicate_row_count: duplicate_row_count(dataset),
            memory_estimate_bytes: memory_estimate(dataset),
            warnings: self.warnings(dataset, columns),
        }
    }

    fn warnings(&self, dataset: &Dataset, columns: &[ColumnProfile]) -> Vec<QualityWarning> {
        let mut warnings = Vec::new();
        let rows = dataset.row_count();

        let cells = rows * dataset.column_count();
        if cells > 0 {
            let missing: usize = columns.iter().map(|c| c.missing_count).sum();
            let ratio = missing as f64 / cells as f64;
            if ratio > self.missing_ratio_warning {
                warnings.push(QualityWarning::HighMissingRatio { ratio });
            }
        }

        for column in columns {
            let ratio = column.missing_ratio(rows);
            if ratio > self.missing_ratio_warning {
                warnings.push(QualityWarning::ColumnMostlyMissing {
                    column: column.name.clone(),
                    ratio,
                });
            }
        }

        if rows > self.large_dataset_rows {
            warnings.push(QualityWarning::LargeDataset {
                rows,
                threshold: self.large_dataset_rows,
            });
        }

        warnings
    }
}

/// Rows minus structurally distinct rows.
pub fn duplicate_row_count(dataset: &Dataset) -> usize {
    dataset.row_count() - dataset.distinct_row_count()
}

/// Byte length of the compact JSON serialization of the rows.
pub fn memory_estimate(dataset: &Dataset) -> usize {
    let mut counter = ByteCounter(0);
    match serde_json::to_writer(&mut counter, &dataset.records()) {
        Ok(()) => counter.0,
        Err(_) => 0,
    }
}

/// Writer that only counts bytes.
struct ByteCounter(usize);

impl io::Write for ByteCounter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0 += buf.len();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
