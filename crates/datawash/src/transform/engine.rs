//! Transformation engine that applies cleaning operations to a dataset.

use chrono::Utc;
use indexmap::IndexMap;
use tracing::debug;

use crate::dataset::{Dataset, NOT_AVAILABLE, Row, Value};
use crate::inference::infer_type;
use crate::schema::{ColumnType, DatasetProfile, NumericStatistics};

use super::operations::{CleaningOperation, MissingStrategy, OutlierMethod, StepReport};

/// Result of applying one operation: the new dataset and its report.
#[derive(Debug, Clone)]
pub struct StepOutput {
    pub dataset: Dataset,
    pub report: StepReport,
}

/// What a single operation changed, before it is stamped into a report.
struct Change {
    dataset: Dataset,
    values_changed: usize,
    outliers: Option<IndexMap<String, usize>>,
}

/// Engine for applying cleaning operations.
///
/// Operations are total: anything that cannot be converted degrades to a
/// fallback value, so `apply` never fails and never touches its input.
pub struct TransformEngine;

impl TransformEngine {
    /// Create a new transform engine.
    pub fn new() -> Self {
        Self
    }

    /// Apply an operation. `profile` supplies the column types and must
    /// describe `dataset`; columns it does not describe are inferred afresh.
    pub fn apply(
        &self,
        operation: &CleaningOperation,
        dataset: &Dataset,
        profile: &DatasetProfile,
    ) -> StepOutput {
        let types = column_types(dataset, profile);

        let change = match operation {
            CleaningOperation::RemoveDuplicates => self.apply_remove_duplicates(dataset),
            CleaningOperation::HandleMissingValues { strategy } => match strategy {
                MissingStrategy::DropRow => self.apply_drop_empty_rows(dataset),
                MissingStrategy::FillTyped => self.apply_fill_typed(dataset, &types),
            },
            CleaningOperation::StandardizeText => self.apply_standardize_text(dataset, &types),
            CleaningOperation::DetectOutliers { method } => {
                self.apply_detect_outliers(dataset, &types, method)
            }
            CleaningOperation::ConvertTypes => self.apply_convert_types(dataset, &types),
        };

        let report = StepReport {
            step: operation.id(),
            operation: *operation,
            description: operation.description(),
            rows_before: dataset.row_count(),
            rows_after: change.dataset.row_count(),
            values_changed: change.values_changed,
            outliers: change.outliers,
            applied_at: Utc::now(),
        };
        debug!(
            step = %report.step,
            rows_before = report.rows_before,
            rows_after = report.rows_after,
            values_changed = report.values_changed,
            "cleaning step computed"
        );

        StepOutput {
            dataset: change.dataset,
            report,
        }
    }

    /// Keep the first occurrence of each distinct row, in order.
    fn apply_remove_duplicates(&self, dataset: &Dataset) -> Change {
        let rows: Vec<Row> = dataset
            .first_occurrences()
            .into_iter()
            .map(|idx| dataset.rows()[idx].clone())
            .collect();

        Change {
            dataset: dataset.with_rows(rows),
            values_changed: 0,
            outliers: None,
        }
    }

    /// Remove rows where every field is missing.
    fn apply_drop_empty_rows(&self, dataset: &Dataset) -> Change {
        let rows: Vec<Row> = dataset
            .rows()
            .iter()
            .filter(|row| !row.iter().all(Value::is_missing))
            .cloned()
            .collect();

        Change {
            dataset: dataset.with_rows(rows),
            values_changed: 0,
            outliers: None,
        }
    }

    /// Fill missing values: `0` in numeric columns, `"N/A"` everywhere else.
    fn apply_fill_typed(&self, dataset: &Dataset, types: &[ColumnType]) -> Change {
        let mut changed = 0;

        let rows = map_cells(dataset, |col, value| {
            if !value.is_missing() {
                return None;
            }
            changed += 1;
            Some(if types[col].is_numeric() {
                Value::Numeric(0.0)
            } else {
                Value::Text(NOT_AVAILABLE.to_string())
            })
        });

        Change {
            dataset: dataset.with_rows(rows),
            values_changed: changed,
            outliers: None,
        }
    }

    /// Trim and lower-case text values in text columns. Blank text becomes missing.
    fn apply_standardize_text(&self, dataset: &Dataset, types: &[ColumnType]) -> Change {
        let mut changed = 0;

        let rows = map_cells(dataset, |col, value| match value {
            Value::Text(s) if types[col] == ColumnType::Text => {
                let standardized = s.trim().to_lowercase();
                if standardized == *s {
                    None
                } else {
                    changed += 1;
                    Some(Value::from_field(&standardized))
                }
            }
            _ => None,
        });

        Change {
            dataset: dataset.with_rows(rows),
            values_changed: changed,
            outliers: None,
        }
    }

    /// Coerce values to the column's inferred type. Missing stays missing.
    fn apply_convert_types(&self, dataset: &Dataset, types: &[ColumnType]) -> Change {
        let mut changed = 0;

        let rows = map_cells(dataset, |col, value| {
            let converted = convert_value(value, types[col])?;
            if converted == *value {
                None
            } else {
                changed += 1;
                Some(converted)
            }
        });

        Change {
            dataset: dataset.with_rows(rows),
            values_changed: changed,
            outliers: None,
        }
    }

    /// Count outliers in each numeric column. The dataset is returned as is.
    fn apply_detect_outliers(
        &self,
        dataset: &Dataset,
        types: &[ColumnType],
        method: &OutlierMethod,
    ) -> Change {
        let mut outliers = IndexMap::new();

        for (idx, header) in dataset.headers().iter().enumerate() {
            if !types[idx].is_numeric() {
                continue;
            }

            let numbers: Vec<f64> = dataset
                .column_values(idx)
                .filter_map(Value::as_number)
                .collect();

            let count = match NumericStatistics::from_values(&numbers) {
                Some(stats) => numbers
                    .iter()
                    .filter(|&&v| match method {
                        OutlierMethod::ZScore { threshold } => stats.z_score(v).abs() > *threshold,
                        OutlierMethod::Iqr { multiplier } => stats.is_outlier_iqr(v, *multiplier),
                    })
                    .count(),
                None => 0,
            };

            outliers.insert(header.clone(), count);
        }

        Change {
            dataset: dataset.clone(),
            values_changed: 0,
            outliers: Some(outliers),
        }
    }
}

impl Default for TransformEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Column types from the profile, matched by name and position.
fn column_types(dataset: &Dataset, profile: &DatasetProfile) -> Vec<ColumnType> {
    dataset
        .headers()
        .iter()
        .enumerate()
        .map(|(idx, header)| match profile.columns.get(idx) {
            Some(column) if column.name == *header => column.inferred_type,
            _ => infer_type(dataset.column_values(idx)),
        })
        .collect()
}

/// Rebuild every row, replacing the cells for which `f` returns a value.
fn map_cells(dataset: &Dataset, mut f: impl FnMut(usize, &Value) -> Option<Value>) -> Vec<Row> {
    dataset
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(col, value)| f(col, value).unwrap_or_else(|| value.clone()))
                .collect()
        })
        .collect()
}

/// Typed form of a value for a column type. None leaves the value alone.
fn convert_value(value: &Value, column_type: ColumnType) -> Option<Value> {
    if value.is_missing() {
        return None;
    }

    match column_type {
        ColumnType::Numeric => Some(match value {
            Value::Boolean(b) => Value::Numeric(if *b { 1.0 } else { 0.0 }),
            other => Value::Numeric(other.as_number().unwrap_or(0.0)),
        }),
        ColumnType::Date => Some(
            value
                .as_date()
                .map(Value::Date)
                .unwrap_or_else(|| Value::Text(NOT_AVAILABLE.to_string())),
        ),
        ColumnType::Boolean => Some(
            value
                .as_bool()
                .map(Value::Boolean)
                .unwrap_or_else(|| Value::Text(NOT_AVAILABLE.to_string())),
        ),
        ColumnType::Text | ColumnType::Empty => None,
    }
}
