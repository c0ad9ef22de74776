//! Cleaning operations and their reports.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::error::{DatawashError, Result};

/// Identifier of a catalog step, in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    RemoveDuplicates,
    HandleMissingValues,
    StandardizeText,
    DetectOutliers,
    ConvertTypes,
}

impl StepId {
    /// Every step, in catalog order.
    pub const ALL: [StepId; 5] = [
        StepId::RemoveDuplicates,
        StepId::HandleMissingValues,
        StepId::StandardizeText,
        StepId::DetectOutliers,
        StepId::ConvertTypes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StepId::RemoveDuplicates => "remove_duplicates",
            StepId::HandleMissingValues => "handle_missing_values",
            StepId::StandardizeText => "standardize_text",
            StepId::DetectOutliers => "detect_outliers",
            StepId::ConvertTypes => "convert_types",
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        StepId::ALL
            .into_iter()
            .find(|id| id.as_str() == normalized)
            .ok_or_else(|| format!("Unknown cleaning step: {}", s))
    }
}

/// How missing values are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingStrategy {
    /// Remove rows where every field is missing.
    DropRow,
    /// Fill with `0` in numeric columns and `"N/A"` elsewhere.
    #[default]
    FillTyped,
}

impl FromStr for MissingStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "drop-row" | "drop" | "remove" => Ok(MissingStrategy::DropRow),
            "fill-typed" | "fill" => Ok(MissingStrategy::FillTyped),
            _ => Err(format!("Unknown missing-value strategy: {}", s)),
        }
    }
}

/// Rule used to flag numeric outliers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum OutlierMethod {
    /// `|z| > threshold`, using the population standard deviation.
    ZScore { threshold: f64 },
    /// Outside `[q1 - multiplier * iqr, q3 + multiplier * iqr]`.
    Iqr { multiplier: f64 },
}

impl OutlierMethod {
    pub const DEFAULT_Z_THRESHOLD: f64 = 3.0;
    pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;
}

impl fmt::Display for OutlierMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutlierMethod::ZScore { threshold } => write!(f, "z-score > {}", threshold),
            OutlierMethod::Iqr { multiplier } => write!(f, "{} x IQR", multiplier),
        }
    }
}

/// Accepts `zscore`, `z-score:2.5`, `iqr`, `iqr:3`.
impl FromStr for OutlierMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (name, param) = match s.split_once(':') {
            Some((name, param)) => (name, Some(param)),
            None => (s, None),
        };

        let param = param
            .map(|p| {
                p.trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite() && *v > 0.0)
                    .ok_or_else(|| format!("Invalid outlier parameter: {}", p))
            })
            .transpose()?;

        match name.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "zscore" | "z" => Ok(OutlierMethod::ZScore {
                threshold: param.unwrap_or(Self::DEFAULT_Z_THRESHOLD),
            }),
            "iqr" => Ok(OutlierMethod::Iqr {
                multiplier: param.unwrap_or(Self::DEFAULT_IQR_MULTIPLIER),
            }),
            _ => Err(format!("Unknown outlier method: {}", name)),
        }
    }
}

/// A cleaning step together with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum CleaningOperation {
    /// Keep the first occurrence of every distinct row.
    RemoveDuplicates,

    /// Drop all-missing rows or fill missing values by column type.
    HandleMissingValues { strategy: MissingStrategy },

    /// Trim and lower-case values in text columns.
    StandardizeText,

    /// Count outliers in numeric columns. Read-only.
    DetectOutliers { method: OutlierMethod },

    /// Coerce values in numeric, date and boolean columns to typed values.
    ConvertTypes,
}

impl CleaningOperation {
    /// The catalog step this operation belongs to.
    pub fn id(&self) -> StepId {
        match self {
            CleaningOperation::RemoveDuplicates => StepId::RemoveDuplicates,
            CleaningOperation::HandleMissingValues { .. } => StepId::HandleMissingValues,
            CleaningOperation::StandardizeText => StepId::StandardizeText,
            CleaningOperation::DetectOutliers { .. } => StepId::DetectOutliers,
            CleaningOperation::ConvertTypes => StepId::ConvertTypes,
        }
    }

    /// The operation an automated step runs with no user input. None for manual steps.
    pub fn automated(id: StepId) -> Option<Self> {
        match id {
            StepId::RemoveDuplicates => Some(CleaningOperation::RemoveDuplicates),
            StepId::HandleMissingValues => Some(CleaningOperation::HandleMissingValues {
                strategy: MissingStrategy::default(),
            }),
            StepId::StandardizeText => Some(CleaningOperation::StandardizeText),
            StepId::DetectOutliers => None,
            StepId::ConvertTypes => Some(CleaningOperation::ConvertTypes),
        }
    }

    /// Build an operation from a step id and loosely typed parameters.
    ///
    /// Recognised parameters: `strategy` for `handle_missing_values`;
    /// `method` (required) plus `threshold` or `multiplier` for
    /// `detect_outliers`.
    pub fn from_id(id: &str, parameters: &Map<String, JsonValue>) -> Result<Self> {
        let step = StepId::from_str(id).map_err(DatawashError::InvalidParameter)?;

        match step {
            StepId::HandleMissingValues => {
                let strategy = match parameters.get("strategy").and_then(|v| v.as_str()) {
                    Some(s) => s.parse().map_err(DatawashError::InvalidParameter)?,
                    None => MissingStrategy::default(),
                };
                Ok(CleaningOperation::HandleMissingValues { strategy })
            }
            StepId::DetectOutliers => {
                let method_name = parameters
                    .get("method")
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| {
                        DatawashError::InvalidParameter(
                            "detect_outliers requires a 'method' parameter".to_string(),
                        )
                    })?;
                let mut method: OutlierMethod = method_name
                    .parse()
                    .map_err(DatawashError::InvalidParameter)?;

                match &mut method {
                    OutlierMethod::ZScore { threshold } => {
                        if let Some(v) = numeric_parameter(parameters, "threshold")? {
                            *threshold = v;
                        }
                    }
                    OutlierMethod::Iqr { multiplier } => {
                        if let Some(v) = numeric_parameter(parameters, "multiplier")? {
                            *multiplier = v;
                        }
                    }
                }
                Ok(CleaningOperation::DetectOutliers { method })
            }
            other => Self::automated(other).ok_or_else(|| {
                DatawashError::InvalidParameter(format!("Step '{}' needs parameters", other))
            }),
        }
    }

    /// Get a human-readable description of the operation.
    pub fn description(&self) -> String {
        match self {
            CleaningOperation::RemoveDuplicates => "Remove duplicate rows".to_string(),
            CleaningOperation::HandleMissingValues { strategy } => match strategy {
                MissingStrategy::DropRow => "Drop rows where every field is missing".to_string(),
                MissingStrategy::FillTyped => {
                    "Fill missing values (0 for numeric columns, N/A otherwise)".to_string()
                }
            },
            CleaningOperation::StandardizeText => {
                "Trim and lower-case values in text columns".to_string()
            }
            CleaningOperation::DetectOutliers { method } => {
                format!("Detect outliers in numeric columns ({})", method)
            }
            CleaningOperation::ConvertTypes => {
                "Convert numeric, date and boolean columns to typed values".to_string()
            }
        }
    }
}

fn numeric_parameter(parameters: &Map<String, JsonValue>, key: &str) -> Result<Option<f64>> {
    match parameters.get(key) {
        None => Ok(None),
        Some(v) => v
            .as_f64()
            .filter(|n| n.is_finite() && *n > 0.0)
            .map(Some)
            .ok_or_else(|| {
                DatawashError::InvalidParameter(format!("'{}' must be a positive number", key))
            }),
    }
}

/// Record of one applied step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepReport {
    /// Step that ran.
    pub step: StepId,

    /// The operation with its parameters.
    pub operation: CleaningOperation,

    /// Description of the change.
    pub description: String,

    /// Row count before the step.
    pub rows_before: usize,

    /// Row count after the step.
    pub rows_after: usize,

    /// Number of cell values changed.
    pub values_changed: usize,

    /// Outliers per numeric column (outlier detection only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outliers: Option<IndexMap<String, usize>>,

    /// When the step was applied.
    pub applied_at: DateTime<Utc>,
}

impl StepReport {
    /// Rows removed by the step.
    pub fn rows_removed(&self) -> usize {
        self.rows_before.saturating_sub(self.rows_after)
    }

    /// Whether the step left the dataset as it was.
    pub fn is_noop(&self) -> bool {
        self.rows_before == self.rows_after && self.values_changed == 0
    }
}
