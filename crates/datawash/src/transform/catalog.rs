//! The fixed catalog of cleaning steps.

use serde::{Deserialize, Serialize};

use super::operations::StepId;

/// A step as presented to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningStep {
    pub id: StepId,
    pub name: String,
    pub description: String,
    /// Automated steps run without user input; manual ones need parameters.
    pub automated: bool,
    /// Set once the step has been applied in the current session.
    pub applied: bool,
}

impl CleaningStep {
    fn new(id: StepId, name: &str, description: &str, automated: bool) -> Self {
        Self {
            id,
            name: name.to_string(),
            description: description.to_string(),
            automated,
            applied: false,
        }
    }
}

/// Every cleaning step, in catalog order, none applied.
pub fn catalog() -> Vec<CleaningStep> {
    StepId::ALL
        .into_iter()
        .map(|id| match id {
            StepId::RemoveDuplicates => CleaningStep::new(
                id,
                "Remove duplicates",
                "Remove rows that repeat an earlier row exactly",
                true,
            ),
            StepId::HandleMissingValues => CleaningStep::new(
                id,
                "Handle missing values",
                "Fill missing values by column type, or drop empty rows",
                true,
            ),
            StepId::StandardizeText => CleaningStep::new(
                id,
                "Standardize text",
                "Trim surrounding whitespace and lower-case text columns",
                true,
            ),
            StepId::DetectOutliers => CleaningStep::new(
                id,
                "Detect outliers",
                "Flag extreme values in numeric columns (z-score or IQR)",
                false,
            ),
            StepId::ConvertTypes => CleaningStep::new(
                id,
                "Convert types",
                "Turn numeric, date and boolean columns into typed values",
                true,
            ),
        })
        .collect()
}
