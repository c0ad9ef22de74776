//! Editing session over one ingested file.

use std::fmt;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde_json::{Map, Value as JsonValue};
use tracing::{info, warn};

use crate::dataset::Dataset;
use crate::error::Result;
use crate::export::{self, ExportBlob, ExportFormat};
use crate::inference::Profiler;
use crate::input::SourceMetadata;
use crate::schema::DatasetProfile;
use crate::transform::{
    CleaningOperation, CleaningStep, StepId, StepReport, TransformEngine, catalog,
};

use super::observer::SessionObserver;

/// One file's cleaning session.
///
/// Holds the dataset as ingested and the current, cleaned dataset. Each step
/// replaces `current` and its profile; `reset` goes back to the original.
pub struct PipelineSession {
    source: SourceMetadata,
    original: Dataset,
    current: Dataset,
    profile: DatasetProfile,
    steps: Vec<CleaningStep>,
    history: Vec<StepReport>,
    profiler: Profiler,
    engine: TransformEngine,
    observers: Vec<Arc<dyn SessionObserver>>,
}

impl fmt::Debug for PipelineSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineSession")
            .field("source", &self.source)
            .field("rows", &self.current.row_count())
            .field("columns", &self.current.column_count())
            .field("steps", &self.steps)
            .field("history", &self.history.len())
            .finish_non_exhaustive()
    }
}

impl PipelineSession {
    /// Start a session on a freshly ingested dataset.
    pub fn new(
        dataset: Dataset,
        source: SourceMetadata,
        profiler: Profiler,
        observers: Vec<Arc<dyn SessionObserver>>,
    ) -> Self {
        let profile = profiler.profile(&dataset);

        for warning in &profile.warnings {
            warn!(file = %source.file, "{}", warning);
        }

        let session = Self {
            source,
            original: dataset.clone(),
            current: dataset,
            profile,
            steps: catalog(),
            history: Vec::new(),
            profiler,
            engine: TransformEngine::new(),
            observers,
        };

        for observer in &session.observers {
            observer.on_ingested(&session.current, &session.profile);
        }
        session
    }

    /// Metadata of the ingested file. Survives `reset`.
    pub fn source(&self) -> &SourceMetadata {
        &self.source
    }

    /// The dataset as ingested.
    pub fn original(&self) -> &Dataset {
        &self.original
    }

    /// The dataset after every step applied so far.
    pub fn dataset(&self) -> &Dataset {
        &self.current
    }

    /// Profile of the current dataset.
    pub fn profile(&self) -> &DatasetProfile {
        &self.profile
    }

    /// The step catalog with this session's `applied` flags.
    pub fn steps(&self) -> &[CleaningStep] {
        &self.steps
    }

    /// Reports of applied steps, oldest first.
    pub fn history(&self) -> &[StepReport] {
        &self.history
    }

    /// Whether any step has been applied since ingestion or the last reset.
    pub fn is_modified(&self) -> bool {
        !self.history.is_empty()
    }

    /// Apply one operation to the current dataset and refresh the profile.
    pub fn apply(&mut self, operation: CleaningOperation) -> &StepReport {
        let output = self.engine.apply(&operation, &self.current, &self.profile);

        let mut profile = self.profiler.profile(&output.dataset);
        if let Some(outliers) = &output.report.outliers {
            for column in &mut profile.columns {
                if let Some(count) = outliers.get(&column.name) {
                    column.outlier_count = Some(*count);
                }
            }
        }

        info!(
            step = %output.report.step,
            rows_before = output.report.rows_before,
            rows_after = output.report.rows_after,
            values_changed = output.report.values_changed,
            "applied cleaning step"
        );

        if let Some(step) = self.steps.iter_mut().find(|s| s.id == output.report.step) {
            step.applied = true;
        }

        self.current = output.dataset;
        self.profile = profile;
        for observer in &self.observers {
            observer.on_step_applied(&self.current, &self.profile);
        }

        self.history.push(output.report);
        &self.history[self.history.len() - 1]
    }

    /// Look a step up by id and apply it with the given parameters.
    pub fn apply_step(&mut self, id: &str, parameters: &Map<String, JsonValue>) -> Result<&StepReport> {
        let operation = CleaningOperation::from_id(id, parameters)?;
        Ok(self.apply(operation))
    }

    /// Run every automated step once, in catalog order, with default parameters.
    pub fn apply_automated(&mut self) -> &[StepReport] {
        let start = self.history.len();
        for operation in StepId::ALL.into_iter().filter_map(CleaningOperation::automated) {
            self.apply(operation);
        }
        &self.history[start..]
    }

    /// Restore the original dataset and clear every `applied` flag and the history.
    pub fn reset(&mut self) {
        self.current = self.original.clone();
        self.profile = self.profiler.profile(&self.current);
        self.history.clear();
        for step in &mut self.steps {
            step.applied = false;
        }

        info!(file = %self.source.file, "session reset");
        for observer in &self.observers {
            observer.on_reset(&self.current, &self.profile);
        }
    }

    /// Export the current dataset, named after today's date.
    pub fn export(&self, format: ExportFormat) -> Result<ExportBlob> {
        self.export_dated(format, Utc::now().date_naive())
    }

    /// Export the current dataset, named after `date`.
    pub fn export_dated(&self, format: ExportFormat, date: NaiveDate) -> Result<ExportBlob> {
        let blob = export::export(&self.current, format, date)?;
        info!(file = %blob.file_name, bytes = blob.content.len(), "exported dataset");
        Ok(blob)
    }
}
