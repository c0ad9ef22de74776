//! Datawash: ingest, profile and clean tabular data files.
//!
//! A CSV, TSV or JSON file is decoded into a [`Dataset`], profiled into a
//! [`DatasetProfile`] and handed to a [`PipelineSession`], where cleaning
//! steps are applied one at a time before the result is exported.
//!
//! # Core Principles
//!
//! - **Non-destructive**: the ingested dataset is kept; `reset` goes back to it
//! - **Total steps**: cleaning never fails, unconvertible values degrade to `0` or `N/A`
//! - **Fresh profiles**: every step recomputes the profile from the new dataset
//!
//! # Example
//!
//! ```no_run
//! use datawash::{CleaningOperation, Datawash, ExportFormat};
//!
//! let mut session = Datawash::new().ingest_path("survey.csv").unwrap();
//! println!("Duplicates: {}", session.profile().duplicate_row_count);
//!
//! session.apply(CleaningOperation::RemoveDuplicates);
//! let blob = session.export(ExportFormat::Csv).unwrap();
//! println!("{} ({} bytes)", blob.file_name, blob.content.len());
//! ```

pub mod dataset;
pub mod error;
pub mod export;
pub mod inference;
pub mod input;
pub mod schema;
pub mod session;
pub mod transform;

mod datawash;

pub use crate::datawash::{Datawash, DatawashConfig};
pub use dataset::{Dataset, Row, Value};
pub use error::{DatawashError, Result};
pub use export::{ExportBlob, ExportFormat};
pub use inference::{Profiler, ProfilerConfig};
pub use input::{Parser, ParserConfig, SourceFormat, SourceMetadata};
pub use schema::{ColumnProfile, ColumnType, DatasetProfile, NumericStatistics, QualityWarning};
pub use session::{PipelineSession, SessionObserver};
pub use transform::{
    CleaningOperation, CleaningStep, MissingStrategy, OutlierMethod, StepId, StepReport,
    catalog,
};
