//! Schema profiling and data-quality analysis.
//!
//! [`Profiler`] infers a type for each column from a bounded prefix of rows
//! and counts missing and distinct values over every row. [`QualityAnalyzer`]
//! adds the dataset-wide figures: duplicate rows, a memory estimate and
//! advisory warnings.

mod quality;
mod statistical;

pub use quality::{QualityAnalyzer, QualityReport, duplicate_row_count, memory_estimate};
pub use statistical::{Profiler, ProfilerConfig, infer_type};
