//! Cleaning pipeline: the step catalog, operations and the engine that runs them.

mod catalog;
mod engine;
mod operations;

pub use catalog::{CleaningStep, catalog};
pub use engine::{StepOutput, TransformEngine};
pub use operations::{CleaningOperation, MissingStrategy, OutlierMethod, StepId, StepReport};
