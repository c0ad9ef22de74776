//! Profile types describing an inferred dataset structure.

mod column;
mod table;
mod types;

pub use column::{ColumnProfile, NumericStatistics};
pub use table::{DatasetProfile, QualityWarning};
pub use types::ColumnType;
