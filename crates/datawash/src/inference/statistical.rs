//! Column type inference and per-column statistics.

use indexmap::IndexSet;
use tracing::debug;

use crate::dataset::{Dataset, Value};
use crate::schema::{ColumnProfile, ColumnType, DatasetProfile, NumericStatistics};

use super::quality::QualityAnalyzer;

/// Profiler configuration.
#[derive(Debug, Clone)]
pub struct ProfilerConfig {
    /// Rows sampled (from the top) for type inference. Counts always use every row.
    pub type_sample_rows: usize,
    /// Distinct sample values kept per column.
    pub sample_value_count: usize,
    /// Missing share above which a warning is raised.
    pub missing_ratio_warning: f64,
    /// Row count above which a large-dataset warning is raised.
    pub large_dataset_rows: usize,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            type_sample_rows: 100,
            sample_value_count: 3,
            missing_ratio_warning: 0.5,
            large_dataset_rows: 100_000,
        }
    }
}

/// Computes a [`DatasetProfile`] from a [`Dataset`].
///
/// Profiling is a pure function of the dataset and the configuration.
#[derive(Debug, Clone, Default)]
pub struct Profiler {
    config: ProfilerConfig,
}

impl Profiler {
    /// Create a profiler with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ProfilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProfilerConfig {
        &self.config
    }

    /// Profile every column and run the quality checks.
    pub fn profile(&self, dataset: &Dataset) -> DatasetProfile {
        let columns: Vec<ColumnProfile> = (0..dataset.column_count())
            .map(|idx| self.profile_column(dataset, idx))
            .collect();

        let quality = QualityAnalyzer::new(&self.config).analyze(dataset, &columns);

        debug!(
            rows = dataset.row_count(),
            columns = columns.len(),
            duplicates = quality.duplicate_row_count,
            warnings = quality.warnings.len(),
            "profiled dataset"
        );

        DatasetProfile {
            row_count: dataset.row_count(),
            column_count: dataset.column_count(),
            columns,
            duplicate_row_count: quality.duplicate_row_count,
            memory_estimate_bytes: quality.memory_estimate_bytes,
            warnings: quality.warnings,
        }
    }

    /// Profile a single column by index.
    pub fn profile_column(&self, dataset: &Dataset, col_index: usize) -> ColumnProfile {
        let name = dataset
            .headers()
            .get(col_index)
            .cloned()
            .unwrap_or_default();
        let mut profile = ColumnProfile::new(name, col_index);

        let sampled = dataset
            .column_values(col_index)
            .take(self.config.type_sample_rows);
        profile.inferred_type = infer_type(sampled);

        // Distinct values in first-seen order; drives the unique count and the samples
        let mut distinct: IndexSet<&Value> = IndexSet::new();
        let mut missing = 0;
        for value in dataset.column_values(col_index) {
            if value.is_missing() {
                missing += 1;
            } else {
                distinct.insert(value);
            }
        }

        profile.missing_count = missing;
        profile.unique_value_count = distinct.len();
        profile.sample_values = distinct
            .iter()
            .take(self.config.sample_value_count)
            .map(|v| v.render().into_owned())
            .collect();

        if profile.inferred_type.is_numeric() {
            let numbers: Vec<f64> = dataset
                .column_values(col_index)
                .filter_map(Value::as_number)
                .collect();
            profile.numeric = NumericStatistics::from_values(&numbers);
        }

        profile
    }
}

/// Infer a column type from its (sampled) values, in priority order:
/// empty, numeric, date, boolean, text. Missing values are ignored.
pub fn infer_type<'a>(values: impl IntoIterator<Item = &'a Value>) -> ColumnType {
    let present: Vec<&Value> = values.into_iter().filter(|v| !v.is_missing()).collect();

    if present.is_empty() {
        ColumnType::Empty
    } else if present.iter().all(|v| v.as_number().is_some()) {
        ColumnType::Numeric
    } else if present.iter().all(|v| v.as_date().is_some()) {
        ColumnType::Date
    } else if present.iter().all(|v| v.as_bool().is_some()) {
        ColumnType::Boolean
    } else {
        ColumnType::Text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Parser, SourceFormat};

    fn parse(content: &str) -> Dataset {
        Parser::new().parse_as(content, SourceFormat::Delimited).unwrap()
    }

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    #[test]
    fn test_infer_type_priority() {
        assert_eq!(infer_type(&[text("1"), text("2.5"), Value::Missing]), ColumnType::Numeric);
        assert_eq!(infer_type(&[text("2024-01-01"), text("2024-02-01")]), ColumnType::Date);
        assert_eq!(infer_type(&[text("true"), text("FALSE")]), ColumnType::Boolean);
        assert_eq!(infer_type(&[text("1"), text("0")]), ColumnType::Numeric);
        assert_eq!(infer_type(&[text("1"), text("true")]), ColumnType::Boolean);
        assert_eq!(infer_type(&[text("1"), text("x")]), ColumnType::Text);
        assert_eq!(infer_type(&[Value::Missing, Value::Missing]), ColumnType::Empty);
        assert_eq!(infer_type(std::iter::empty()), ColumnType::Empty);
    }

    #[test]
    fn test_typed_values_infer_their_own_type() {
        assert_eq!(
            infer_type(&[Value::Numeric(1.0), text("3")]),
            ColumnType::Numeric
        );
        assert_eq!(
            infer_type(&[Value::Boolean(true), Value::Boolean(false)]),
            ColumnType::Boolean
        );
    }

    #[test]
    fn test_profile_counts() {
        let ds = parse("a,b\n1,x\n1,x\n2,y\n");
        let profile = Profiler::new().profile(&ds);

        assert_eq!(profile.row_count, 3);
        assert_eq!(profile.column_count, 2);
        assert_eq!(profile.duplicate_row_count, 1);

        let a = profile.column("a").unwrap();
        assert_eq!(a.inferred_type, ColumnType::Numeric);
        assert_eq!(a.unique_value_count, 2);
        assert_eq!(a.sample_values, vec!["1", "2"]);
        assert!(a.numeric.is_some());

        let b = profile.column("b").unwrap();
        assert_eq!(b.inferred_type, ColumnType::Text);
        assert!(b.numeric.is_none());
    }

    #[test]
    fn test_missing_counted_over_all_rows() {
        let ds = parse("a,b\n1,\n,\n3,z\n");
        let profile = Profiler::new().profile(&ds);
        assert_eq!(profile.column("a").unwrap().missing_count, 1);
        assert_eq!(profile.column("b").unwrap().missing_count, 2);
        assert_eq!(profile.total_missing(), 3);
    }

    #[test]
    fn test_sample_prefix_only_drives_type() {
        let mut content = String::from("v\n");
        for i in 0..5 {
            content.push_str(&format!("{}\n", i));
        }
        content.push_str("oops\n");
        let ds = parse(&content);

        let profiler = Profiler::with_config(ProfilerConfig {
            type_sample_rows: 5,
            ..Default::default()
        });
        let col = &profiler.profile(&ds).columns[0];
        assert_eq!(col.inferred_type, ColumnType::Numeric);
        assert_eq!(col.unique_value_count, 6);

        let col = &Profiler::new().profile(&ds).columns[0];
        assert_eq!(col.inferred_type, ColumnType::Text);
    }

    #[test]
    fn test_sample_values_limited_to_three() {
        let ds = parse("c\nw\nx\nw\ny\nz\n");
        let col = &Profiler::new().profile(&ds).columns[0];
        assert_eq!(col.sample_values, vec!["w", "x", "y"]);
        assert_eq!(col.unique_value_count, 4);
    }
}
