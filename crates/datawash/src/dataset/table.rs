//! The in-memory tabular dataset.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::error::{DatawashError, Result};

use super::value::Value;

/// One record, in header order.
pub type Row = Vec<Value>;

/// Ordered headers plus ordered rows.
///
/// Every row holds exactly one value per header, in header order. Because
/// the header order is fixed, positional row equality is the same as
/// header-keyed structural equality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Row>,
}

impl Dataset {
    /// Create a dataset, checking that headers are unique and rows match them.
    pub fn new(headers: Vec<String>, rows: Vec<Row>) -> Result<Self> {
        let mut seen = HashSet::new();
        for header in &headers {
            if !seen.insert(header.as_str()) {
                return Err(DatawashError::InvalidParameter(format!(
                    "Duplicate column name '{}'",
                    header
                )));
            }
        }

        let expected = headers.len();
        if let Some((idx, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != expected) {
            return Err(DatawashError::MalformedRow {
                row: idx + 1,
                expected,
                found: row.len(),
            });
        }

        Ok(Self { headers, rows })
    }

    /// Create a dataset whose invariants the caller already guarantees.
    pub(crate) fn from_parts(headers: Vec<String>, rows: Vec<Row>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == headers.len()));
        Self { headers, rows }
    }

    /// A new dataset with the same headers and the given rows.
    pub(crate) fn with_rows(&self, rows: Vec<Row>) -> Self {
        Self::from_parts(self.headers.clone(), rows)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().filter_map(move |row| row.get(index))
    }

    /// Get a column by name.
    pub fn column_by_name(&self, name: &str) -> Option<Vec<&Value>> {
        let index = self.column_index(name)?;
        Some(self.column_values(index).collect())
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// A row viewed as an ordered header → value map.
    pub fn record(&self, row: usize) -> Option<IndexMap<&str, &Value>> {
        let values = self.rows.get(row)?;
        Some(
            self.headers
                .iter()
                .map(String::as_str)
                .zip(values.iter())
                .collect(),
        )
    }

    /// Whether two rows map every header to an equal value.
    pub fn rows_equal(&self, a: usize, b: usize) -> bool {
        match (self.rows.get(a), self.rows.get(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }

    /// Indices of the first occurrence of each structurally distinct row, in order.
    pub fn first_occurrences(&self) -> Vec<usize> {
        let mut seen: HashSet<&[Value]> = HashSet::with_capacity(self.rows.len());
        self.rows
            .iter()
            .enumerate()
            .filter(|&(_, row)| seen.insert(row.as_slice()))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Number of structurally distinct rows.
    pub fn distinct_row_count(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::as_slice)
            .collect::<HashSet<&[Value]>>()
            .len()
    }

    /// Serializable view of the rows as an array of header → value objects.
    pub fn records(&self) -> Records<'_> {
        Records(self)
    }
}

/// Rows serialized as `[{"header": value, ...}, ...]`.
pub struct Records<'a>(&'a Dataset);

impl Serialize for Records<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let dataset = self.0;
        let mut seq = serializer.serialize_seq(Some(dataset.row_count()))?;
        for row in &dataset.rows {
            seq.serialize_element(&RecordRef {
                headers: &dataset.headers,
                values: row,
            })?;
        }
        seq.end()
    }
}

struct RecordRef<'a> {
    headers: &'a [String],
    values: &'a [Value],
}

impl Serialize for RecordRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.headers.len()))?;
        for (header, value) in self.headers.iter().zip(self.values) {
            map.serialize_entry(header, value)?;
        }
        map.end()
    }
}
