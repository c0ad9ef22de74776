//! Delimited-text and JSON ingestion.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::dataset::{Dataset, Row, Value};
use crate::error::{DatawashError, Result};

use super::source::{SourceFormat, SourceMetadata};

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use (None = tab if the content has one, else comma).
    pub delimiter: Option<u8>,
    /// Maximum data rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
    /// Fail on rows whose length differs from the header instead of padding/truncating.
    pub strict: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            max_rows: None,
            quote: b'"',
            strict: false,
        }
    }
}

/// Decodes raw file content into a [`Dataset`].
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file from disk, detecting the format from its extension.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(Dataset, SourceMetadata)> {
        let path = path.as_ref();

        let bytes = fs::read(path).map_err(|e| DatawashError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let content = std::str::from_utf8(&bytes).map_err(|_| {
            DatawashError::UnsupportedFormat(format!(
                "'{}' is not valid UTF-8 text",
                path.display()
            ))
        })?;

        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let (dataset, mut metadata) = self.parse_content(&file, content)?;
        metadata.path = Some(path.to_path_buf());
        Ok((dataset, metadata))
    }

    /// Parse in-memory content; `file_name` drives format detection.
    pub fn parse_content(&self, file_name: &str, content: &str) -> Result<(Dataset, SourceMetadata)> {
        let format = SourceFormat::detect(Some(file_name), content)?;
        let (dataset, label) = self.parse_labelled(content, format)?;

        let metadata = SourceMetadata::new(
            file_name,
            None,
            content_hash(content.as_bytes()),
            content.len() as u64,
            label.to_string(),
            dataset.row_count(),
            dataset.column_count(),
        );

        info!(
            file = file_name,
            format = label,
            rows = dataset.row_count(),
            columns = dataset.column_count(),
            "ingested dataset"
        );

        Ok((dataset, metadata))
    }

    /// Parse content in an explicitly declared format.
    pub fn parse_as(&self, content: &str, format: SourceFormat) -> Result<Dataset> {
        self.parse_labelled(content, format).map(|(dataset, _)| dataset)
    }

    fn parse_labelled(&self, content: &str, format: SourceFormat) -> Result<(Dataset, &'static str)> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        if content.trim().is_empty() {
            return Err(DatawashError::EmptyFile("File has no content".to_string()));
        }

        match format {
            SourceFormat::Json => Ok((self.parse_json(content)?, "json")),
            SourceFormat::Delimited => {
                let delimiter = self
                    .config
                    .delimiter
                    .unwrap_or_else(|| detect_delimiter(content));
                let label = match delimiter {
                    b'\t' => "tsv",
                    b',' => "csv",
                    _ => "delimited",
                };
                Ok((self.parse_delimited(content, delimiter)?, label))
            }
        }
    }

    /// Parse delimited text: header on the first non-empty line, then data rows.
    fn parse_delimited(&self, content: &str, delimiter: u8) -> Result<Dataset> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(content.as_bytes());

        let mut records = reader.records().filter(|result| match result {
            Ok(record) => !is_blank_record(record, content.as_bytes(), self.config.quote),
            Err(_) => true,
        });

        let header_record = match records.next() {
            Some(result) => result?,
            None => return Err(DatawashError::EmptyFile("No header row found".to_string())),
        };
        let headers = normalize_headers(header_record.iter(), self.config.quote as char);
        let expected = headers.len();

        let mut rows: Vec<Row> = Vec::new();
        for (row_idx, result) in records.enumerate() {
            if let Some(max) = self.config.max_rows {
                if row_idx >= max {
                    break;
                }
            }

            let record = result?;
            let found = record.len();
            if found != expected {
                if self.config.strict {
                    return Err(DatawashError::MalformedRow {
                        row: row_idx + 1,
                        expected,
                        found,
                    });
                }
                if found > expected {
                    debug!(
                        row = row_idx + 1,
                        expected, found, "dropping extra fields beyond header"
                    );
                }
            }

            let mut row: Row = record.iter().take(expected).map(Value::from_field).collect();
            // Pad short rows
            row.resize(expected, Value::Missing);
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(DatawashError::EmptyFile("No data rows found".to_string()));
        }

        Ok(Dataset::from_parts(headers, rows))
    }

    /// Parse a JSON array of records, or a single record.
    fn parse_json(&self, content: &str) -> Result<Dataset> {
        let decoded: serde_json::Value =
            serde_json::from_str(content).map_err(|e| DatawashError::MalformedJson {
                message: e.to_string(),
            })?;

        let items = match decoded {
            serde_json::Value::Array(items) => items,
            record @ serde_json::Value::Object(_) => vec![record],
            other => {
                return Err(DatawashError::MalformedJson {
                    message: format!("expected an array of records, found {}", json_kind(&other)),
                });
            }
        };

        let mut records = Vec::with_capacity(items.len());
        for (idx, item) in items.into_iter().enumerate() {
            match item {
                serde_json::Value::Object(map) => records.push(map),
                other => {
                    return Err(DatawashError::MalformedJson {
                        message: format!("element {} is {}, not a record", idx, json_kind(&other)),
                    });
                }
            }
        }

        let first = records
            .first()
            .ok_or_else(|| DatawashError::EmptyFile("JSON array has no records".to_string()))?;
        let headers: Vec<String> = first.keys().cloned().collect();
        if headers.is_empty() {
            return Err(DatawashError::EmptyFile(
                "First JSON record has no fields".to_string(),
            ));
        }

        let limit = self.config.max_rows.unwrap_or(usize::MAX);
        let rows: Vec<Row> = records
            .iter()
            .take(limit)
            .map(|record| {
                headers
                    .iter()
                    .map(|h| record.get(h).map(Value::from_json).unwrap_or(Value::Missing))
                    .collect()
            })
            .collect();

        Ok(Dataset::from_parts(headers, rows))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Tab if the content has one, otherwise comma.
fn detect_delimiter(content: &str) -> u8 {
    if content.contains('\t') { b'\t' } else { b',' }
}

/// An unquoted whitespace-only line. Truly empty lines never reach us; a
/// quoted line such as `""` or `" "` is a real single-column record and is kept.
fn is_blank_record(record: &csv::StringRecord, content: &[u8], quote: u8) -> bool {
    if record.len() != 1 || record[0].is_empty() || !record[0].trim().is_empty() {
        return false;
    }

    // The position points just past the previous record's terminator, so
    // skipped empty lines may come first.
    let start = record.position().map_or(0, |pos| pos.byte() as usize);
    let first = content
        .get(start..)
        .and_then(|rest| rest.iter().find(|b| !matches!(b, b'\r' | b'\n')));
    first != Some(&quote)
}

/// Trim, strip quotes, name empty headers and make repeated names unique.
fn normalize_headers<'a>(raw: impl Iterator<Item = &'a str>, quote: char) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut headers = Vec::new();

    for (idx, name) in raw.enumerate() {
        let cleaned: String = name.trim().chars().filter(|&c| c != quote).collect();
        let cleaned = cleaned.trim();
        let base = if cleaned.is_empty() {
            format!("column_{}", idx + 1)
        } else {
            cleaned.to_string()
        };

        let mut candidate = base.clone();
        let mut suffix = 1;
        while seen.contains(&candidate) {
            candidate = format!("{}_{}", base, suffix);
            suffix += 1;
        }
        seen.insert(candidate.clone());
        headers.push(candidate);
    }

    headers
}

fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("sha256:{:x}", hasher.finalize())
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a,b\n1,2"), b',');
        assert_eq!(detect_delimiter("a\tb\n1\t2"), b'\t');
        assert_eq!(detect_delimiter("a,b\n1,x\ty"), b'\t');
    }

    #[test]
    fn test_parse_csv() {
        let parser = Parser::new();
        let ds = parser
            .parse_as("name,age,city\nAlice,30,NYC\nBob,25,LA", SourceFormat::Delimited)
            .unwrap();

        assert_eq!(ds.headers(), &["name", "age", "city"]);
        assert_eq!(ds.row_count(), 2);
        assert_eq!(ds.get(0, 0), Some(&text("Alice")));
        assert_eq!(ds.get(1, 1), Some(&text("25")));
    }

    #[test]
    fn test_headers_trimmed_and_unquoted() {
        let parser = Parser::new();
        let ds = parser
            .parse_as(" \"id\" , name ,\n1,a,b\n", SourceFormat::Delimited)
            .unwrap();
        assert_eq!(ds.headers(), &["id", "name", "column_3"]);
    }

    #[test]
    fn test_duplicate_headers_made_unique() {
        let parser = Parser::new();
        let ds = parser.parse_as("a,a,a\n1,2,3\n", SourceFormat::Delimited).unwrap();
        assert_eq!(ds.headers(), &["a", "a_1", "a_2"]);
    }

    #[test]
    fn test_short_rows_padded_long_rows_truncated() {
        let parser = Parser::new();
        let ds = parser
            .parse_as("a,b,c\n1\n1,2,3,4,5\n", SourceFormat::Delimited)
            .unwrap();
        assert_eq!(ds.rows()[0], vec![text("1"), Value::Missing, Value::Missing]);
        assert_eq!(ds.rows()[1], vec![text("1"), text("2"), text("3")]);
    }

    #[test]
    fn test_strict_mode_rejects_ragged_rows() {
        let parser = Parser::with_config(ParserConfig {
            strict: true,
            ..Default::default()
        });
        let err = parser
            .parse_as("a,b\n1,2\n3\n", SourceFormat::Delimited)
            .unwrap_err();
        assert!(matches!(
            err,
            DatawashError::MalformedRow {
                row: 2,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_blank_lines_skipped() {
        let parser = Parser::new();
        let ds = parser
            .parse_as("\n\na,b\n\n1,2\n   \n3,4\n", SourceFormat::Delimited)
            .unwrap();
        assert_eq!(ds.headers(), &["a", "b"]);
        assert_eq!(ds.row_count(), 2);
    }

    #[test]
    fn test_quoted_whitespace_line_is_a_record() {
        let parser = Parser::new();
        let ds = parser
            .parse_as("a\n\" \"\n   \n\n\"  \"\nx\n", SourceFormat::Delimited)
            .unwrap();
        assert_eq!(ds.rows().len(), 3);
        assert_eq!(ds.rows()[0], vec![text(" ")]);
        assert_eq!(ds.rows()[1], vec![text("  ")]);
        assert_eq!(ds.rows()[2], vec![text("x")]);
    }

    #[test]
    fn test_quoted_fields() {
        let parser = Parser::new();
        let ds = parser
            .parse_as("a,b\n\"x, y\",\"line\nbreak\"\n", SourceFormat::Delimited)
            .unwrap();
        assert_eq!(ds.rows()[0], vec![text("x, y"), text("line\nbreak")]);
    }

    #[test]
    fn test_max_rows() {
        let parser = Parser::with_config(ParserConfig {
            max_rows: Some(1),
            ..Default::default()
        });
        let ds = parser.parse_as("a\n1\n2\n3\n", SourceFormat::Delimited).unwrap();
        assert_eq!(ds.row_count(), 1);
    }

    #[test]
    fn test_header_only_is_empty() {
        let parser = Parser::new();
        assert!(matches!(
            parser.parse_as("a,b\n", SourceFormat::Delimited),
            Err(DatawashError::EmptyFile(_))
        ));
        assert!(matches!(
            parser.parse_as("", SourceFormat::Delimited),
            Err(DatawashError::EmptyFile(_))
        ));
    }

    #[test]
    fn test_parse_json_array() {
        let parser = Parser::new();
        let ds = parser
            .parse_as(
                r#"[{"b": 1, "a": "x"}, {"a": "y", "c": true}, {"b": null}]"#,
                SourceFormat::Json,
            )
            .unwrap();
        assert_eq!(ds.headers(), &["b", "a"]);
        assert_eq!(ds.rows()[0], vec![Value::Numeric(1.0), text("x")]);
        assert_eq!(ds.rows()[1], vec![Value::Missing, text("y")]);
        assert_eq!(ds.rows()[2], vec![Value::Missing, Value::Missing]);
    }

    #[test]
    fn test_parse_json_single_record() {
        let parser = Parser::new();
        let ds = parser
            .parse_as(r#"{"id": 7, "ok": true}"#, SourceFormat::Json)
            .unwrap();
        assert_eq!(ds.row_count(), 1);
        assert_eq!(ds.rows()[0], vec![Value::Numeric(7.0), Value::Boolean(true)]);
    }

    #[test]
    fn test_parse_json_errors() {
        let parser = Parser::new();
        assert!(matches!(
            parser.parse_as("[{\"a\": 1", SourceFormat::Json),
            Err(DatawashError::MalformedJson { .. })
        ));
        assert!(matches!(
            parser.parse_as("42", SourceFormat::Json),
            Err(DatawashError::MalformedJson { .. })
        ));
        assert!(matches!(
            parser.parse_as("[1, 2]", SourceFormat::Json),
            Err(DatawashError::MalformedJson { .. })
        ));
        assert!(matches!(
            parser.parse_as("[]", SourceFormat::Json),
            Err(DatawashError::EmptyFile(_))
        ));
    }

    #[test]
    fn test_parse_content_metadata() {
        let parser = Parser::new();
        let (ds, meta) = parser.parse_content("people.tsv", "a\tb\n1\t2\n").unwrap();
        assert_eq!(ds.column_count(), 2);
        assert_eq!(meta.file, "people.tsv");
        assert_eq!(meta.format, "tsv");
        assert_eq!(meta.row_count, 1);
        assert!(meta.hash.starts_with("sha256:"));
    }
}
