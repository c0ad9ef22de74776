//! Source format detection and metadata.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DatawashError, Result};

/// Extensions read as delimited text.
const DELIMITED_EXTENSIONS: &[&str] = &["csv", "tsv", "txt"];

/// How raw content is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    /// Comma- or tab-delimited text with a header row.
    Delimited,
    /// An array of JSON records, or a single record.
    Json,
}

impl SourceFormat {
    /// Format implied by a file extension, if it is a supported one.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        if DELIMITED_EXTENSIONS.contains(&ext.as_str()) {
            Some(SourceFormat::Delimited)
        } else if ext == "json" {
            Some(SourceFormat::Json)
        } else {
            None
        }
    }

    /// Detect the format from the file name, falling back to the content.
    pub fn detect(file_name: Option<&str>, content: &str) -> Result<Self> {
        let extension = file_name
            .map(Path::new)
            .and_then(|p| p.extension())
            .map(|e| e.to_string_lossy().into_owned());

        if let Some(ext) = extension {
            return Self::from_extension(&ext).ok_or_else(|| {
                DatawashError::UnsupportedFormat(format!("extension '.{}' is not supported", ext))
            });
        }

        Self::sniff(content)
    }

    /// Guess the format from the content alone.
    pub fn sniff(content: &str) -> Result<Self> {
        if content.contains('\0') {
            return Err(DatawashError::UnsupportedFormat(
                "content looks binary".to_string(),
            ));
        }
        match content.trim_start().chars().next() {
            Some('[') | Some('{') => Ok(SourceFormat::Json),
            _ => Ok(SourceFormat::Delimited),
        }
    }
}

/// Metadata about the ingested source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file, when ingested from disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// SHA-256 hash of the raw content.
    pub hash: String,
    /// Content size in bytes.
    pub size_bytes: u64,
    /// Detected format label (csv, tsv, json).
    pub format: String,
    /// Encoding the content was decoded with.
    pub encoding: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When ingestion happened.
    pub ingested_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for content that has just been ingested.
    pub fn new(
        file: impl Into<String>,
        path: Option<PathBuf>,
        hash: String,
        size_bytes: u64,
        format: String,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        Self {
            file: file.into(),
            path,
            hash,
            size_bytes,
            format,
            encoding: "utf-8".to_string(),
            row_count,
            column_count,
            ingested_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_by_extension() {
        assert_eq!(
            SourceFormat::detect(Some("data.CSV"), "").unwrap(),
            SourceFormat::Delimited
        );
        assert_eq!(
            SourceFormat::detect(Some("notes.txt"), "").unwrap(),
            SourceFormat::Delimited
        );
        assert_eq!(
            SourceFormat::detect(Some("dump.json"), "a,b").unwrap(),
            SourceFormat::Json
        );
        assert!(matches!(
            SourceFormat::detect(Some("sheet.xlsx"), "a,b"),
            Err(DatawashError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_detect_by_content() {
        assert_eq!(
            SourceFormat::detect(None, "  [{\"a\": 1}]").unwrap(),
            SourceFormat::Json
        );
        assert_eq!(
            SourceFormat::detect(Some("upload"), "a,b\n1,2").unwrap(),
            SourceFormat::Delimited
        );
        assert!(matches!(
            SourceFormat::detect(None, "PK\0\u{3}"),
            Err(DatawashError::UnsupportedFormat(_))
        ));
    }
}
