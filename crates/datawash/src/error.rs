//! Error types for the datawash library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for datawash operations.
///
/// Only ingestion and collaborator input can fail. Cleaning steps degrade to
/// typed defaults instead of returning errors.
#[derive(Debug, Error)]
pub enum DatawashError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File extension or content is neither delimited text nor JSON.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// No header or no data rows.
    #[error("Empty file: {0}")]
    EmptyFile(String),

    /// JSON content failed to decode or has the wrong shape.
    #[error("Malformed JSON: {message}")]
    MalformedJson { message: String },

    /// Row length differs from the header length (strict parsing only).
    #[error("Malformed row {row}: expected {expected} fields, found {found}")]
    MalformedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error (export side).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Unknown step id or unparseable step parameter.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl DatawashError {
    /// Short message suitable for showing to the person who uploaded the file.
    pub fn user_message(&self) -> String {
        match self {
            DatawashError::Io { path, .. } => format!("Could not read '{}'", path.display()),
            DatawashError::UnsupportedFormat(_) => {
                "Unsupported file format. Use CSV, TSV, TXT or JSON.".to_string()
            }
            DatawashError::EmptyFile(_) => "The file is empty or has no data rows.".to_string(),
            DatawashError::MalformedJson { .. } => "The JSON file is not valid.".to_string(),
            DatawashError::MalformedRow { row, .. } => {
                format!("Row {} does not match the header.", row)
            }
            DatawashError::Csv(_) => "The delimited file could not be read.".to_string(),
            DatawashError::Json(_) => "The data could not be serialized.".to_string(),
            DatawashError::InvalidParameter(msg) => msg.clone(),
        }
    }
}

/// Result type alias for datawash operations.
pub type Result<T> = std::result::Result<T, DatawashError>;
