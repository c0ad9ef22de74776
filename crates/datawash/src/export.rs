//! Serialization of a cleaned dataset into a downloadable blob.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::error::{DatawashError, Result};

/// Prefix of every exported file name.
pub const FILE_NAME_PREFIX: &str = "cleaned-data";

/// Output format for exported data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Tsv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
            ExportFormat::Json => "json",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Tsv => "text/tab-separated-values",
            ExportFormat::Json => "application/json",
        }
    }

    /// `cleaned-data-<YYYY-MM-DD>.<ext>`
    pub fn file_name(&self, date: NaiveDate) -> String {
        format!(
            "{}-{}.{}",
            FILE_NAME_PREFIX,
            date.format("%Y-%m-%d"),
            self.extension()
        )
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "tsv" | "tab" => Ok(ExportFormat::Tsv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(format!("Unknown format: {}. Use csv, tsv, or json.", s)),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Serialized dataset ready to be saved or offered for download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportBlob {
    pub file_name: String,
    pub mime_type: String,
    pub content: String,
}

impl ExportBlob {
    /// Write the content to `path`.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, &self.content).map_err(|e| DatawashError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Serialize a dataset in the given format, naming the file after `date`.
pub fn export(dataset: &Dataset, format: ExportFormat, date: NaiveDate) -> Result<ExportBlob> {
    let content = match format {
        ExportFormat::Csv => to_delimited(dataset, b',')?,
        ExportFormat::Tsv => to_delimited(dataset, b'\t')?,
        ExportFormat::Json => serde_json::to_string_pretty(&dataset.records())?,
    };

    Ok(ExportBlob {
        file_name: format.file_name(date),
        mime_type: format.mime_type().to_string(),
        content,
    })
}

/// Header line then one line per row, `\n`-terminated. Fields holding the
/// delimiter, a quote or a line break are quoted with inner quotes doubled;
/// missing values are empty fields. A row made of one blank field is quoted
/// so it is not read back as a blank line.
pub fn to_delimited(dataset: &Dataset, delimiter: u8) -> Result<String> {
    let mut out = Vec::new();
    let mut writer = delimited_writer(delimiter, csv::QuoteStyle::Necessary);
    writer.write_record(dataset.headers())?;

    for row in dataset.rows() {
        let fields: Vec<String> = row.iter().map(|value| value.render().into_owned()).collect();
        if let [field] = fields.as_slice() {
            if field.trim().is_empty() {
                out.extend(finish(writer)?);
                let mut quoted = delimited_writer(delimiter, csv::QuoteStyle::Always);
                quoted.write_record(&fields)?;
                out.extend(finish(quoted)?);
                writer = delimited_writer(delimiter, csv::QuoteStyle::Necessary);
                continue;
            }
        }
        writer.write_record(&fields)?;
    }
    out.extend(finish(writer)?);

    String::from_utf8(out)
        .map_err(|e| DatawashError::UnsupportedFormat(format!("export is not UTF-8: {}", e)))
}

fn delimited_writer(delimiter: u8, style: csv::QuoteStyle) -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(style)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new())
}

fn finish(mut writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer.flush().map_err(csv::Error::from)?;
    let bytes = writer.into_inner().map_err(|e| {
        csv::Error::from(io::Error::new(e.error().kind(), e.error().to_string()))
    })?;
    Ok(bytes)
}
