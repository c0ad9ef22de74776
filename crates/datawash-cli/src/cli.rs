//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use datawash::{ExportFormat, MissingStrategy, OutlierMethod, StepId};

/// Datawash: profile and clean tabular data files
#[derive(Parser)]
#[command(name = "datawash")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Profile a data file: column types, missing values, duplicates, warnings
    Profile {
        /// Path to the data file (CSV/TSV/TXT/JSON)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output the profile as JSON
        #[arg(long)]
        json: bool,

        /// Rows sampled for type inference
        #[arg(long, default_value = "100")]
        sample_rows: usize,
    },

    /// List the cleaning steps in catalog order
    Steps,

    /// Apply cleaning steps and export the result
    Clean {
        /// Path to the data file (CSV/TSV/TXT/JSON)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Step to apply, in the order given (repeatable)
        #[arg(short, long = "step", value_name = "ID")]
        steps: Vec<StepId>,

        /// Run every automated step once, in catalog order
        #[arg(long)]
        automated: bool,

        /// Missing-value strategy: fill-typed or drop-row
        #[arg(long, default_value = "fill-typed")]
        missing_strategy: MissingStrategy,

        /// Outlier method for detect_outliers, e.g. zscore:3 or iqr:1.5
        #[arg(long, value_name = "METHOD", default_value = "zscore")]
        outliers: OutlierMethod,

        /// Output path (default: cleaned-data-<date>.<ext> next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "csv")]
        format: ExportFormat,

        /// Stop on rows whose length differs from the header
        #[arg(long)]
        strict: bool,
    },
}
