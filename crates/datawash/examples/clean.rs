//! Example: profile a tabular data file and run the automated cleaning steps.
//!
//! Usage:
//!   cargo run --example clean -- <file_path>

use std::env;
use std::path::Path;

use datawash::{CleaningOperation, Datawash, ExportFormat, OutlierMethod};

fn main() -> datawash::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example clean -- <file_path>");
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);
    if !path.exists() {
        eprintln!("Error: File not found: {}", path.display());
        std::process::exit(1);
    }

    let separator = "=".repeat(80);
    println!("{}", separator);
    println!("Datawash: {}", path.display());
    println!("{}", separator);
    println!();

    let mut session = Datawash::new().ingest_path(path)?;

    let profile = session.profile();
    println!("## Profile");
    println!("  Rows: {}", profile.row_count);
    println!("  Columns: {}", profile.column_count);
    println!("  Duplicate rows: {}", profile.duplicate_row_count);
    println!("  Memory estimate: {}", profile.memory_estimate_label());
    println!();
    for column in &profile.columns {
        println!(
            "  {:<24} {:<8} missing={:<5} unique={:<5} samples=[{}]",
            column.name,
            column.inferred_type,
            column.missing_count,
            column.unique_value_count,
            column.sample_values.join(", ")
        );
    }
    for warning in &profile.warnings {
        println!("  warning: {}", warning);
    }
    println!();

    println!("## Outliers (z-score > 3)");
    let report = session.apply(CleaningOperation::DetectOutliers {
        method: OutlierMethod::ZScore { threshold: 3.0 },
    });
    if let Some(outliers) = &report.outliers {
        for (column, count) in outliers {
            println!("  {}: {}", column, count);
        }
    }
    println!();

    println!("## Automated cleaning");
    for report in session.apply_automated() {
        println!(
            "  {}: rows {} -> {}, {} values changed",
            report.step, report.rows_before, report.rows_after, report.values_changed
        );
    }
    println!();

    let blob = session.export(ExportFormat::Csv)?;
    println!("## Export");
    println!("  {} ({}, {} bytes)", blob.file_name, blob.mime_type, blob.content.len());
    for line in blob.content.lines().take(5) {
        println!("  | {}", line);
    }

    Ok(())
}
