//! Profile command - show column types, missing values and quality warnings.

use std::path::PathBuf;

use colored::Colorize;
use datawash::{ColumnType, Datawash, DatawashConfig, DatasetProfile, ProfilerConfig};

pub fn run(
    file: PathBuf,
    json_output: bool,
    sample_rows: usize,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let config = DatawashConfig {
        profiler: ProfilerConfig {
            type_sample_rows: sample_rows,
            ..Default::default()
        },
        ..Default::default()
    };
    let session = Datawash::with_config(config).ingest_path(&file)?;
    let profile = session.profile();

    if json_output {
        let output = serde_json::json!({
            "source": session.source(),
            "profile": profile,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Profile of".cyan().bold(),
        session.source().file.white()
    );
    println!();
    print_summary(profile);
    println!();
    print_columns(profile, verbose);

    if !profile.warnings.is_empty() {
        println!();
        println!("{}", "Warnings:".yellow().bold());
        for warning in &profile.warnings {
            println!("  {} {}", "!".yellow(), warning);
        }
    }

    Ok(())
}

fn print_summary(profile: &DatasetProfile) {
    println!("  Rows:       {}", profile.row_count.to_string().white().bold());
    println!("  Columns:    {}", profile.column_count.to_string().white().bold());
    println!(
        "  Missing:    {} ({:.1}%)",
        profile.total_missing().to_string().white(),
        profile.missing_ratio() * 100.0
    );

    let duplicates = profile.duplicate_row_count.to_string();
    println!(
        "  Duplicates: {}",
        if profile.duplicate_row_count > 0 {
            duplicates.yellow()
        } else {
            duplicates.green()
        }
    );
    println!("  Memory:     {}", profile.memory_estimate_label());
}

fn print_columns(profile: &DatasetProfile, verbose: bool) {
    println!("{}", "Columns:".yellow().bold());

    let width = profile
        .columns
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(6);

    for column in &profile.columns {
        let kind = match column.inferred_type {
            ColumnType::Numeric => column.inferred_type.label().blue(),
            ColumnType::Date => column.inferred_type.label().magenta(),
            ColumnType::Boolean => column.inferred_type.label().cyan(),
            ColumnType::Text => column.inferred_type.label().white(),
            ColumnType::Empty => column.inferred_type.label().dimmed(),
        };

        let missing = if column.missing_count > 0 {
            format!("{} missing", column.missing_count).yellow()
        } else {
            "complete".green()
        };

        println!(
            "  {:<width$}  {:<8}  {:>12}  {} unique  {}",
            column.name,
            kind,
            missing,
            column.unique_value_count,
            column.sample_values.join(", ").dimmed(),
            width = width
        );

        if verbose {
            if let Some(stats) = &column.numeric {
                println!(
                    "  {:<width$}  min {} / q1 {} / median {} / q3 {} / max {}, mean {:.3}, std {:.3}",
                    "",
                    stats.min,
                    stats.q1,
                    stats.median,
                    stats.q3,
                    stats.max,
                    stats.mean,
                    stats.std,
                    width = width
                );
            }
        }
    }
}
