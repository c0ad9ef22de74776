//! Clean command - apply cleaning steps and export the cleaned data.

use std::path::PathBuf;

use colored::Colorize;
use datawash::{
    CleaningOperation, Datawash, DatawashConfig, ExportFormat, MissingStrategy, OutlierMethod,
    ParserConfig, StepId, StepReport,
};

/// Arguments of the clean command.
pub struct CleanArgs {
    pub file: PathBuf,
    pub steps: Vec<StepId>,
    pub automated: bool,
    pub missing_strategy: MissingStrategy,
    pub outliers: OutlierMethod,
    pub output: Option<PathBuf>,
    pub format: ExportFormat,
    pub strict: bool,
}

impl CleanArgs {
    /// The operation for a step, with parameters taken from the flags.
    fn operation(&self, id: StepId) -> Result<CleaningOperation, String> {
        match id {
            StepId::HandleMissingValues => Ok(CleaningOperation::HandleMissingValues {
                strategy: self.missing_strategy,
            }),
            StepId::DetectOutliers => Ok(CleaningOperation::DetectOutliers {
                method: self.outliers,
            }),
            other => CleaningOperation::automated(other)
                .ok_or_else(|| format!("Step '{}' needs parameters", other)),
        }
    }
}

pub fn run(args: CleanArgs, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !args.file.exists() {
        return Err(format!("File not found: {}", args.file.display()).into());
    }

    if args.steps.is_empty() && !args.automated {
        return Err("No cleaning steps given. Use --step <ID> or --automated.\n\
                    Run 'datawash steps' to list them."
            .into());
    }

    let config = DatawashConfig {
        parser: ParserConfig {
            strict: args.strict,
            ..Default::default()
        },
        ..Default::default()
    };
    let mut session = Datawash::with_config(config).ingest_path(&args.file)?;

    println!(
        "{} {} ({} rows, {} columns)",
        "Loaded".cyan().bold(),
        session.source().file.white(),
        session.dataset().row_count(),
        session.dataset().column_count()
    );
    for warning in &session.profile().warnings {
        println!("  {} {}", "!".yellow(), warning);
    }
    println!();

    if args.automated {
        for report in session.apply_automated() {
            print_report(report, verbose);
        }
    }

    for id in &args.steps {
        let operation = args.operation(*id)?;
        print_report(session.apply(operation), verbose);
    }

    let profile = session.profile();
    println!();
    println!(
        "{} {} rows, {} missing values, {} duplicate rows",
        "Result:".cyan().bold(),
        profile.row_count.to_string().white().bold(),
        profile.total_missing(),
        profile.duplicate_row_count
    );

    let blob = session.export(args.format)?;
    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| args.file.with_file_name(&blob.file_name));
    blob.write_to(&output_path)?;

    println!(
        "{} {} ({})",
        "Saved".green().bold(),
        output_path.display().to_string().cyan(),
        blob.mime_type
    );

    Ok(())
}

fn print_report(report: &StepReport, verbose: bool) {
    println!("  {} {}", "✓".green(), report.description);

    if report.rows_removed() > 0 {
        println!(
            "    rows: {} → {}",
            report.rows_before,
            report.rows_after.to_string().white().bold()
        );
    }
    if report.values_changed > 0 {
        println!("    values changed: {}", report.values_changed.to_string().white());
    }
    if let Some(outliers) = &report.outliers {
        for (column, count) in outliers {
            let count = if *count > 0 {
                count.to_string().yellow()
            } else {
                count.to_string().green()
            };
            println!("    outliers in '{}': {}", column, count);
        }
    }
    if verbose && report.is_noop() && report.outliers.is_none() {
        println!("    {}", "no changes".dimmed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn args(file: PathBuf, output: PathBuf) -> CleanArgs {
        CleanArgs {
            file,
            steps: Vec::new(),
            automated: false,
            missing_strategy: MissingStrategy::FillTyped,
            outliers: OutlierMethod::ZScore { threshold: 3.0 },
            output: Some(output),
            format: ExportFormat::Csv,
            strict: false,
        }
    }

    #[test]
    fn test_clean_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("data.csv");
        let output = dir.path().join("out.csv");
        fs::write(&input, "a,b\n1,x\n1,x\n,y\n").unwrap();

        let mut clean = args(input, output.clone());
        clean.steps = vec![StepId::RemoveDuplicates, StepId::HandleMissingValues];
        run(clean, false).unwrap();

        assert_eq!(fs::read_to_string(&output).unwrap(), "a,b\n1,x\n0,y\n");
    }

    #[test]
    fn test_clean_requires_steps() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("data.csv");
        fs::write(&input, "a\n1\n").unwrap();

        assert!(run(args(input, dir.path().join("out.csv")), false).is_err());
    }

    #[test]
    fn test_operation_uses_flags() {
        let dir = tempfile::tempdir().unwrap();
        let mut clean = args(dir.path().join("x.csv"), dir.path().join("y.csv"));
        clean.missing_strategy = MissingStrategy::DropRow;

        assert_eq!(
            clean.operation(StepId::HandleMissingValues).unwrap(),
            CleaningOperation::HandleMissingValues {
                strategy: MissingStrategy::DropRow
            }
        );
        assert_eq!(
            clean.operation(StepId::DetectOutliers).unwrap(),
            CleaningOperation::DetectOutliers {
                method: OutlierMethod::ZScore { threshold: 3.0 }
            }
        );
    }
}
