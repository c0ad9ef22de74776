//! Datawash CLI - profile and clean tabular data files.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Profile {
            file,
            json,
            sample_rows,
        } => commands::profile::run(file, json, sample_rows, cli.verbose),

        Commands::Steps => commands::steps::run(),

        Commands::Clean {
            file,
            steps,
            automated,
            missing_strategy,
            outliers,
            output,
            format,
            strict,
        } => commands::clean::run(
            commands::clean::CleanArgs {
                file,
                steps,
                automated,
                missing_strategy,
                outliers,
                output,
                format,
                strict,
            },
            cli.verbose,
        ),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr. `RUST_LOG` wins; otherwise `warn`, or `debug` with `-v`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
