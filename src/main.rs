//! Trace Event Importer CLI
//!
//! Imports Chrome Trace Event files and reports what ended up in the model.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use trace_event_importer::commands::{detect_format, display_version, execute_import, ImportArgs};
use trace_event_importer::ImportOptions;

/// Trace Event Importer - Chrome trace JSON to timeline model
#[derive(Parser, Debug)]
#[command(name = "trace-import")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Import a trace file and print a summary
    Import {
        /// Path to the trace JSON file
        #[arg(short, long)]
        file: PathBuf,

        /// Output path for the JSON summary (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Shift all timestamps so the trace starts at zero
        #[arg(long)]
        shift_to_zero: bool,

        /// Leave unterminated slices open instead of closing them at the end
        #[arg(long)]
        no_auto_close: bool,
    },

    /// Check whether a file is trace event data
    Detect {
        /// Path to the file to check
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Import {
            file,
            output,
            shift_to_zero,
            no_auto_close,
        } => {
            let args = ImportArgs {
                input: file,
                output_json: output,
                options: ImportOptions::new()
                    .with_shift_world_to_zero(shift_to_zero)
                    .with_auto_close_open_slices(!no_auto_close),
            };
            execute_import(&args)?;
        }

        Commands::Detect { file } => {
            if !detect_format(&file)? {
                std::process::exit(1);
            }
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
