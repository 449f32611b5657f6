//! Import command implementation.
//!
//! The import command:
//! 1. Reads the trace file
//! 2. Imports it into a fresh model
//! 3. Prints a text summary
//! 4. Optionally writes the JSON summary

use crate::model::Model;
use crate::output::{write_summary, ModelSummary};
use crate::parser::TraceInput;
use crate::utils::config::ImportOptions;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Arguments for the import command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ImportArgs {
    /// Trace file to import
    pub input: PathBuf,

    /// Output path for the JSON summary (optional)
    pub output_json: Option<PathBuf>,

    pub options: ImportOptions,
}

impl ImportArgs {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_json: None,
            options: ImportOptions::default(),
        }
    }
}

/// Execute the import command
///
/// **Public** - main entry point called from main.rs
///
/// # Arguments
/// * `args` - Import command arguments
///
/// # Returns
/// The summary that was printed, for callers that want to inspect it
///
/// # Errors
/// * File read errors
/// * Trace decoding errors (recoverable problems are reported, not returned)
/// * File write errors
pub fn execute_import(args: &ImportArgs) -> Result<ModelSummary> {
    let start_time = Instant::now();

    info!("Importing trace: {}", args.input.display());

    let input = read_trace_file(&args.input)?;

    let mut model = Model::new();
    model
        .import_traces([input], args.options)
        .with_context(|| format!("Failed to import {}", args.input.display()))?;

    debug!("Imported {} processes", model.processes.len());
    if model.has_import_errors() {
        warn!(
            "{} recoverable problem(s) during import",
            model.import_errors.len()
        );
    }

    let summary = ModelSummary::from_model(&model);

    println!("\n{}", "=".repeat(80));
    println!("TRACE SUMMARY");
    println!("{}", "=".repeat(80));
    println!("File:          {}", args.input.display());
    print!("{}", summary.to_text());
    println!("{}", "=".repeat(80));

    if let Some(path) = &args.output_json {
        write_summary(&summary, path).context("Failed to write summary JSON")?;
        info!("✓ Summary written to: {}", path.display());
    }

    info!(
        "Import completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(summary)
}

/// Read a trace file into an importer input
///
/// **Public** - shared by import and detect
pub fn read_trace_file(path: &Path) -> Result<TraceInput> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read trace file {}", path.display()))?;
    Ok(TraceInput::Text(text))
}
