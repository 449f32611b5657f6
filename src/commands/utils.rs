use super::import::read_trace_file;
use crate::importer::TraceEventImporter;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::Result;
use std::path::Path;

/// Report whether a file looks like trace event data
pub fn detect_format(file_path: &Path) -> Result<bool> {
    println!("Checking: {}", file_path.display());

    let input = read_trace_file(file_path)?;
    let recognized = TraceEventImporter::can_import(&input);

    if recognized {
        println!("✓ Chrome Trace Event data");
    } else {
        println!("✗ Not recognized as trace event data");
    }

    Ok(recognized)
}

/// Display version information
pub fn display_version() {
    println!("Trace Event Importer v{}", env!("CARGO_PKG_VERSION"));
    println!("Summary Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Imports Chrome Trace Event JSON into a timeline model.");
}
