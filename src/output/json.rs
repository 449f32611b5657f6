//! JSON summary output writer.
//!
//! Reduces a [`Model`] to a serializable [`ModelSummary`] and writes it to
//! disk with proper formatting.

use crate::model::{Metadata, Model};
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::OutputError;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Top-level summary of an imported model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    /// Summary schema version
    pub version: String,

    pub processes: Vec<ProcessSummary>,

    /// Earliest timestamp in the model (ms), if any
    pub min_ms: Option<f64>,

    /// Latest timestamp in the model (ms), if any
    pub max_ms: Option<f64>,

    pub metadata: Vec<MetadataEntry>,

    pub import_errors: Vec<String>,

    /// ISO 8601 generation timestamp
    pub generated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessSummary {
    pub pid: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub threads: Vec<ThreadSummary>,
    pub counters: Vec<CounterSummary>,

    /// Number of object instances across all ids
    pub object_instances: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadSummary {
    pub tid: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub slices: usize,
    pub async_slices: usize,
    pub samples: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterSummary {
    pub category: String,
    pub name: String,
    pub series: Vec<String>,
    pub samples: usize,
}

/// Serialized form of [`Metadata`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataEntry {
    pub name: String,
    pub value: Value,
}

impl From<&Metadata> for MetadataEntry {
    fn from(metadata: &Metadata) -> Self {
        Self {
            name: metadata.name.clone(),
            value: metadata.value.clone(),
        }
    }
}

impl ModelSummary {
    /// Summarize `model`, stamping the current time
    ///
    /// **Public** - used by the import command
    pub fn from_model(model: &Model) -> Self {
        let processes = model
            .processes
            .values()
            .map(|process| ProcessSummary {
                pid: process.pid.clone(),
                name: process.name.clone(),
                threads: process
                    .threads
                    .values()
                    .map(|thread| ThreadSummary {
                        tid: thread.tid.clone(),
                        name: thread.name.clone(),
                        slices: thread.slices.len(),
                        async_slices: thread.async_slices.len(),
                        samples: thread.samples.len(),
                    })
                    .collect(),
                counters: process
                    .counters
                    .values()
                    .map(|counter| CounterSummary {
                        category: counter.category.clone(),
                        name: counter.name.clone(),
                        series: counter.series_names.clone(),
                        samples: counter.num_samples(),
                    })
                    .collect(),
                object_instances: process.objects.instance_count(),
            })
            .collect();

        Self {
            version: SCHEMA_VERSION.to_string(),
            processes,
            min_ms: model.bounds.min(),
            max_ms: model.bounds.max(),
            metadata: model.metadata.iter().map(MetadataEntry::from).collect(),
            import_errors: model.import_errors.clone(),
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn total_threads(&self) -> usize {
        self.processes.iter().map(|p| p.threads.len()).sum()
    }

    pub fn total_slices(&self) -> usize {
        self.processes
            .iter()
            .flat_map(|p| &p.threads)
            .map(|t| t.slices + t.async_slices)
            .sum()
    }

    pub fn total_counters(&self) -> usize {
        self.processes.iter().map(|p| p.counters.len()).sum()
    }

    /// Human readable multi-line report
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Processes:     {}\n", self.processes.len()));
        out.push_str(&format!("Threads:       {}\n", self.total_threads()));
        out.push_str(&format!("Slices:        {}\n", self.total_slices()));
        out.push_str(&format!("Counters:      {}\n", self.total_counters()));
        match (self.min_ms, self.max_ms) {
            (Some(min), Some(max)) => out.push_str(&format!(
                "Time range:    {:.3} ms .. {:.3} ms ({:.3} ms)\n",
                min,
                max,
                max - min
            )),
            _ => out.push_str("Time range:    empty\n"),
        }
        out.push_str(&format!("Import errors: {}\n", self.import_errors.len()));
        for error in &self.import_errors {
            out.push_str(&format!("  - {}\n", error));
        }
        out
    }
}

/// Write a summary to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Arguments
/// * `summary` - Summary to write
/// * `output_path` - Path to output JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_summary(
    summary: &ModelSummary,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing summary to: {}", output_path.display());

    validate_output_path(output_path)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), summary)?;

    info!(
        "Summary written successfully ({} bytes)",
        calculate_file_size(output_path)
    );

    Ok(())
}

/// Serialize a summary to a pretty JSON string
///
/// **Public** - useful for tests and stdout output
pub fn summary_to_string(summary: &ModelSummary) -> Result<String, OutputError> {
    Ok(serde_json::to_string_pretty(summary)?)
}

/// Read a summary back from a JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_summary(input_path: impl AsRef<Path>) -> Result<ModelSummary, OutputError> {
    let input_path = input_path.as_ref();
    debug!("Reading summary from: {}", input_path.display());

    let file = File::open(input_path)?;
    Ok(serde_json::from_reader(file)?)
}

/// Validate that output path is writable
///
/// **Private** - internal validation
fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// **Private** - internal utility
fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}
