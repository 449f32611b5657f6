//! Output writers for imported models.
//!
//! This module handles reducing a model to a summary and writing it to disk
//! as pretty JSON.

pub mod json;

// Re-export main functions
pub use json::{
    read_summary, summary_to_string, write_summary, CounterSummary, MetadataEntry, ModelSummary,
    ProcessSummary, ThreadSummary,
};
