//! Trace parsing and event definitions.
//!
//! This module handles:
//! - Repairing truncated JSON arrays
//! - Unwrapping `traceEvents` containers into events + metadata
//! - Reading loosely typed event objects into [`EventRecord`]s
//! - Sniffing whether input is in the trace event format at all

pub mod event;
pub mod normalizer;

// Re-export main types
pub use event::{value_to_key, EventRecord, Phase};
pub use normalizer::{can_import, decode_trace, repair_truncated_array, DecodedTrace, TraceInput};
