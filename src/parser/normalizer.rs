//! Event normalizer.
//!
//! Turns raw trace input into a flat, ordered list of [`EventRecord`]s:
//! - repairs JSON arrays whose writer never got to emit the closing `]`
//! - unwraps the `{"traceEvents": [...], ...}` container, keeping every
//!   sibling field as model metadata
//! - decodes each element, setting aside elements that cannot be read

use super::event::EventRecord;
use crate::model::Metadata;
use crate::utils::config::TRACE_EVENTS_FIELD;
use crate::utils::error::ParseError;
use log::{debug, warn};
use serde_json::Value;
use std::borrow::Cow;

/// Raw input handed to the importer
#[derive(Debug, Clone)]
pub enum TraceInput {
    /// Undecoded JSON text
    Text(String),
    /// An already decoded JSON array or container object
    Events(Value),
}

impl From<String> for TraceInput {
    fn from(text: String) -> Self {
        TraceInput::Text(text)
    }
}

impl From<&str> for TraceInput {
    fn from(text: &str) -> Self {
        TraceInput::Text(text.to_string())
    }
}

impl From<Value> for TraceInput {
    fn from(value: Value) -> Self {
        TraceInput::Events(value)
    }
}

/// Result of normalizing one input
#[derive(Debug, Clone, Default)]
pub struct DecodedTrace {
    /// Events in input order
    pub events: Vec<EventRecord>,

    /// Sibling fields of a `traceEvents` container, in document order
    pub metadata: Vec<Metadata>,

    /// One message per array element that could not be read as an event
    pub malformed: Vec<String>,
}

/// Check whether this importer should handle the input
///
/// **Public** - format-detection predicate for an external dispatcher.
/// Pure; text is only sniffed, never parsed.
pub fn can_import(input: &TraceInput) -> bool {
    match input {
        TraceInput::Text(text) => text.starts_with('{') || text.starts_with('['),
        TraceInput::Events(value) => can_import_value(value),
    }
}

/// **Private** - decoded-value branch of can_import
fn can_import_value(value: &Value) -> bool {
    match value {
        Value::Array(events) => first_has_phase(events),
        Value::Object(container) => match container.get(TRACE_EVENTS_FIELD) {
            Some(Value::Array(events)) => first_has_phase(events),
            _ => false,
        },
        _ => false,
    }
}

fn first_has_phase(events: &[Value]) -> bool {
    events
        .first()
        .and_then(|event| event.get("ph"))
        .map_or(false, |ph| !ph.is_null())
}

/// Close a JSON array that was cut off mid-stream
///
/// **Public** - applied to text input before decoding
///
/// Text not starting with `[` is returned untouched. Otherwise trailing
/// whitespace and a dangling comma are removed and a `]` is appended when the
/// last significant character is not already one.
pub fn repair_truncated_array(text: &str) -> Cow<'_, str> {
    if !text.starts_with('[') {
        return Cow::Borrowed(text);
    }

    let trimmed = text.trim_end();
    let trimmed = trimmed.strip_suffix(',').unwrap_or(trimmed);

    if trimmed.ends_with(']') {
        if trimmed.len() == text.len() {
            Cow::Borrowed(text)
        } else {
            Cow::Borrowed(trimmed)
        }
    } else {
        debug!("Repairing truncated event array");
        Cow::Owned(format!("{}]", trimmed))
    }
}

/// Decode input into events and container metadata
///
/// **Public** - main entry point for normalization
///
/// # Arguments
/// * `input` - Raw text or an already decoded value
///
/// # Returns
/// Events in input order plus any container metadata
///
/// # Errors
/// * `ParseError::JsonError` - Text is not valid JSON even after repair
/// * `ParseError::InvalidFormat` - `traceEvents` is present but not an array,
///   or the top-level value is neither an array nor an object
pub fn decode_trace(input: TraceInput) -> Result<DecodedTrace, ParseError> {
    let value = match input {
        TraceInput::Text(text) => {
            let repaired = repair_truncated_array(&text);
            serde_json::from_str::<Value>(&repaired)?
        }
        TraceInput::Events(value) => value,
    };

    let (raw_events, metadata) = unwrap_container(value)?;

    let mut decoded = DecodedTrace {
        events: Vec::with_capacity(raw_events.len()),
        metadata,
        malformed: Vec::new(),
    };

    for (index, raw) in raw_events.iter().enumerate() {
        match EventRecord::from_value(raw) {
            Ok(event) => decoded.events.push(event),
            Err(e) => {
                // Log but don't fail - one bad record must not sink the trace
                warn!("Failed to read trace event {}: {}", index, e);
                decoded
                    .malformed
                    .push(format!("Malformed trace event at index {}: {}", index, e));
            }
        }
    }

    debug!(
        "Normalized {} events ({} metadata fields, {} malformed)",
        decoded.events.len(),
        decoded.metadata.len(),
        decoded.malformed.len()
    );

    Ok(decoded)
}

/// Split a decoded value into the event array and container metadata
///
/// **Private** - internal helper for decode_trace
fn unwrap_container(value: Value) -> Result<(Vec<Value>, Vec<Metadata>), ParseError> {
    match value {
        Value::Array(events) => Ok((events, Vec::new())),

        Value::Object(mut container) => {
            let Some(events) = container.remove(TRACE_EVENTS_FIELD) else {
                warn!("Object input has no {} field, nothing to import", TRACE_EVENTS_FIELD);
                return Ok((Vec::new(), Vec::new()));
            };

            let Value::Array(events) = events else {
                return Err(ParseError::InvalidFormat(format!(
                    "{} must be an array",
                    TRACE_EVENTS_FIELD
                )));
            };

            let metadata = container
                .into_iter()
                .map(|(name, value)| Metadata { name, value })
                .collect();

            Ok((events, metadata))
        }

        _ => Err(ParseError::InvalidFormat(
            "Trace must be a JSON array or object".to_string(),
        )),
    }
}
