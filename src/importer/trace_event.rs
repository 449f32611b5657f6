//! Importer for the Chrome Trace Event format.
//!
//! One forward scan dispatches every event by phase: sync slices, instants,
//! samples, counters and metadata mutate the model immediately; async and
//! object events are buffered and replayed in `finalize_import`.

use super::async_slices::create_async_slices;
use super::counters::process_counter_event;
use super::objects::create_objects;
use super::slices::{process_begin, process_end, process_instant, process_sample};
use super::{thread_for, DeferredEvent, Importer};
use crate::model::Model;
use crate::parser::{self, value_to_key, EventRecord, Phase, TraceInput};
use crate::utils::config::{PROCESS_NAME_METADATA, THREAD_NAME_METADATA};
use crate::utils::error::ParseError;
use log::debug;
use std::mem;

/// Two-pass importer for trace event arrays and `traceEvents` containers
#[derive(Debug)]
pub struct TraceEventImporter {
    events: Vec<EventRecord>,
    all_async_events: Vec<DeferredEvent>,
    all_object_events: Vec<DeferredEvent>,
}

impl TraceEventImporter {
    /// Whether this importer understands `input`
    ///
    /// **Public** - format-detection predicate, no side effects
    pub fn can_import(input: &TraceInput) -> bool {
        parser::can_import(input)
    }

    /// Decode `input` and record container metadata on the model
    ///
    /// **Public** - constructor; decoding happens here, not in import_events
    ///
    /// # Errors
    /// * `ParseError::JsonError` - text is not JSON even after repair
    /// * `ParseError::InvalidFormat` - not an event array or container
    pub fn new(model: &mut Model, input: TraceInput) -> Result<Self, ParseError> {
        let decoded = parser::decode_trace(input)?;

        model.metadata.extend(decoded.metadata);
        model.import_errors.extend(decoded.malformed);

        Ok(Self {
            events: decoded.events,
            all_async_events: Vec::new(),
            all_object_events: Vec::new(),
        })
    }

    /// Decoded events, in input order
    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    /// Handle an 'M' event
    ///
    /// **Private** - internal helper for import_events
    fn process_metadata_event(model: &mut Model, event: &EventRecord) {
        let value = event.args.get("name").map(value_to_key);
        match event.name.as_deref() {
            Some(THREAD_NAME_METADATA) => thread_for(model, event).name = value,
            Some(PROCESS_NAME_METADATA) => model.get_or_create_process(&event.pid).name = value,
            other => model
                .import_errors
                .push(format!("Unrecognized metadata name: {}", other.unwrap_or(""))),
        }
    }
}

impl Importer for TraceEventImporter {
    fn import_events(&mut self, model: &mut Model) {
        debug!("Importing {} trace events", self.events.len());

        for (index, event) in self.events.iter().enumerate() {
            match &event.phase {
                Phase::Begin => process_begin(model, event),
                Phase::End => process_end(model, event),
                Phase::Instant => process_instant(model, event),
                Phase::Sample => process_sample(model, event),
                Phase::Counter => process_counter_event(model, event),
                Phase::Metadata => Self::process_metadata_event(model, event),
                Phase::AsyncStart | Phase::AsyncStep | Phase::AsyncFinish => {
                    let thread = thread_for(model, event).thread_ref();
                    self.all_async_events.push(DeferredEvent { index, thread });
                }
                Phase::ObjectNew | Phase::ObjectSnapshot | Phase::ObjectDelete => {
                    let thread = thread_for(model, event).thread_ref();
                    self.all_object_events.push(DeferredEvent { index, thread });
                }
                // Flow events are not modelled yet
                Phase::Flow => {}
                Phase::Unknown(ph) => model.import_errors.push(format!(
                    "Unrecognized event phase: {}({})",
                    ph,
                    event.name_or_default()
                )),
            }
        }

        debug!(
            "Deferred {} async and {} object events",
            self.all_async_events.len(),
            self.all_object_events.len()
        );
    }

    fn finalize_import(&mut self, model: &mut Model) {
        create_async_slices(model, &self.events, mem::take(&mut self.all_async_events));
        create_objects(model, &self.events, mem::take(&mut self.all_object_events));
    }
}
