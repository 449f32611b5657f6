//! Importers that turn decoded trace events into model structure.
//!
//! This module handles:
//! - The [`Importer`] seam the model drives (first pass, then finalize)
//! - Synchronous begin/end slice reduction
//! - Counter sample accumulation
//! - Async slice stitching and object lifetime replay (second pass)

pub mod async_slices;
pub mod counters;
pub mod objects;
pub mod slices;
pub mod trace_event;

pub use trace_event::TraceEventImporter;

use crate::model::{Model, Thread, ThreadRef};
use crate::parser::{EventRecord, TraceInput};
use crate::utils::error::ImportError;

/// A two-phase importer driven by [`Model::import_traces`]
pub trait Importer {
    /// Forward scan over the input; may defer events for finalization
    fn import_events(&mut self, model: &mut Model);

    /// Replay deferred events once every importer has run its first pass
    fn finalize_import(&mut self, model: &mut Model);
}

/// An event set aside during the first pass, with the thread it resolved to
#[derive(Debug, Clone)]
pub struct DeferredEvent {
    /// Index into the importer's event list
    pub index: usize,
    pub thread: ThreadRef,
}

/// Pick and construct an importer for `input`
///
/// **Public** - used by the model's import driver
///
/// # Errors
/// * `ImportError::NoImporter` - no importer recognizes the input
/// * `ImportError::Parse` - the chosen importer could not decode it
pub fn find_importer(
    model: &mut Model,
    input: TraceInput,
) -> Result<Box<dyn Importer>, ImportError> {
    if TraceEventImporter::can_import(&input) {
        return Ok(Box::new(TraceEventImporter::new(model, input)?));
    }
    Err(ImportError::NoImporter)
}

/// Thread an event belongs to, creating process and thread on first sight
pub(crate) fn thread_for<'m>(model: &'m mut Model, event: &EventRecord) -> &'m mut Thread {
    model
        .get_or_create_process(&event.pid)
        .get_or_create_thread(&event.tid)
}

/// Stable sort of deferred events by their event's timestamp
pub(crate) fn sort_by_timestamp(deferred: &mut [DeferredEvent], events: &[EventRecord]) {
    deferred.sort_by(|a, b| {
        events[a.index]
            .timestamp_micros
            .total_cmp(&events[b.index].timestamp_micros)
    });
}
