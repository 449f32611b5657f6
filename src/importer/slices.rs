//! Synchronous slice reduction.
//!
//! Per thread: 'B' pushes, 'E' pops, instants push and pop in one go. Every
//! anomaly becomes one entry in `Model::import_errors` and the event is
//! otherwise ignored.

use super::thread_for;
use crate::model::Model;
use crate::parser::EventRecord;
use crate::utils::color::string_color_id;

pub const TIMESTAMPS_BACKWARD: &str = "Timestamps are moving backward.";
pub const END_WITHOUT_BEGIN: &str = "E phase event without a matching B phase event.";

/// Handle a 'B' event
pub fn process_begin(model: &mut Model, event: &EventRecord) {
    let ts = event.timestamp_ms();
    let thread = thread_for(model, event);

    if !thread.is_timestamp_valid_for_begin_or_end(ts) {
        model.import_errors.push(TIMESTAMPS_BACKWARD.to_string());
        return;
    }

    let name = event.name_or_default();
    thread.begin_slice(
        &event.category,
        name,
        string_color_id(name),
        ts,
        event.args.clone(),
    );
}

/// Handle an 'E' event
///
/// End-time args are merged into the closed slice; a key the 'B' event
/// already set is reported and overwritten.
pub fn process_end(model: &mut Model, event: &EventRecord) {
    let ts = event.timestamp_ms();
    let thread = thread_for(model, event);

    if !thread.is_timestamp_valid_for_begin_or_end(ts) {
        model.import_errors.push(TIMESTAMPS_BACKWARD.to_string());
        return;
    }

    let Some(slice) = thread.end_slice(ts) else {
        model.import_errors.push(END_WITHOUT_BEGIN.to_string());
        return;
    };

    let mut collisions = Vec::new();
    for (arg, value) in &event.args {
        if slice.args.contains_key(arg) {
            collisions.push(format!(
                "Both the B and E phases of {} provided values for argument {}. \
                 The value of the E phase event will be used.",
                slice.name, arg
            ));
        }
        slice.args.insert(arg.clone(), value.clone());
    }
    model.import_errors.extend(collisions);
}

/// Handle an 'I' / 'i' event as a zero-duration slice
///
/// Checked once against the begin/end watermark, which it does not move.
pub fn process_instant(model: &mut Model, event: &EventRecord) {
    let ts = event.timestamp_ms();
    let thread = thread_for(model, event);

    if !thread.is_timestamp_valid_for_begin_or_end(ts) {
        model.import_errors.push(TIMESTAMPS_BACKWARD.to_string());
        return;
    }

    let name = event.name_or_default();
    thread.add_instant(
        &event.category,
        name,
        string_color_id(name),
        ts,
        event.args.clone(),
    );
}

/// Handle a 'P' event; the slice stack is untouched
pub fn process_sample(model: &mut Model, event: &EventRecord) {
    thread_for(model, event).add_sample(
        &event.category,
        event.name_or_default(),
        event.timestamp_ms(),
        event.args.clone(),
    );
}
