//! Object lifetime replay (second pass) for 'N', 'O' and 'D' events.

use super::{sort_by_timestamp, DeferredEvent};
use crate::model::{Model, ThreadRef};
use crate::parser::{EventRecord, Phase};
use crate::utils::color::string_color_id;
use crate::utils::error::ObjectError;
use log::debug;

/// Replay deferred object events against each process's registry
///
/// **Public** - called from `TraceEventImporter::finalize_import`
///
/// Events are stable-sorted by timestamp first. A failing event is reported
/// in `model.import_errors` and replay moves on to the next one.
pub fn create_objects(model: &mut Model, events: &[EventRecord], mut deferred: Vec<DeferredEvent>) {
    if deferred.is_empty() {
        return;
    }

    debug!("Replaying {} object events", deferred.len());
    sort_by_timestamp(&mut deferred, events);

    for state in &deferred {
        if let Err(e) = process_object_event(model, &events[state.index], &state.thread) {
            model.import_errors.push(e.to_string());
        }
    }
}

/// **Private** - one step of create_objects
fn process_object_event(
    model: &mut Model,
    event: &EventRecord,
    thread: &ThreadRef,
) -> Result<(), ObjectError> {
    let name = event.name.as_deref().ok_or(ObjectError::MissingName)?;
    let id = event.id.as_deref().ok_or(ObjectError::MissingId)?;

    let objects = &mut model.get_or_create_process(&thread.pid).objects;
    let ts = event.timestamp_ms();

    let instance = match event.phase {
        Phase::ObjectNew => objects.id_was_created(id, &event.category, name, ts)?,
        Phase::ObjectSnapshot => {
            let snapshot = event
                .args
                .get("snapshot")
                .ok_or(ObjectError::MissingSnapshot)?;
            objects.add_snapshot(id, &event.category, name, ts, snapshot.clone())?
        }
        Phase::ObjectDelete => objects.id_was_deleted(id, &event.category, name, ts)?,
        _ => return Ok(()),
    };

    instance.color_id = string_color_id(instance.type_name());
    Ok(())
}
