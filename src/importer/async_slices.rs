//! Async slice stitching (second pass).
//!
//! 'S', 'T' and 'F' events are buffered during the first pass because a
//! chain may start on one thread and finish on another, and writers do not
//! always emit them in order. Here the buffer is sorted by timestamp and
//! replayed, keyed by name then id:
//!
//! ```text
//! S(ts=0) ── T(ts=5, step=a) ── F(ts=10)
//! └──────────── x [0, 10) ──────────────┘
//!   └─ x [0, 5) ─┘└──── x:a [5, 10) ────┘
//! ```

use super::{sort_by_timestamp, DeferredEvent};
use crate::model::{AsyncSlice, Model};
use crate::parser::{value_to_key, EventRecord, Phase};
use crate::utils::color::string_color_id;
use log::debug;
use std::collections::HashMap;

pub const MISSING_NAME: &str = "Async events (ph: S, T or F) require a name parameter.";
pub const MISSING_ID: &str = "Async events (ph: S, T or F) require an id parameter.";

/// Open chains: name -> id -> events so far (the 'S' first)
type OpenChains<'a> = HashMap<&'a str, HashMap<&'a str, Vec<&'a DeferredEvent>>>;

/// Build async slices from the deferred 'S'/'T'/'F' events
///
/// **Public** - called from `TraceEventImporter::finalize_import`
///
/// # Arguments
/// * `model` - Model to attach finished slices to (on the start thread)
/// * `events` - The importer's full event list
/// * `deferred` - Async events in arrival order; sorted here
pub fn create_async_slices(model: &mut Model, events: &[EventRecord], mut deferred: Vec<DeferredEvent>) {
    if deferred.is_empty() {
        return;
    }

    debug!("Stitching {} async events", deferred.len());
    sort_by_timestamp(&mut deferred, events);

    let mut open: OpenChains<'_> = HashMap::new();

    for state in &deferred {
        let event = &events[state.index];

        let Some(name) = event.name.as_deref() else {
            model.import_errors.push(MISSING_NAME.to_string());
            continue;
        };
        let Some(id) = event.id.as_deref() else {
            model.import_errors.push(MISSING_ID.to_string());
            continue;
        };

        if event.phase == Phase::AsyncStart {
            let by_id = open.entry(name).or_default();
            if by_id.contains_key(id) {
                model.import_errors.push(format!(
                    "At {}, a slice of the same id {} was already open.",
                    event.timestamp_micros, id
                ));
                continue;
            }
            by_id.insert(id, vec![state]);
            continue;
        }

        let Some(by_id) = open.get_mut(name) else {
            model.import_errors.push(format!(
                "At {}, no slice named {} was open.",
                event.timestamp_micros, name
            ));
            continue;
        };
        let Some(chain) = by_id.get_mut(id) else {
            model.import_errors.push(format!(
                "At {}, no slice named {} with id={} was open.",
                event.timestamp_micros, name, id
            ));
            continue;
        };
        chain.push(state);

        if event.phase == Phase::AsyncFinish {
            if let Some(chain) = by_id.remove(id) {
                let slice = build_async_slice(events, &chain, name, id);
                model
                    .get_or_create_process(&slice.start_thread.pid)
                    .get_or_create_thread(&slice.start_thread.tid)
                    .async_slices
                    .push(slice);
            }
        }
    }

    let unfinished: usize = open.values().map(HashMap::len).sum();
    if unfinished > 0 {
        debug!("{} async slices never finished and were dropped", unfinished);
    }
}

/// Turn a complete S..F chain into a slice with one sub-slice per gap
///
/// **Private** - internal helper for create_async_slices
fn build_async_slice(
    events: &[EventRecord],
    chain: &[&DeferredEvent],
    name: &str,
    id: &str,
) -> AsyncSlice {
    let first_state = chain[0];
    let last_state = chain[chain.len() - 1];
    let first = &events[first_state.index];
    let finish = &events[last_state.index];

    let sub_slices = chain
        .windows(2)
        .enumerate()
        .map(|(offset, pair)| {
            let (from_state, to_state) = (pair[0], pair[1]);
            let from = &events[from_state.index];
            let to = &events[to_state.index];

            let sub_name = match from.args.get("step") {
                Some(step) => format!("{}:{}", name, value_to_key(step)),
                None => name.to_string(),
            };

            AsyncSlice {
                category: first.category.clone(),
                name: sub_name,
                color_id: string_color_id(&format!("{}{}", name, offset + 1)),
                start_ms: from.timestamp_ms(),
                duration_ms: to.timestamp_ms() - from.timestamp_ms(),
                start_thread: from_state.thread.clone(),
                end_thread: to_state.thread.clone(),
                id: id.to_string(),
                args: from.args.clone(),
                sub_slices: Vec::new(),
            }
        })
        .collect::<Vec<_>>();

    let mut slice = AsyncSlice {
        category: first.category.clone(),
        name: name.to_string(),
        color_id: string_color_id(name),
        start_ms: first.timestamp_ms(),
        duration_ms: finish.timestamp_ms() - first.timestamp_ms(),
        start_thread: first_state.thread.clone(),
        end_thread: last_state.thread.clone(),
        id: id.to_string(),
        args: first.args.clone(),
        sub_slices,
    };

    // The finish event's args belong to the last step; collisions are fine here
    if let Some(last) = slice.sub_slices.last_mut() {
        for (arg, value) in &finish.args {
            last.args.insert(arg.clone(), value.clone());
        }
    }

    slice
}
