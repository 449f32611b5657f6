//! Counter sample accumulation for 'C' events.

use crate::model::Model;
use crate::parser::EventRecord;
use crate::utils::color::string_color_id;
use log::warn;
use serde_json::Value;

/// Lookup name of a counter: `name`, or `name[id]` for keyed counters
pub fn counter_name(event: &EventRecord) -> String {
    let name = event.name_or_default();
    match &event.id {
        Some(id) => format!("{}[{}]", name, id),
        None => name.to_string(),
    }
}

/// Handle a 'C' event
///
/// **Public** - called by the first pass for each counter event
///
/// The first event for a counter fixes its series, one per argument key in
/// document order. Later events append one value per established series,
/// zero when the event lacks that key, and ignore keys that are not series.
pub fn process_counter_event(model: &mut Model, event: &EventRecord) {
    let name = counter_name(event);
    let process = model.get_or_create_process(&event.pid);
    let counter = process.get_or_create_counter(&event.category, &name);

    if counter.num_series() == 0 {
        for series_name in event.args.keys() {
            let color_id = string_color_id(&format!("{}.{}", counter.name, series_name));
            counter.add_series(series_name.clone(), color_id);
        }

        if counter.num_series() == 0 {
            process.remove_counter(&event.category, &name);
            model.import_errors.push(format!(
                "Expected counter {} to have at least one argument to use as a value.",
                event.name_or_default()
            ));
            return;
        }
    }

    let values: Vec<f64> = counter
        .series_names
        .iter()
        .map(|series_name| sample_value(&name, series_name, event.args.get(series_name)))
        .collect();
    counter.append_sample(event.timestamp_ms(), values);
}

/// Read one counter value; absent series read as zero
///
/// **Private** - internal helper for process_counter_event
fn sample_value(counter: &str, series: &str, value: Option<&Value>) -> f64 {
    match value {
        None | Some(Value::Null) => 0.0,
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        Some(Value::String(s)) => s.trim().parse().unwrap_or_else(|_| {
            warn!("Counter {} series {} has non-numeric value '{}'", counter, series, s);
            0.0
        }),
        Some(other) => {
            warn!("Counter {} series {} has non-numeric value {}", counter, series, other);
            0.0
        }
    }
}
