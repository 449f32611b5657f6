use serde_json::{json, Value};
use trace_event_importer::importer::slices::{END_WITHOUT_BEGIN, TIMESTAMPS_BACKWARD};
use trace_event_importer::{ImportOptions, Model, TraceInput};

fn import(events: Value) -> Model {
    let mut model = Model::new();
    model.import_trace(events).unwrap();
    model
}

fn import_without_auto_close(events: Value) -> Model {
    let mut model = Model::new();
    model
        .import_traces(
            [TraceInput::from(events)],
            ImportOptions::new().with_auto_close_open_slices(false),
        )
        .unwrap();
    model
}

#[test]
fn test_nested_slices_close_lifo() {
    let model = import(json!([
        {"ph": "B", "name": "outer", "cat": "c", "pid": 1, "tid": 1, "ts": 0},
        {"ph": "B", "name": "inner", "cat": "c", "pid": 1, "tid": 1, "ts": 1000},
        {"ph": "E", "pid": 1, "tid": 1, "ts": 3000},
        {"ph": "E", "pid": 1, "tid": 1, "ts": 7500}
    ]));

    assert!(model.import_errors.is_empty());

    let thread = model.thread("1", "1").unwrap();
    assert_eq!(thread.slices.len(), 2);

    assert_eq!(thread.slices[0].name, "inner");
    assert_eq!(thread.slices[0].start_ms, 1.0);
    assert_eq!(thread.slices[0].duration_ms, 2.0);

    assert_eq!(thread.slices[1].name, "outer");
    assert_eq!(thread.slices[1].category, "c");
    assert_eq!(thread.slices[1].duration_ms, 7.5);
    assert!(!thread.slices[1].did_not_finish);
}

#[test]
fn test_end_without_begin() {
    let model = import(json!([
        {"ph": "E", "name": "a", "pid": 1, "tid": 1, "ts": 10}
    ]));

    assert_eq!(model.import_errors, vec![END_WITHOUT_BEGIN.to_string()]);
    assert!(model.thread("1", "1").unwrap().slices.is_empty());
}

#[test]
fn test_backward_timestamp_is_skipped() {
    let model = import_without_auto_close(json!([
        {"ph": "B", "name": "a", "pid": 1, "tid": 1, "ts": 100},
        {"ph": "B", "name": "b", "pid": 1, "tid": 1, "ts": 50},
        {"ph": "E", "pid": 1, "tid": 1, "ts": 200}
    ]));

    assert_eq!(model.import_errors, vec![TIMESTAMPS_BACKWARD.to_string()]);

    let thread = model.thread("1", "1").unwrap();
    assert_eq!(thread.slices.len(), 1);
    assert_eq!(thread.slices[0].name, "a");
    assert_eq!(thread.open_slice_count(), 0);
}

#[test]
fn test_threads_are_ordered_independently() {
    let model = import(json!([
        {"ph": "B", "name": "a", "pid": 1, "tid": 1, "ts": 100},
        {"ph": "B", "name": "b", "pid": 1, "tid": 2, "ts": 50},
        {"ph": "E", "pid": 1, "tid": 2, "ts": 60},
        {"ph": "E", "pid": 1, "tid": 1, "ts": 110}
    ]));

    assert!(model.import_errors.is_empty());
    assert_eq!(model.thread("1", "1").unwrap().slices.len(), 1);
    assert_eq!(model.thread("1", "2").unwrap().slices.len(), 1);
}

#[test]
fn test_end_args_merge_and_collide() {
    let model = import(json!([
        {"ph": "B", "name": "work", "pid": 1, "tid": 1, "ts": 0, "args": {"a": 1, "b": 2}},
        {"ph": "E", "pid": 1, "tid": 1, "ts": 10, "args": {"b": 3, "c": 4}}
    ]));

    assert_eq!(model.import_errors.len(), 1);
    assert!(model.import_errors[0].contains("work"));
    assert!(model.import_errors[0].contains("argument b"));

    let slice = &model.thread("1", "1").unwrap().slices[0];
    assert_eq!(slice.args.get("a"), Some(&json!(1)));
    assert_eq!(slice.args.get("b"), Some(&json!(3)));
    assert_eq!(slice.args.get("c"), Some(&json!(4)));
}

#[test]
fn test_instants_are_zero_duration() {
    let model = import(json!([
        {"ph": "I", "name": "upper", "pid": 1, "tid": 1, "ts": 5000},
        {"ph": "i", "name": "lower", "pid": 1, "tid": 1, "ts": 1000}
    ]));

    assert!(model.import_errors.is_empty());

    let thread = model.thread("1", "1").unwrap();
    assert_eq!(thread.slices.len(), 2);
    assert!(thread.slices.iter().all(|s| s.duration_ms == 0.0));
}

#[test]
fn test_samples_do_not_touch_the_stack() {
    let model = import_without_auto_close(json!([
        {"ph": "B", "name": "a", "pid": 1, "tid": 1, "ts": 0},
        {"ph": "P", "name": "tick", "cat": "prof", "pid": 1, "tid": 1, "ts": 500}
    ]));

    let thread = model.thread("1", "1").unwrap();
    assert_eq!(thread.samples.len(), 1);
    assert_eq!(thread.samples[0].name, "tick");
    assert_eq!(thread.samples[0].timestamp_ms, 0.5);
    assert_eq!(thread.open_slice_count(), 1);
}

#[test]
fn test_open_slices_are_auto_closed_at_max_bound() {
    let model = import(json!([
        {"ph": "B", "name": "never-ends", "pid": 1, "tid": 1, "ts": 1000},
        {"ph": "I", "name": "late", "pid": 1, "tid": 2, "ts": 9000}
    ]));

    let thread = model.thread("1", "1").unwrap();
    assert_eq!(thread.open_slice_count(), 0);
    assert_eq!(thread.slices.len(), 1);
    assert!(thread.slices[0].did_not_finish);
    assert_eq!(thread.slices[0].duration_ms, 8.0);
}

#[test]
fn test_lone_unterminated_begin_is_auto_closed() {
    let model = import(json!([
        {"ph": "B", "name": "only", "pid": 1, "tid": 1, "ts": 1000}
    ]));

    assert!(!model.bounds.is_empty());
    let thread = model.thread("1", "1").unwrap();
    assert_eq!(thread.open_slice_count(), 0);
    assert_eq!(thread.slices.len(), 1);
    assert!(thread.slices[0].did_not_finish);
    assert_eq!(thread.slices[0].start_ms, 1.0);
    assert_eq!(thread.slices[0].duration_ms, 0.0);
}

#[test]
fn test_late_unterminated_begin_extends_bounds() {
    let model = import(json!([
        {"ph": "I", "name": "early", "pid": 1, "tid": 2, "ts": 1000},
        {"ph": "B", "name": "outer", "pid": 1, "tid": 1, "ts": 5000},
        {"ph": "B", "name": "inner", "pid": 1, "tid": 1, "ts": 7000}
    ]));

    assert_eq!(model.bounds.max(), Some(7.0));

    let thread = model.thread("1", "1").unwrap();
    assert_eq!(thread.open_slice_count(), 0);
    let names: Vec<&str> = thread.slices.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["inner", "outer"]);
    assert_eq!(thread.slices[0].duration_ms, 0.0);
    assert_eq!(thread.slices[1].start_ms, 5.0);
    assert_eq!(thread.slices[1].duration_ms, 2.0);
    assert!(thread.slices.iter().all(|s| s.did_not_finish));
}

#[test]
fn test_instant_before_open_slice_is_rejected() {
    let model = import_without_auto_close(json!([
        {"ph": "B", "name": "a", "pid": 1, "tid": 1, "ts": 5000},
        {"ph": "I", "name": "stale", "pid": 1, "tid": 1, "ts": 1000},
        {"ph": "I", "name": "fresh", "pid": 1, "tid": 1, "ts": 6000},
        {"ph": "E", "pid": 1, "tid": 1, "ts": 6000}
    ]));

    assert_eq!(model.import_errors, vec![TIMESTAMPS_BACKWARD.to_string()]);

    let thread = model.thread("1", "1").unwrap();
    let names: Vec<&str> = thread.slices.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["fresh", "a"]);
}

#[test]
fn test_metadata_names_threads_and_processes() {
    let model = import(json!([
        {"ph": "M", "name": "thread_name", "pid": 1, "tid": 7, "args": {"name": "Renderer"}},
        {"ph": "M", "name": "process_name", "pid": 1, "tid": 7, "args": {"name": "Browser"}},
        {"ph": "M", "name": "thread_sort_index", "pid": 1, "tid": 7, "args": {"sort_index": 1}}
    ]));

    assert_eq!(model.process("1").unwrap().name.as_deref(), Some("Browser"));
    assert_eq!(model.thread("1", "7").unwrap().name.as_deref(), Some("Renderer"));
    assert_eq!(
        model.import_errors,
        vec!["Unrecognized metadata name: thread_sort_index".to_string()]
    );
}

#[test]
fn test_unknown_phase_and_flow_events() {
    let model = import(json!([
        {"ph": "X", "name": "complete", "pid": 1, "tid": 1, "ts": 0},
        {"ph": "s", "name": "flow", "pid": 1, "tid": 1, "ts": 0, "id": 1},
        {"ph": "f", "name": "flow", "pid": 1, "tid": 1, "ts": 5, "id": 1}
    ]));

    assert_eq!(
        model.import_errors,
        vec!["Unrecognized event phase: X(complete)".to_string()]
    );
}

#[test]
fn test_shift_world_to_zero() {
    let mut model = Model::new();
    model
        .import_traces(
            [TraceInput::from(json!([
                {"ph": "B", "name": "a", "pid": 1, "tid": 1, "ts": 4000},
                {"ph": "E", "pid": 1, "tid": 1, "ts": 6000}
            ]))],
            ImportOptions::new().with_shift_world_to_zero(true),
        )
        .unwrap();

    let slice = &model.thread("1", "1").unwrap().slices[0];
    assert_eq!(slice.start_ms, 0.0);
    assert_eq!(slice.duration_ms, 2.0);
    assert_eq!(model.bounds.min(), Some(0.0));
    assert_eq!(model.bounds.max(), Some(2.0));
}
