use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::NamedTempFile;
use trace_event_importer::output::{read_summary, summary_to_string, write_summary, ModelSummary};
use trace_event_importer::utils::config::SCHEMA_VERSION;
use trace_event_importer::Model;

fn sample_model() -> Model {
    let mut model = Model::new();
    model
        .import_trace(json!({
            "traceEvents": [
                {"ph": "M", "name": "thread_name", "pid": 1, "tid": 1, "args": {"name": "main"}},
                {"ph": "B", "name": "a", "pid": 1, "tid": 1, "ts": 1000},
                {"ph": "E", "pid": 1, "tid": 1, "ts": 4000},
                {"ph": "S", "name": "x", "id": 1, "pid": 1, "tid": 1, "ts": 1000},
                {"ph": "F", "name": "x", "id": 1, "pid": 1, "tid": 1, "ts": 2000},
                {"ph": "C", "name": "mem", "pid": 1, "ts": 1000, "args": {"used": 1}},
                {"ph": "N", "name": "T", "id": 1, "pid": 1, "tid": 1, "ts": 1000},
                {"ph": "E", "pid": 2, "tid": 1, "ts": 1000}
            ],
            "displayTimeUnit": "ms"
        }))
        .unwrap();
    model
}

#[test]
fn test_summary_counts() {
    let summary = ModelSummary::from_model(&sample_model());

    assert_eq!(summary.version, SCHEMA_VERSION);
    assert_eq!(summary.processes.len(), 2);
    assert_eq!(summary.total_threads(), 2);
    assert_eq!(summary.total_slices(), 2);
    assert_eq!(summary.total_counters(), 1);
    assert_eq!(summary.min_ms, Some(1.0));
    assert_eq!(summary.max_ms, Some(4.0));
    assert_eq!(summary.import_errors.len(), 1);
    assert_eq!(summary.metadata[0].name, "displayTimeUnit");

    let process = &summary.processes[0];
    assert_eq!(process.object_instances, 1);
    assert_eq!(process.threads[0].name.as_deref(), Some("main"));
    assert_eq!(process.counters[0].series, vec!["used"]);
}

#[test]
fn test_write_and_read_summary() {
    let summary = ModelSummary::from_model(&sample_model());
    let temp_file = NamedTempFile::new().unwrap();

    write_summary(&summary, temp_file.path()).unwrap();
    let loaded = read_summary(temp_file.path()).unwrap();

    assert_eq!(loaded, summary);
}

#[test]
fn test_write_creates_parent_dirs() {
    let temp_dir = tempfile::tempdir().unwrap();
    let nested_path = temp_dir.path().join("nested/dirs/summary.json");

    write_summary(&ModelSummary::from_model(&Model::new()), &nested_path).unwrap();

    assert!(nested_path.exists());
}

#[test]
fn test_summary_to_string_is_json() {
    let text = summary_to_string(&ModelSummary::from_model(&sample_model())).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(value["version"], json!(SCHEMA_VERSION));
    assert_eq!(value["processes"][0]["pid"], json!("1"));
}
