use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use trace_event_importer::model::ObjectRegistry;
use trace_event_importer::utils::color::string_color_id;
use trace_event_importer::utils::error::ObjectError;
use trace_event_importer::Model;

fn import(events: Value) -> Model {
    let mut model = Model::new();
    model.import_trace(events).unwrap();
    model
}

#[test]
fn test_full_lifetime() {
    let model = import(json!([
        {"ph": "N", "name": "Layer", "cat": "cc", "id": "0x1", "pid": 1, "tid": 1, "ts": 1000},
        {"ph": "O", "name": "Layer", "cat": "cc", "id": "0x1", "pid": 1, "tid": 1, "ts": 2000,
         "args": {"snapshot": {"w": 10}}},
        {"ph": "D", "name": "Layer", "cat": "cc", "id": "0x1", "pid": 1, "tid": 1, "ts": 3000}
    ]));

    assert!(model.import_errors.is_empty());

    let objects = &model.process("1").unwrap().objects;
    let instances = objects.instances_for("0x1");
    assert_eq!(instances.len(), 1);

    let instance = &instances[0];
    assert_eq!(instance.name, "Layer");
    assert_eq!(instance.category, "cc");
    assert_eq!(instance.creation_ts, 1.0);
    assert!(instance.creation_ts_was_explicit);
    assert_eq!(instance.deletion_ts, Some(3.0));
    assert_eq!(instance.color_id, string_color_id("Layer"));
    assert_eq!(instance.snapshots.len(), 1);
    assert_eq!(instance.snapshots[0].timestamp_ms, 2.0);
    assert_eq!(instance.snapshots[0].args, json!({"w": 10}));

    assert_eq!(model.bounds.min(), Some(1.0));
    assert_eq!(model.bounds.max(), Some(3.0));
}

#[test]
fn test_replay_is_in_timestamp_order() {
    let model = import(json!([
        {"ph": "D", "name": "T", "id": 1, "pid": 1, "tid": 1, "ts": 3000},
        {"ph": "O", "name": "T", "id": 1, "pid": 1, "tid": 1, "ts": 2000, "args": {"snapshot": 1}},
        {"ph": "N", "name": "T", "id": 1, "pid": 1, "tid": 1, "ts": 1000}
    ]));

    assert!(model.import_errors.is_empty());
    let instances = model.process("1").unwrap().objects.instances_for("1");
    assert_eq!(instances.len(), 1);
    assert!(instances[0].creation_ts_was_explicit);
}

#[test]
fn test_snapshot_without_payload_is_reported() {
    let model = import(json!([
        {"ph": "N", "name": "T", "id": 1, "pid": 1, "tid": 1, "ts": 0},
        {"ph": "O", "name": "T", "id": 1, "pid": 1, "tid": 1, "ts": 1000, "args": {"other": 1}},
        {"ph": "D", "name": "T", "id": 1, "pid": 1, "tid": 1, "ts": 2000}
    ]));

    assert_eq!(
        model.import_errors,
        vec![ObjectError::MissingSnapshot.to_string()]
    );
    let instance = &model.process("1").unwrap().objects.instances_for("1")[0];
    assert!(instance.snapshots.is_empty());
    assert!(instance.is_deleted());
}

#[test]
fn test_missing_name_and_id() {
    let model = import(json!([
        {"ph": "N", "id": 1, "pid": 1, "tid": 1, "ts": 0},
        {"ph": "N", "name": "T", "pid": 1, "tid": 1, "ts": 0}
    ]));

    assert_eq!(
        model.import_errors,
        vec![
            ObjectError::MissingName.to_string(),
            ObjectError::MissingId.to_string(),
        ]
    );
    assert!(model.process("1").unwrap().objects.is_empty());
}

#[test]
fn test_id_reuse_after_delete_starts_new_instance() {
    let model = import(json!([
        {"ph": "N", "name": "T", "id": 1, "pid": 1, "tid": 1, "ts": 0},
        {"ph": "D", "name": "T", "id": 1, "pid": 1, "tid": 1, "ts": 1000},
        {"ph": "N", "name": "T", "id": 1, "pid": 1, "tid": 1, "ts": 2000}
    ]));

    assert!(model.import_errors.is_empty());
    let instances = model.process("1").unwrap().objects.instances_for("1");
    assert_eq!(instances.len(), 2);
    assert!(instances[0].is_deleted());
    assert!(!instances[1].is_deleted());
}

#[test]
fn test_snapshot_implies_instance() {
    let mut registry = ObjectRegistry::new();
    let instance = registry
        .add_snapshot("7", "cat", "T", 5.0, json!({"a": 1}))
        .unwrap();

    assert!(!instance.creation_ts_was_explicit);
    assert_eq!(instance.creation_ts, 5.0);
    assert_eq!(registry.instance_count(), 1);
}

#[test]
fn test_registry_errors() {
    let mut registry = ObjectRegistry::new();
    registry.id_was_created("1", "cat", "T", 1.0).unwrap();

    assert_eq!(
        registry.id_was_created("1", "cat", "T", 2.0).unwrap_err(),
        ObjectError::AlreadyAlive {
            id: "1".to_string(),
            ts: 2.0,
        }
    );

    assert!(matches!(
        registry.add_snapshot("1", "other", "T", 2.0, json!(null)),
        Err(ObjectError::CategoryMismatch { .. })
    ));

    assert!(matches!(
        registry.id_was_deleted("1", "cat", "U", 3.0),
        Err(ObjectError::NameMismatch { .. })
    ));

    assert_eq!(
        registry.id_was_deleted("1", "cat", "T", 0.5).unwrap_err(),
        ObjectError::DeletedBeforeCreated {
            id: "1".to_string(),
            ts: 0.5,
        }
    );

    registry.id_was_deleted("1", "cat", "T", 3.0).unwrap();
    assert_eq!(
        registry.id_was_deleted("1", "cat", "T", 4.0).unwrap_err(),
        ObjectError::AlreadyDeleted {
            id: "1".to_string(),
            ts: 4.0,
        }
    );
}
