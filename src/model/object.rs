//! Object instance and snapshot tracking.
//!
//! An id can be reused: once an instance is deleted a later 'N' (or a
//! snapshot after the deletion) starts a fresh instance under the same id.
//! Mutations must arrive in ascending timestamp order; the object tracker
//! sorts before replaying so that holds.

use super::Bounds;
use crate::utils::error::ObjectError;
use serde_json::Value;
use std::collections::BTreeMap;

/// Periodic state capture of an object
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSnapshot {
    pub timestamp_ms: f64,
    pub args: Value,
}

/// One lifetime of an application-defined object
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectInstance {
    pub id: String,
    pub category: String,

    /// Type name of the object (the event `name`)
    pub name: String,
    pub color_id: usize,

    pub creation_ts: f64,
    /// False when the instance was implied by a snapshot or deletion
    pub creation_ts_was_explicit: bool,

    /// `None` while the instance is alive
    pub deletion_ts: Option<f64>,

    pub snapshots: Vec<ObjectSnapshot>,
}

impl ObjectInstance {
    fn new(id: &str, category: &str, name: &str, ts: f64, explicit: bool) -> Self {
        Self {
            id: id.to_string(),
            category: category.to_string(),
            name: name.to_string(),
            color_id: 0,
            creation_ts: ts,
            creation_ts_was_explicit: explicit,
            deletion_ts: None,
            snapshots: Vec::new(),
        }
    }

    /// Type name used for color assignment
    pub fn type_name(&self) -> &str {
        &self.name
    }

    pub fn is_deleted(&self) -> bool {
        self.deletion_ts.is_some()
    }

    /// Whether `ts` falls before this instance's deletion (or it is alive)
    fn is_alive_at(&self, ts: f64) -> bool {
        self.deletion_ts.map_or(true, |deleted| ts < deleted)
    }

    fn check_identity(
        &self,
        category: &str,
        name: &str,
        action: &'static str,
    ) -> Result<(), ObjectError> {
        if self.category != category {
            return Err(ObjectError::CategoryMismatch {
                id: self.id.clone(),
                action,
                expected: self.category.clone(),
                found: category.to_string(),
            });
        }
        if self.name != name {
            return Err(ObjectError::NameMismatch {
                id: self.id.clone(),
                action,
                expected: self.name.clone(),
                found: name.to_string(),
            });
        }
        Ok(())
    }
}

/// Per-process registry of object instances keyed by id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectRegistry {
    instances_by_id: BTreeMap<String, Vec<ObjectInstance>>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register creation of an object at `ts`
    ///
    /// **Public** - 'N' replay
    ///
    /// # Errors
    /// * `ObjectError::AlreadyAlive` - the previous instance with this id
    ///   is still alive at `ts`
    pub fn id_was_created(
        &mut self,
        id: &str,
        category: &str,
        name: &str,
        ts: f64,
    ) -> Result<&mut ObjectInstance, ObjectError> {
        let instances = self.instances_by_id.entry(id.to_string()).or_default();

        if instances.last().map_or(false, |last| last.is_alive_at(ts)) {
            return Err(ObjectError::AlreadyAlive {
                id: id.to_string(),
                ts,
            });
        }

        let index = instances.len();
        instances.push(ObjectInstance::new(id, category, name, ts, true));
        Ok(&mut instances[index])
    }

    /// Attach a snapshot to the live instance, implying one if needed
    ///
    /// **Public** - 'O' replay
    ///
    /// # Errors
    /// * `ObjectError::CategoryMismatch` / `NameMismatch` - the live instance
    ///   was created under a different category or type name
    pub fn add_snapshot(
        &mut self,
        id: &str,
        category: &str,
        name: &str,
        ts: f64,
        args: Value,
    ) -> Result<&mut ObjectInstance, ObjectError> {
        let instances = self.instances_by_id.entry(id.to_string()).or_default();

        let needs_instance = match instances.last() {
            None => true,
            Some(last) => last.deletion_ts.map_or(false, |deleted| ts > deleted),
        };
        if needs_instance {
            instances.push(ObjectInstance::new(id, category, name, ts, false));
        }

        let last = instances.len() - 1;
        let instance = &mut instances[last];
        instance.check_identity(category, name, "snapshotted")?;
        instance.snapshots.push(ObjectSnapshot {
            timestamp_ms: ts,
            args,
        });
        Ok(instance)
    }

    /// Mark the live instance deleted at `ts`
    ///
    /// **Public** - 'D' replay
    ///
    /// # Errors
    /// * `ObjectError::AlreadyDeleted` - the latest instance is already deleted
    /// * `ObjectError::DeletedBeforeCreated` - `ts` precedes its creation
    /// * `ObjectError::CategoryMismatch` / `NameMismatch`
    pub fn id_was_deleted(
        &mut self,
        id: &str,
        category: &str,
        name: &str,
        ts: f64,
    ) -> Result<&mut ObjectInstance, ObjectError> {
        let instances = self.instances_by_id.entry(id.to_string()).or_default();
        if instances.is_empty() {
            instances.push(ObjectInstance::new(id, category, name, ts, false));
        }

        let last = instances.len() - 1;
        let instance = &mut instances[last];
        if instance.is_deleted() {
            return Err(ObjectError::AlreadyDeleted {
                id: id.to_string(),
                ts,
            });
        }
        if ts < instance.creation_ts {
            return Err(ObjectError::DeletedBeforeCreated {
                id: id.to_string(),
                ts,
            });
        }
        instance.check_identity(category, name, "deleted")?;
        instance.deletion_ts = Some(ts);
        Ok(instance)
    }

    /// Every lifetime recorded under `id`, oldest first
    pub fn instances_for(&self, id: &str) -> &[ObjectInstance] {
        self.instances_by_id
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn all_instances(&self) -> impl Iterator<Item = &ObjectInstance> {
        self.instances_by_id.values().flatten()
    }

    pub fn instance_count(&self) -> usize {
        self.instances_by_id.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.instance_count() == 0
    }

    pub fn shift_timestamps(&mut self, amount: f64) {
        for instance in self.instances_by_id.values_mut().flatten() {
            instance.creation_ts -= amount;
            if let Some(deleted) = instance.deletion_ts.as_mut() {
                *deleted -= amount;
            }
            for snapshot in &mut instance.snapshots {
                snapshot.timestamp_ms -= amount;
            }
        }
    }

    pub(crate) fn extend_bounds(&self, bounds: &mut Bounds) {
        for instance in self.all_instances() {
            bounds.add_value(instance.creation_ts);
            if let Some(deleted) = instance.deletion_ts {
                bounds.add_value(deleted);
            }
            for snapshot in &instance.snapshots {
                bounds.add_value(snapshot.timestamp_ms);
            }
        }
    }
}
