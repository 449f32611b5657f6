//! The timeline model that importers write into.
//!
//! A [`Model`] owns processes; processes own threads, counters and an
//! object registry. Nothing points back up the tree: async slices name their
//! threads with a [`ThreadRef`] instead of holding a reference.

pub mod async_slice;
pub mod counter;
pub mod object;
pub mod process;
pub mod thread;

pub use async_slice::AsyncSlice;
pub use counter::Counter;
pub use object::{ObjectInstance, ObjectRegistry, ObjectSnapshot};
pub use process::Process;
pub use thread::{Sample, Slice, Thread, ThreadRef};

use crate::importer::find_importer;
use crate::parser::TraceInput;
use crate::utils::config::ImportOptions;
use crate::utils::error::ImportError;
use log::{debug, info};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// A `{name, value}` pair lifted from a trace container
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    pub name: String,
    pub value: Value,
}

/// Time range covered by a model, in milliseconds
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    extent: Option<(f64, f64)>,
}

impl Bounds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_value(&mut self, value: f64) {
        self.extent = Some(match self.extent {
            None => (value, value),
            Some((min, max)) => (min.min(value), max.max(value)),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.extent.is_none()
    }

    pub fn min(&self) -> Option<f64> {
        self.extent.map(|(min, _)| min)
    }

    pub fn max(&self) -> Option<f64> {
        self.extent.map(|(_, max)| max)
    }

    /// `max - min`, zero when empty
    pub fn range(&self) -> f64 {
        self.extent.map_or(0.0, |(min, max)| max - min)
    }
}

/// Root of the imported timeline
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    pub processes: BTreeMap<String, Process>,

    /// Recoverable problems found while importing, in the order found
    pub import_errors: Vec<String>,

    /// Container fields that were not events, in document order
    pub metadata: Vec<Metadata>,

    pub bounds: Bounds,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create_process(&mut self, pid: &str) -> &mut Process {
        self.processes
            .entry(pid.to_string())
            .or_insert_with(|| Process::new(pid))
    }

    pub fn process(&self, pid: &str) -> Option<&Process> {
        self.processes.get(pid)
    }

    /// Shortcut for `process(pid)?.thread(tid)`
    pub fn thread(&self, pid: &str, tid: &str) -> Option<&Thread> {
        self.process(pid)?.thread(tid)
    }

    /// Resolve a [`ThreadRef`] held by an async slice
    pub fn resolve_thread(&self, thread: &ThreadRef) -> Option<&Thread> {
        self.thread(&thread.pid, &thread.tid)
    }

    pub fn has_import_errors(&self) -> bool {
        !self.import_errors.is_empty()
    }

    /// Recompute `bounds` from everything currently in the model
    pub fn update_bounds(&mut self) {
        let mut bounds = Bounds::new();
        for process in self.processes.values() {
            process.extend_bounds(&mut bounds);
        }
        self.bounds = bounds;
    }

    /// Close slices left open at the end of the trace at the max bound
    pub fn auto_close_open_slices(&mut self) {
        let Some(end) = self.bounds.max() else {
            return;
        };
        for thread in self
            .processes
            .values_mut()
            .flat_map(|process| process.threads.values_mut())
        {
            if thread.open_slice_count() > 0 {
                debug!(
                    "Auto-closing {} open slices on {}:{}",
                    thread.open_slice_count(),
                    thread.pid,
                    thread.tid
                );
                thread.auto_close_open_slices(end);
            }
        }
    }

    /// Shift all timestamps so the model starts at zero
    pub fn shift_world_to_zero(&mut self) {
        let Some(min) = self.bounds.min() else {
            return;
        };
        for process in self.processes.values_mut() {
            process.shift_timestamps(min);
        }
        self.update_bounds();
    }

    /// Import one or more traces
    ///
    /// **Public** - main entry point for batch import
    ///
    /// Every input is decoded up front, then all first passes run, then all
    /// second passes, so deferred events see threads created by any input.
    ///
    /// # Errors
    /// * `ImportError::NoImporter` - an input is not in a format we handle
    /// * `ImportError::Parse` - an input could not be decoded; importers
    ///   constructed before it may already have written metadata
    pub fn import_traces(
        &mut self,
        inputs: impl IntoIterator<Item = TraceInput>,
        options: ImportOptions,
    ) -> Result<(), ImportError> {
        let mut importers = Vec::new();
        for input in inputs {
            let importer = find_importer(self, input)?;
            importers.push(importer);
        }

        info!("Importing {} trace(s)", importers.len());

        for importer in &mut importers {
            importer.import_events(self);
        }
        for importer in &mut importers {
            importer.finalize_import(self);
        }

        self.update_bounds();
        if options.auto_close_open_slices {
            self.auto_close_open_slices();
            self.update_bounds();
        }
        if options.shift_world_to_zero {
            self.shift_world_to_zero();
        }

        if self.has_import_errors() {
            info!(
                "Import finished with {} recoverable error(s)",
                self.import_errors.len()
            );
        }

        Ok(())
    }

    /// Import a single trace with default options
    pub fn import_trace(&mut self, input: impl Into<TraceInput>) -> Result<(), ImportError> {
        let input: TraceInput = input.into();
        self.import_traces([input], ImportOptions::default())
    }
}
