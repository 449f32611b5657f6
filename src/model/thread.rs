//! Threads and their synchronous slices.

use super::async_slice::AsyncSlice;
use super::Bounds;
use serde_json::{Map, Value};

/// Non-owning reference to a thread: the (pid, tid) pair it is filed under
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ThreadRef {
    pub pid: String,
    pub tid: String,
}

impl ThreadRef {
    pub fn new(pid: impl Into<String>, tid: impl Into<String>) -> Self {
        Self {
            pid: pid.into(),
            tid: tid.into(),
        }
    }
}

/// A named, timed interval of work on one thread
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub category: String,
    pub name: String,
    pub color_id: usize,
    pub start_ms: f64,
    pub duration_ms: f64,
    pub args: Map<String, Value>,

    /// Set when the slice was still open at the end of the import
    pub did_not_finish: bool,
}

impl Slice {
    pub fn new(
        category: impl Into<String>,
        name: impl Into<String>,
        color_id: usize,
        start_ms: f64,
        args: Map<String, Value>,
        duration_ms: f64,
    ) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
            color_id,
            start_ms,
            duration_ms,
            args,
            did_not_finish: false,
        }
    }

    pub fn end_ms(&self) -> f64 {
        self.start_ms + self.duration_ms
    }
}

/// A 'P' phase sample point
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub category: String,
    pub name: String,
    pub timestamp_ms: f64,
    pub args: Map<String, Value>,
}

/// One thread of one process
///
/// Owns the stack of currently open slices plus everything completed on it.
/// Open slices close strictly LIFO; closing with an empty stack is refused
/// rather than panicking.
#[derive(Debug, Clone, PartialEq)]
pub struct Thread {
    pub pid: String,
    pub tid: String,
    pub name: Option<String>,

    /// Completed synchronous slices, in the order they closed
    pub slices: Vec<Slice>,

    /// Async slices whose chain started on this thread
    pub async_slices: Vec<AsyncSlice>,

    pub samples: Vec<Sample>,

    open_slices: Vec<Slice>,
    last_begin_or_end_ms: Option<f64>,
}

impl Thread {
    pub fn new(pid: impl Into<String>, tid: impl Into<String>) -> Self {
        Self {
            pid: pid.into(),
            tid: tid.into(),
            name: None,
            slices: Vec::new(),
            async_slices: Vec::new(),
            samples: Vec::new(),
            open_slices: Vec::new(),
            last_begin_or_end_ms: None,
        }
    }

    pub fn thread_ref(&self) -> ThreadRef {
        ThreadRef::new(self.pid.clone(), self.tid.clone())
    }

    /// Number of slices begun but not yet ended (the stack depth)
    pub fn open_slice_count(&self) -> usize {
        self.open_slices.len()
    }

    /// Slices still open, outermost first
    pub fn open_slices(&self) -> &[Slice] {
        &self.open_slices
    }

    /// Whether a begin or end at `ts` keeps this thread's timestamps monotonic
    pub fn is_timestamp_valid_for_begin_or_end(&self, ts: f64) -> bool {
        self.last_begin_or_end_ms.map_or(true, |last| ts >= last)
    }

    /// Push a new open slice
    ///
    /// **Public** - 'B' handling; callers validate the timestamp first
    pub fn begin_slice(
        &mut self,
        category: &str,
        name: &str,
        color_id: usize,
        ts: f64,
        args: Map<String, Value>,
    ) {
        self.last_begin_or_end_ms = Some(ts);
        self.open_slices
            .push(Slice::new(category, name, color_id, ts, args, 0.0));
    }

    /// Pop the innermost open slice, closing it at `ts`
    ///
    /// **Public** - 'E' handling
    ///
    /// # Returns
    /// The completed slice (now last in `slices`) so end-time args can be
    /// merged, or `None` if nothing was open
    pub fn end_slice(&mut self, ts: f64) -> Option<&mut Slice> {
        let mut slice = self.open_slices.pop()?;
        self.last_begin_or_end_ms = Some(ts);
        slice.duration_ms = ts - slice.start_ms;
        self.slices.push(slice);
        self.slices.last_mut()
    }

    /// Record a zero-duration slice without consulting or moving the
    /// begin/end ordering watermark
    ///
    /// **Public** - 'I' / 'i' handling
    pub fn add_instant(
        &mut self,
        category: &str,
        name: &str,
        color_id: usize,
        ts: f64,
        args: Map<String, Value>,
    ) {
        self.open_slices
            .push(Slice::new(category, name, color_id, ts, args, 0.0));
        if let Some(slice) = self.open_slices.pop() {
            self.slices.push(slice);
        }
    }

    pub fn add_sample(&mut self, category: &str, name: &str, ts: f64, args: Map<String, Value>) {
        self.samples.push(Sample {
            category: category.to_string(),
            name: name.to_string(),
            timestamp_ms: ts,
            args,
        });
    }

    /// Close every open slice at `end_ms`, flagging them `did_not_finish`
    ///
    /// **Public** - called once by the model after all importers finish
    pub fn auto_close_open_slices(&mut self, end_ms: f64) {
        while let Some(mut slice) = self.open_slices.pop() {
            slice.duration_ms = (end_ms - slice.start_ms).max(0.0);
            slice.did_not_finish = true;
            self.slices.push(slice);
        }
    }

    pub fn shift_timestamps(&mut self, amount: f64) {
        for slice in self.slices.iter_mut().chain(self.open_slices.iter_mut()) {
            slice.start_ms -= amount;
        }
        for slice in &mut self.async_slices {
            slice.shift_timestamps(amount);
        }
        for sample in &mut self.samples {
            sample.timestamp_ms -= amount;
        }
        if let Some(last) = self.last_begin_or_end_ms.as_mut() {
            *last -= amount;
        }
    }

    pub(crate) fn extend_bounds(&self, bounds: &mut Bounds) {
        for slice in &self.slices {
            bounds.add_value(slice.start_ms);
            bounds.add_value(slice.end_ms());
        }
        for slice in &self.async_slices {
            bounds.add_value(slice.start_ms);
            bounds.add_value(slice.end_ms());
        }
        for sample in &self.samples {
            bounds.add_value(sample.timestamp_ms);
        }
        // Open slices have no end yet; their starts still count
        if let (Some(outer), Some(inner)) = (self.open_slices.first(), self.open_slices.last()) {
            bounds.add_value(outer.start_ms);
            bounds.add_value(inner.start_ms);
        }
    }
}
