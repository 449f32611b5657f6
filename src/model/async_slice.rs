//! Slices whose begin and end may land on different threads.

use super::thread::ThreadRef;
use serde_json::{Map, Value};

/// An async slice, optionally divided into sub-steps
#[derive(Debug, Clone, PartialEq)]
pub struct AsyncSlice {
    pub category: String,
    pub name: String,
    pub color_id: usize,
    pub start_ms: f64,
    pub duration_ms: f64,
    pub start_thread: ThreadRef,
    pub end_thread: ThreadRef,
    pub id: String,
    pub args: Map<String, Value>,
    pub sub_slices: Vec<AsyncSlice>,
}

impl AsyncSlice {
    pub fn end_ms(&self) -> f64 {
        self.start_ms + self.duration_ms
    }

    pub fn shift_timestamps(&mut self, amount: f64) {
        self.start_ms -= amount;
        for sub_slice in &mut self.sub_slices {
            sub_slice.shift_timestamps(amount);
        }
    }
}
