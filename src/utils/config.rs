//! Configuration and constants for the importer.

/// Trace timestamps are microseconds; the model works in milliseconds
pub const MICROS_PER_MILLI: f64 = 1000.0;

/// Number of entries in the display palette that color ids index into
pub const NUM_COLOR_IDS: usize = 18;

/// Category assigned to slices and counters that arrive over a live stream
pub const STREAM_CATEGORY: &str = "streamed";

/// Current summary output schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

// Metadata ('M') event names we understand
pub const THREAD_NAME_METADATA: &str = "thread_name";
pub const PROCESS_NAME_METADATA: &str = "process_name";

/// Field of a JSON object container holding the event list
pub const TRACE_EVENTS_FIELD: &str = "traceEvents";

/// Knobs applied by [`crate::model::Model::import_traces`] after all
/// importers have run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    /// Shift every timestamp so the earliest event lands at zero
    pub shift_world_to_zero: bool,

    /// Close slices still open at the end of the trace at the max bound
    pub auto_close_open_slices: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            shift_world_to_zero: false,
            auto_close_open_slices: true,
        }
    }
}

impl ImportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shift_world_to_zero(mut self, shift: bool) -> Self {
        self.shift_world_to_zero = shift;
        self
    }

    pub fn with_auto_close_open_slices(mut self, close: bool) -> Self {
        self.auto_close_open_slices = close;
        self
    }
}
