//! Live streaming import.
//!
//! A remote tracer pushes completed slices and counter samples as JSON text
//! frames; [`StreamImporter`] folds them into a [`crate::model::Model`] and can
//! ask the sender to pause or resume.

pub mod importer;
pub mod protocol;

pub use importer::StreamImporter;
pub use protocol::{
    CaptureState, Connection, CounterBatch, StreamCounterSample, StreamEvent, StreamListener,
    StreamMessage, StreamPacket, StreamSlice, ThreadBatch,
};
