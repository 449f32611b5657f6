//! Wire format and seams of the live stream.
//!
//! Each message is one JSON object discriminated by `cmd`:
//!
//! ```text
//! {"cmd": "ptd", "pid": 1, "td": {"n": "main", "s": [{"l": "Paint", "s": 1.0, "e": 3.5}]}}
//! {"cmd": "pcd", "pid": 1, "cd": {"n": "mem", "sn": ["used"], "sc": [4], "c": [{"t": 1.0, "v": [12]}]}}
//! ```
//!
//! Timestamps on the stream are already in milliseconds.

use crate::model::Model;
use crate::parser::event::deserialize_string_or_number;
use crate::utils::error::StreamError;
use serde::Deserialize;

/// A decoded stream message
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "cmd")]
pub enum StreamPacket {
    /// Process thread data: a batch of completed slices for one thread
    #[serde(rename = "ptd")]
    ThreadData {
        #[serde(deserialize_with = "deserialize_string_or_number")]
        pid: String,
        #[serde(rename = "td")]
        data: ThreadBatch,
    },

    /// Process counter data: a batch of samples for one counter
    #[serde(rename = "pcd")]
    CounterData {
        #[serde(deserialize_with = "deserialize_string_or_number")]
        pid: String,
        #[serde(rename = "cd")]
        data: CounterBatch,
    },

    /// Any other command; ignored
    #[serde(other)]
    Unknown,
}

impl StreamPacket {
    pub fn parse(data: &str) -> Result<Self, StreamError> {
        Ok(serde_json::from_str(data)?)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThreadBatch {
    /// Thread name, used as the thread key
    #[serde(rename = "n", deserialize_with = "deserialize_string_or_number")]
    pub name: String,

    #[serde(rename = "s", default)]
    pub slices: Vec<StreamSlice>,
}

/// An already closed interval
#[derive(Debug, Clone, Deserialize)]
pub struct StreamSlice {
    #[serde(rename = "l")]
    pub label: String,

    #[serde(rename = "s")]
    pub start: f64,

    #[serde(rename = "e")]
    pub end: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CounterBatch {
    #[serde(rename = "n")]
    pub name: String,

    #[serde(rename = "sn", default)]
    pub series_names: Vec<String>,

    /// Palette color ids, parallel to `series_names`
    #[serde(rename = "sc", default)]
    pub series_colors: Vec<usize>,

    #[serde(rename = "c", default)]
    pub samples: Vec<StreamCounterSample>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StreamCounterSample {
    #[serde(rename = "t")]
    pub timestamp: f64,

    #[serde(rename = "v", default)]
    pub values: Vec<f64>,
}

/// Capture state negotiated with the remote end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Capturing,
    Paused,
}

/// The transport a [`super::StreamImporter`] talks back over
pub trait Connection {
    /// Send one text frame to the remote end
    fn send(&mut self, message: &str) -> Result<(), StreamError>;

    /// Whether the transport is currently open
    fn is_open(&self) -> bool;
}

/// What the importer tells its listeners about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEvent {
    Connect,
    Disconnect,
    ConnectionError,
    /// The model changed and its bounds were recomputed
    ModelChange,
}

/// Observer of stream lifecycle and model changes
pub trait StreamListener {
    fn on_stream_event(&mut self, event: StreamEvent, model: &Model);
}

impl<F> StreamListener for F
where
    F: FnMut(StreamEvent, &Model),
{
    fn on_stream_event(&mut self, event: StreamEvent, model: &Model) {
        self(event, model)
    }
}

/// Transport-level happenings, in delivery order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamMessage {
    Open,
    Message(String),
    Close,
    Error,
}
