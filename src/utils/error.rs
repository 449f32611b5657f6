//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.
//!
//! Only [`ParseError`] (and [`ImportError`] wrapping it) can fail a whole
//! batch import. Everything recoverable is collected as a string in
//! `Model::import_errors` instead.

use thiserror::Error;

/// Errors that can occur while decoding trace input
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid trace format: {0}")]
    InvalidFormat(String),
}

/// Errors that abort a call to `Model::import_traces`
#[derive(Error, Debug)]
pub enum ImportError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Could not find an importer for the provided event data")]
    NoImporter,
}

/// Per-event failures while replaying object lifecycle events
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ObjectError {
    #[error("Object events require a name parameter.")]
    MissingName,

    #[error("Object events require an id parameter.")]
    MissingId,

    #[error("Snapshots must have args: {{snapshot: ...}}")]
    MissingSnapshot,

    #[error("At ts={ts}, object {id} was created while a previous instance was still alive")]
    AlreadyAlive { id: String, ts: f64 },

    #[error("At ts={ts}, object {id} was deleted twice")]
    AlreadyDeleted { id: String, ts: f64 },

    #[error("At ts={ts}, object {id} was deleted before it was created")]
    DeletedBeforeCreated { id: String, ts: f64 },

    #[error("Object {id} was {action} with category {found} but was created with category {expected}")]
    CategoryMismatch {
        id: String,
        action: &'static str,
        expected: String,
        found: String,
    },

    #[error("Object {id} was {action} with name {found} but was created with name {expected}")]
    NameMismatch {
        id: String,
        action: &'static str,
        expected: String,
        found: String,
    },
}

/// Errors surfaced to the caller of the streaming adapter
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("Malformed stream message: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Already paused.")]
    AlreadyPaused,

    #[error("Already capturing.")]
    AlreadyCapturing,

    #[error("Not connected.")]
    NotConnected,

    #[error("Failed to send on connection: {0}")]
    Send(String),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
