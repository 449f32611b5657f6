//! Trace Event Importer
//!
//! Imports Chrome Trace Event JSON (and a live streaming variant of it) into
//! an in-memory timeline model of processes, threads, slices, counters, async
//! slices and object lifetimes.
//!
//! This crate provides the core implementation for the `trace-import` CLI
//! tool.
//!
//! ## Getting Started
//!
//! ```ignore
//! use trace_event_importer::Model;
//!
//! let mut model = Model::new();
//! model.import_trace(r#"[{"ph":"B","name":"a","pid":1,"tid":1,"ts":0}]"#)?;
//! ```

pub mod commands;
pub mod importer;
pub mod model;
pub mod output;
pub mod parser;
pub mod stream;
pub mod utils;

pub use importer::{Importer, TraceEventImporter};
pub use model::Model;
pub use parser::TraceInput;
pub use stream::StreamImporter;
pub use utils::config::ImportOptions;
pub use utils::error::{ImportError, ParseError, StreamError};
