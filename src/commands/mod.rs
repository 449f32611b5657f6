//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod import;
pub mod utils;

// Re-export main command functions
pub use import::{execute_import, read_trace_file, ImportArgs};
pub use utils::{detect_format, display_version};
