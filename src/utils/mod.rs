//! Utility modules for configuration, error handling, and color assignment.

pub mod color;
pub mod config;
pub mod error;

// Re-export commonly used error types for convenience
pub use error::{ImportError, ObjectError, OutputError, ParseError, StreamError};
