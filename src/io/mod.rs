//! Input/output, configuration and error handling

/// Command-line parsing and command execution
pub mod cli;
/// Constants and runtime defaults
pub mod configuration;
/// Error types
pub mod error;
/// Logger setup
pub mod logging;
/// Batch progress display
pub mod progress;
/// Plain-text rendering
pub mod render;
