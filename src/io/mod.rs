/// Persisted analysis artifact
pub mod analysis;
/// Command-line interface and batch processing
pub mod cli;
/// Solver constants and defaults
pub mod configuration;
/// Error types and helpers
pub mod error;
/// Image loading and reconstruction export
pub mod image;
/// Progress display for batch runs
pub mod progress;
