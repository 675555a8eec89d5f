//! Input/output operations and error handling

/// Command-line interface
pub mod cli;
/// Constants and configuration defaults
pub mod configuration;
/// Dataset directory layout
pub mod dataset;
/// Ordered image decoder chain
pub mod decode;
/// Error types
pub mod error;
/// Mosaic export
pub mod image;
/// Progress reporting
pub mod progress;
