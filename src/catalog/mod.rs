//! Persisted collection of (identifier, color) pairs

/// Catalog file reader and writer
pub mod format;
/// In-memory catalog with ordering and uniqueness guarantees
pub mod store;

pub use store::ColorCatalog;
