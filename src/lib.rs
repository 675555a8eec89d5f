//! Photo mosaic generation by nearest average-color tile matching
//!
//! Source images are reduced to the average color of their center square,
//! indexed in a three-dimensional k-d tree, and matched against a downsampled
//! target image. Each grid cell is filled with its best-matching source,
//! cropped and resized to a square tile, assembled in parallel.

#![forbid(unsafe_code)]

/// Color catalog storage and its on-disk format
pub mod catalog;
/// Average color extraction and parallel directory profiling
pub mod color;
/// Input/output operations, configuration, and error handling
pub mod io;
/// Tile preparation, compositing, and job orchestration
pub mod render;
/// Nearest-color index and grid planning
pub mod spatial;

pub use catalog::store::ColorCatalog;
pub use io::error::{DecodeError, MosaicError, Result};
pub use render::compositor::Mosaic;
pub use render::job::render;
