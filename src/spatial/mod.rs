//! Spatial data structures
//!
//! This module contains:
//! - The k-d tree nearest-color index
//! - Grid planning from the target image

/// Target downsampling into an aspect-preserving grid of colors
pub mod grid;
/// Three-dimensional k-d tree over catalog colors
pub mod kdtree;

pub use grid::{GridCell, GridPlan};
pub use kdtree::SpatialIndex;
