//! Mosaic rendering
//!
//! This module contains:
//! - Tile sources and tile preparation
//! - Parallel compositing into the output canvas
//! - The job state machine and render entry point

/// Parallel assembly of matched tiles into the mosaic canvas
pub mod compositor;
/// Job lifecycle, cancellation, and the render entry point
pub mod job;
/// Tile sources, cropping, resizing, and black substitution
pub mod tiles;
