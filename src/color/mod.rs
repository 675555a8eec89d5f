//! Representative color extraction for source images

/// Center-square crop and average color of a single image
pub mod profile;
/// Parallel profiling of a directory of source images
pub mod profiler;

pub use profile::ColorProfile;
