//! Mosaic constants and runtime configuration defaults

use image::imageops::FilterType;

// Default values for configurable parameters
/// Default mosaic width measured in tiles
pub const DEFAULT_OUTPUT_WIDTH: u32 = 100;
/// Default edge length of a single square tile in pixels
pub const DEFAULT_TILE_SIZE: u32 = 32;

// Safety limits to prevent excessive memory allocation
/// Maximum allowed grid dimension (tiles along either axis)
pub const MAX_GRID_DIMENSION: u32 = 10_000;
/// Maximum allowed tile edge length in pixels
pub const MAX_TILE_SIZE: u32 = 1024;
/// Maximum size of the RGB output canvas in bytes (4 GiB)
pub const MAX_CANVAS_BYTES: u64 = 1 << 32;

/// Resampling filter used for both target downsampling and tile resizing
///
/// Bilinear interpolation; downscaling widens the kernel so each output
/// pixel blends the region it covers.
pub const RESAMPLE_FILTER: FilterType = FilterType::Triangle;

// Dataset layout
/// Directory under the dataset root holding source images
pub const IMAGES_DIR: &str = "images";
/// Directory under the dataset root holding derived analysis files
pub const ANALYSIS_DIR: &str = "analysis";
/// File name of the persisted color catalog
pub const CATALOG_FILE_NAME: &str = "center_crop_avg_colors.csv";
/// Header row of the catalog file
pub const CATALOG_HEADER: [&str; 4] = ["image_name", "r", "g", "b"];

/// File extensions (lowercase) considered source images
pub const SOURCE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp", "tif", "tiff"];

// Output settings
/// Output path used when none is given
pub const DEFAULT_OUTPUT_PATH: &str = "output_mosaic.jpg";

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;
