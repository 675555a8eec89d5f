//! Grid planning: downsample the target image into per-cell target colors
//!
//! The target is resized so that one pixel stands for one grid cell. The
//! resampled pixel, not an averaged region, becomes the cell's target color,
//! so very fine target detail can alias.

use crate::io::configuration::{MAX_GRID_DIMENSION, RESAMPLE_FILTER};
use crate::io::error::{Result, invalid_dimension};
use image::{Rgb, RgbImage, imageops};
use ndarray::Array2;

/// One position in the output grid with its target color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    /// Zero-based row
    pub row: u32,
    /// Zero-based column
    pub col: u32,
    /// Color the matched tile should approximate
    pub target_rgb: Rgb<u8>,
}

/// Aspect-preserving grid of target colors, indexed `(row, col)`
#[derive(Debug, Clone)]
pub struct GridPlan {
    colors: Array2<Rgb<u8>>,
}

impl GridPlan {
    /// Plan a grid `output_width` cells wide for the target image
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimension` if `output_width` is zero, the derived
    /// height exceeds the grid limit, or the target has no pixels
    pub fn from_image(target: &RgbImage, output_width: u32) -> Result<Self> {
        let output_height = output_height(target.width(), target.height(), output_width)?;
        let resized = imageops::resize(target, output_width, output_height, RESAMPLE_FILTER);

        let colors = Array2::from_shape_fn(
            (output_height as usize, output_width as usize),
            |(row, col)| {
                resized
                    .get_pixel_checked(col as u32, row as u32)
                    .copied()
                    .unwrap_or(Rgb([0, 0, 0]))
            },
        );

        Ok(Self { colors })
    }

    /// Build a plan directly from a color grid
    pub const fn from_colors(colors: Array2<Rgb<u8>>) -> Self {
        Self { colors }
    }

    /// Number of rows (output height in tiles)
    pub fn rows(&self) -> u32 {
        self.colors.nrows() as u32
    }

    /// Number of columns (output width in tiles)
    pub fn cols(&self) -> u32 {
        self.colors.ncols() as u32
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the plan has no cells
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Target color of one cell
    pub fn color_at(&self, row: u32, col: u32) -> Option<Rgb<u8>> {
        self.colors.get((row as usize, col as usize)).copied()
    }

    /// Cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        self.colors
            .indexed_iter()
            .map(|((row, col), rgb)| GridCell {
                row: row as u32,
                col: col as u32,
                target_rgb: *rgb,
            })
    }
}

/// Grid height preserving the target's aspect ratio
///
/// `round(output_width * height / width)`, never less than one. Exact
/// halves round to the even neighbour, so a 2:1 target five cells wide
/// plans two rows.
///
/// # Errors
///
/// Returns `InvalidDimension` if `output_width` is zero or above the grid
/// limit, the target has a zero dimension, or the derived height exceeds
/// the grid limit
pub fn output_height(target_width: u32, target_height: u32, output_width: u32) -> Result<u32> {
    if output_width < 1 {
        return Err(invalid_dimension(
            "output_width",
            &output_width,
            &"must be at least 1",
        ));
    }
    if output_width > MAX_GRID_DIMENSION {
        return Err(invalid_dimension(
            "output_width",
            &output_width,
            &format!("must not exceed {MAX_GRID_DIMENSION}"),
        ));
    }
    if target_width == 0 || target_height == 0 {
        return Err(invalid_dimension(
            "target",
            &format!("{target_width}x{target_height}"),
            &"target image has no pixels",
        ));
    }

    let height = (f64::from(output_width) * f64::from(target_height) / f64::from(target_width))
        .round_ties_even()
        .max(1.0);
    if height > f64::from(MAX_GRID_DIMENSION) {
        return Err(invalid_dimension(
            "output_height",
            &height,
            &format!("derived height must not exceed {MAX_GRID_DIMENSION}"),
        ));
    }

    Ok(height as u32)
}
