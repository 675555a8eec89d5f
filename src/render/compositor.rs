//! Parallel tile assembly into the output mosaic
//!
//! Three passes, each a rayon parallel iterator over owned work:
//! 1. match every grid cell against the spatial index
//! 2. prepare each distinct matched source once (crop, resize, or black)
//! 3. split the canvas into disjoint row bands, one per grid row, and copy
//!    tiles into them
//!
//! A band covers pixel rows `[row * tile_size, (row + 1) * tile_size)` and is
//! only ever written by the task that owns it, so no locking is needed.

use crate::catalog::store::ColorCatalog;
use crate::io::configuration::MAX_CANVAS_BYTES;
use crate::io::error::{MosaicError, Result, invalid_dimension};
use crate::render::job::CancelToken;
use crate::render::tiles::{PreparedTile, TileSource, prepare_tile};
use crate::spatial::grid::GridPlan;
use crate::spatial::kdtree::SpatialIndex;
use image::RgbImage;
use indicatif::ProgressBar;
use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

const CHANNELS: usize = 3;

/// Bytes needed for an RGB canvas of `rows x cols` square tiles
///
/// # Errors
///
/// Returns `InvalidDimension` if the size overflows or exceeds
/// `MAX_CANVAS_BYTES`
pub fn canvas_bytes(rows: u32, cols: u32, tile_size: u32) -> Result<usize> {
    let bytes = u64::from(rows)
        .checked_mul(u64::from(cols))
        .and_then(|cells| cells.checked_mul(u64::from(tile_size)))
        .and_then(|bytes| bytes.checked_mul(u64::from(tile_size)))
        .and_then(|bytes| bytes.checked_mul(CHANNELS as u64))
        .filter(|bytes| *bytes <= MAX_CANVAS_BYTES);

    bytes
        .and_then(|bytes| usize::try_from(bytes).ok())
        .ok_or_else(|| {
            invalid_dimension(
                "canvas",
                &format!("{cols}x{rows} tiles of {tile_size}px"),
                &format!("canvas must not exceed {MAX_CANVAS_BYTES} bytes"),
            )
        })
}

/// Assembled output image
#[derive(Debug, Clone)]
pub struct Mosaic {
    /// Width in pixels (`cols * tile_size`)
    pub width_px: u32,
    /// Height in pixels (`rows * tile_size`)
    pub height_px: u32,
    /// RGB pixel data
    pub pixel_buffer: RgbImage,
    /// Cells rendered as black because their source could not be decoded
    pub substituted_tiles: usize,
    /// Distinct catalog entries used
    pub distinct_sources: usize,
}

impl Mosaic {
    /// Save the mosaic, format chosen by extension
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the
    /// image cannot be encoded or written
    pub fn save(&self, path: &Path) -> Result<()> {
        crate::io::image::export_mosaic(self, path)
    }
}

/// Everything the compositor reads, shared immutably across workers
pub struct Compositor<'a, S: TileSource> {
    catalog: &'a ColorCatalog,
    index: Option<&'a SpatialIndex>,
    source: &'a S,
    tile_size: u32,
}

impl<'a, S: TileSource> Compositor<'a, S> {
    /// Create a compositor; `index` is `None` when it was never built
    pub const fn new(
        catalog: &'a ColorCatalog,
        index: Option<&'a SpatialIndex>,
        source: &'a S,
        tile_size: u32,
    ) -> Self {
        Self {
            catalog,
            index,
            source,
            tile_size,
        }
    }

    /// Catalog index of the best match for every cell, row-major
    ///
    /// # Errors
    ///
    /// Returns `CatalogMissing` if no index was supplied
    pub fn match_cells(&self, plan: &GridPlan) -> Result<Vec<usize>> {
        let index = self.index.ok_or(MosaicError::CatalogMissing)?;
        let colors: Vec<_> = plan.cells().map(|cell| cell.target_rgb).collect();
        Ok(colors
            .par_iter()
            .map(|rgb| index.nearest(*rgb).index)
            .collect())
    }

    /// Render the plan into a mosaic
    ///
    /// Per-tile decode failures become black tiles and never fail the job.
    ///
    /// # Errors
    ///
    /// Returns `CatalogMissing` without an index, `EmptyGrid` for an empty
    /// plan, `InvalidDimension` for a zero tile size or an oversized canvas,
    /// or `Cancelled` if the token fires before the canvas is complete
    pub fn render(
        &self,
        plan: &GridPlan,
        cancel: &CancelToken,
        progress: &ProgressBar,
    ) -> Result<Mosaic> {
        if self.index.is_none() {
            return Err(MosaicError::CatalogMissing);
        }
        if plan.is_empty() {
            return Err(MosaicError::EmptyGrid);
        }
        if self.tile_size == 0 {
            return Err(invalid_dimension(
                "tile_size",
                &self.tile_size,
                &"must be at least 1",
            ));
        }

        let canvas_len = canvas_bytes(plan.rows(), plan.cols(), self.tile_size)?;

        let matches = self.match_cells(plan)?;
        let tiles = self.prepare_tiles(&matches, cancel, progress)?;
        let substituted_tiles = matches
            .iter()
            .filter(|index| tiles.get(*index).is_some_and(|tile| tile.substituted))
            .count();

        let width_px = plan.cols() * self.tile_size;
        let height_px = plan.rows() * self.tile_size;
        let canvas = self.assemble(plan, &matches, &tiles, canvas_len, cancel, progress)?;

        let pixel_buffer = RgbImage::from_raw(width_px, height_px, canvas).ok_or_else(|| {
            invalid_dimension(
                "canvas",
                &format!("{width_px}x{height_px}"),
                &"pixel buffer does not match canvas dimensions",
            )
        })?;

        Ok(Mosaic {
            width_px,
            height_px,
            pixel_buffer,
            substituted_tiles,
            distinct_sources: tiles.len(),
        })
    }

    fn prepare_tiles(
        &self,
        matches: &[usize],
        cancel: &CancelToken,
        progress: &ProgressBar,
    ) -> Result<HashMap<usize, PreparedTile>> {
        let distinct: BTreeSet<usize> = matches.iter().copied().collect();
        progress.set_length(distinct.len() as u64);
        progress.set_position(0);
        progress.set_message("preparing tiles");

        distinct
            .into_par_iter()
            .map(|index| -> Result<(usize, PreparedTile)> {
                cancel.check()?;
                let profile = self.catalog.get(index).ok_or(MosaicError::CatalogMissing)?;
                let tile = prepare_tile(self.source, &profile.identifier, self.tile_size);
                progress.inc(1);
                Ok((index, tile))
            })
            .collect()
    }

    fn assemble(
        &self,
        plan: &GridPlan,
        matches: &[usize],
        tiles: &HashMap<usize, PreparedTile>,
        canvas_len: usize,
        cancel: &CancelToken,
        progress: &ProgressBar,
    ) -> Result<Vec<u8>> {
        let tile_size = self.tile_size as usize;
        let cols = plan.cols() as usize;
        let row_stride = cols * tile_size * CHANNELS;
        let tile_stride = tile_size * CHANNELS;
        let mut canvas = vec![0u8; canvas_len];

        progress.set_length(plan.rows() as u64);
        progress.set_position(0);
        progress.set_message("assembling");

        canvas
            .par_chunks_mut(row_stride * tile_size)
            .zip(matches.par_chunks(cols))
            .try_for_each(|(band, row_matches)| -> Result<()> {
                cancel.check()?;
                for (col, index) in row_matches.iter().enumerate() {
                    let Some(tile) = tiles.get(index) else {
                        continue;
                    };
                    let pixels = tile.image.as_raw();
                    for (y, tile_row) in pixels.chunks_exact(tile_stride).enumerate() {
                        let start = y * row_stride + col * tile_stride;
                        if let Some(target) = band.get_mut(start..start + tile_stride) {
                            target.copy_from_slice(tile_row);
                        }
                    }
                }
                progress.inc(1);
                Ok(())
            })?;

        Ok(canvas)
    }
}
