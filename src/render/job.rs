//! Mosaic job lifecycle and the single-call render entry point
//!
//! A job moves `Created -> CatalogLoaded -> IndexBuilt -> GridPlanned ->
//! Rendering -> Complete`. Any unrecoverable error moves it to `Failed`,
//! which is terminal. Per-tile decode failures are not errors here.

use crate::catalog::store::ColorCatalog;
use crate::io::configuration::{MAX_GRID_DIMENSION, MAX_TILE_SIZE};
use crate::io::decode::DecoderChain;
use crate::io::error::{DecodeError, MosaicError, Result, invalid_dimension};
use crate::render::compositor::{Compositor, Mosaic};
use crate::render::tiles::{DirectorySource, TileSource};
use crate::spatial::grid::GridPlan;
use crate::spatial::kdtree::SpatialIndex;
use image::RgbImage;
use indicatif::ProgressBar;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Lifecycle state of a mosaic job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    /// Nothing loaded yet
    Created,
    /// Catalog owned by the job
    CatalogLoaded,
    /// Spatial index built from the catalog
    IndexBuilt,
    /// Target image reduced to grid cells
    GridPlanned,
    /// Tiles being composited
    Rendering,
    /// Mosaic produced
    Complete,
    /// Unrecoverable error occurred
    Failed,
}

impl JobState {
    /// Whether no further transitions are possible
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Created => "Created",
            Self::CatalogLoaded => "CatalogLoaded",
            Self::IndexBuilt => "IndexBuilt",
            Self::GridPlanned => "GridPlanned",
            Self::Rendering => "Rendering",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        };
        f.write_str(name)
    }
}

/// Shared flag for aborting a job between tiles
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Fresh, uncancelled token
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; every clone observes it
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Fail with `Cancelled` once cancellation was requested
    ///
    /// # Errors
    ///
    /// Returns `Cancelled` if the token fired
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(MosaicError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Output geometry of a mosaic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSettings {
    /// Grid width in tiles
    pub output_width: u32,
    /// Tile edge length in pixels
    pub tile_size: u32,
}

impl RenderSettings {
    /// Validate and build settings
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimension` if either value is zero or above its limit
    pub fn new(output_width: u32, tile_size: u32) -> Result<Self> {
        if output_width < 1 || output_width > MAX_GRID_DIMENSION {
            return Err(invalid_dimension(
                "output_width",
                &output_width,
                &format!("must be between 1 and {MAX_GRID_DIMENSION}"),
            ));
        }
        if tile_size < 1 || tile_size > MAX_TILE_SIZE {
            return Err(invalid_dimension(
                "tile_size",
                &tile_size,
                &format!("must be between 1 and {MAX_TILE_SIZE}"),
            ));
        }

        Ok(Self {
            output_width,
            tile_size,
        })
    }
}

/// One mosaic rendering job, driven step by step
pub struct MosaicJob {
    state: JobState,
    settings: RenderSettings,
    catalog: Option<ColorCatalog>,
    index: Option<SpatialIndex>,
    plan: Option<GridPlan>,
    cancel: CancelToken,
}

impl MosaicJob {
    /// New job in the `Created` state
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            state: JobState::Created,
            settings,
            catalog: None,
            index: None,
            plan: None,
            cancel: CancelToken::new(),
        }
    }

    /// Current lifecycle state
    pub const fn state(&self) -> JobState {
        self.state
    }

    /// Output geometry
    pub const fn settings(&self) -> RenderSettings {
        self.settings
    }

    /// Token that aborts this job when cancelled
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Catalog owned by the job, once loaded
    pub const fn catalog(&self) -> Option<&ColorCatalog> {
        self.catalog.as_ref()
    }

    /// Grid plan, once planned
    pub const fn plan(&self) -> Option<&GridPlan> {
        self.plan.as_ref()
    }

    /// Take ownership of a finished catalog
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the job is `Created`
    pub fn load_catalog(&mut self, catalog: ColorCatalog) -> Result<()> {
        self.advance(JobState::Created, JobState::CatalogLoaded)?;
        tracing::debug!(entries = catalog.len(), "catalog loaded");
        self.catalog = Some(catalog);
        Ok(())
    }

    /// Build the spatial index over the loaded catalog
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the job is `CatalogLoaded`, or
    /// `EmptyCatalog` (job fails) if the catalog has no entries
    pub fn build_index(&mut self) -> Result<()> {
        self.advance(JobState::CatalogLoaded, JobState::IndexBuilt)?;
        let built = self
            .catalog
            .as_ref()
            .ok_or(MosaicError::CatalogMissing)
            .and_then(SpatialIndex::build);
        let index = self.fail_on_error(built)?;
        tracing::debug!(colors = index.len(), "spatial index built");
        self.index = Some(index);
        Ok(())
    }

    /// Plan the grid from encoded target image bytes
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the job is `IndexBuilt`,
    /// `InvalidTarget` if the bytes do not decode, or `InvalidDimension`
    pub fn plan_grid(&mut self, target_bytes: &[u8]) -> Result<()> {
        let decoded = DecoderChain::default().decode(target_bytes);
        self.plan_decoded(decoded)
    }

    /// Plan the grid from a target image file
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the job is `IndexBuilt`,
    /// `InvalidTarget` if the file cannot be read or decoded, or
    /// `InvalidDimension`
    pub fn plan_grid_from_file(&mut self, target_path: &Path) -> Result<()> {
        let decoded = DecoderChain::default().decode_file(target_path);
        self.plan_decoded(decoded)
    }

    fn plan_decoded(&mut self, decoded: std::result::Result<RgbImage, DecodeError>) -> Result<()> {
        match decoded {
            Ok(target) => self.plan_grid_from_image(&target),
            Err(source) => {
                self.advance(JobState::IndexBuilt, JobState::GridPlanned)?;
                self.state = JobState::Failed;
                Err(MosaicError::InvalidTarget { source })
            }
        }
    }

    /// Plan the grid from an already decoded target image
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the job is `IndexBuilt`, or
    /// `InvalidDimension` (job fails) for an unusable size
    pub fn plan_grid_from_image(&mut self, target: &RgbImage) -> Result<()> {
        self.advance(JobState::IndexBuilt, JobState::GridPlanned)?;
        let planned = GridPlan::from_image(target, self.settings.output_width);
        let plan = self.fail_on_error(planned)?;
        tracing::debug!(rows = plan.rows(), cols = plan.cols(), "grid planned");
        self.plan = Some(plan);
        Ok(())
    }

    /// Composite the planned grid into a mosaic
    ///
    /// # Errors
    ///
    /// Returns `CatalogMissing` if the index was never built, `EmptyGrid`
    /// if no cells were planned, `InvalidTransition` from any other state,
    /// or `Cancelled`; the job fails and any partial canvas is dropped
    pub fn render(&mut self, source: &impl TileSource, progress: &ProgressBar) -> Result<Mosaic> {
        match self.state {
            JobState::GridPlanned => {}
            JobState::Created | JobState::CatalogLoaded => {
                self.state = JobState::Failed;
                return Err(MosaicError::CatalogMissing);
            }
            JobState::IndexBuilt => {
                self.state = JobState::Failed;
                return Err(MosaicError::EmptyGrid);
            }
            from => {
                return Err(MosaicError::InvalidTransition {
                    from,
                    to: JobState::Rendering,
                });
            }
        }
        self.state = JobState::Rendering;

        let rendered = match (&self.catalog, &self.plan) {
            (Some(catalog), Some(plan)) => Compositor::new(
                catalog,
                self.index.as_ref(),
                source,
                self.settings.tile_size,
            )
            .render(plan, &self.cancel, progress),
            (None, _) => Err(MosaicError::CatalogMissing),
            (_, None) => Err(MosaicError::EmptyGrid),
        };
        let mosaic = self.fail_on_error(rendered)?;

        self.state = JobState::Complete;
        tracing::info!(
            width = mosaic.width_px,
            height = mosaic.height_px,
            distinct_sources = mosaic.distinct_sources,
            substituted = mosaic.substituted_tiles,
            "mosaic complete"
        );
        Ok(mosaic)
    }

    fn advance(&mut self, expected: JobState, next: JobState) -> Result<()> {
        if self.state == expected {
            self.state = next;
            Ok(())
        } else {
            Err(MosaicError::InvalidTransition {
                from: self.state,
                to: next,
            })
        }
    }

    fn fail_on_error<T>(&mut self, result: Result<T>) -> Result<T> {
        if result.is_err() {
            self.state = JobState::Failed;
        }
        result
    }
}

/// Render a mosaic of encoded target image bytes in one call
///
/// Tiles are read from the catalog's image root.
///
/// # Errors
///
/// Returns the first unrecoverable error: `InvalidDimension`,
/// `EmptyCatalog`, `InvalidTarget`, or `EmptyGrid`
pub fn render(
    catalog: ColorCatalog,
    target_image: &[u8],
    output_width: u32,
    tile_size: u32,
) -> Result<Mosaic> {
    let source = DirectorySource::new(catalog.image_root());
    render_with_source(
        catalog,
        &source,
        target_image,
        RenderSettings::new(output_width, tile_size)?,
        &ProgressBar::hidden(),
    )
}

/// Render with an explicit tile source and progress bar
///
/// # Errors
///
/// Same as [`render`]
pub fn render_with_source(
    catalog: ColorCatalog,
    source: &impl TileSource,
    target_image: &[u8],
    settings: RenderSettings,
    progress: &ProgressBar,
) -> Result<Mosaic> {
    let mut job = MosaicJob::new(settings);
    job.load_catalog(catalog)?;
    job.build_index()?;
    job.plan_grid(target_image)?;
    job.render(source, progress)
}
