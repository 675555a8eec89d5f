//! Command-line interface for dataset analysis and mosaic rendering

use crate::color::profiler::ColorProfiler;
use crate::io::configuration::{DEFAULT_OUTPUT_PATH, DEFAULT_OUTPUT_WIDTH, DEFAULT_TILE_SIZE};
use crate::io::dataset::DatasetLayout;
use crate::io::decode::DecoderChain;
use crate::io::error::{MosaicError, Result};
use crate::io::progress::ProgressManager;
use crate::render::job::{MosaicJob, RenderSettings};
use crate::render::tiles::DirectorySource;
use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::time::Instant;
use tracing::Level;

#[derive(Parser)]
#[command(name = "photomosaic")]
#[command(
    author,
    version,
    about = "Build photo mosaics from a dataset of source images"
)]
/// Command-line arguments for the mosaic tool
pub struct Cli {
    /// Operation to run
    #[command(subcommand)]
    pub command: Command,

    /// Suppress progress output and informational logs
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log per-stage details
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Worker threads for profiling and compositing (0 = all cores)
    #[arg(short = 'j', long, global = true, default_value_t = 0)]
    pub threads: usize,
}

/// Available operations
#[derive(Subcommand)]
pub enum Command {
    /// Profile `<DATASET>/images` and write the color catalog
    Analyze(AnalyzeArgs),
    /// Render a mosaic of a target image from a dataset
    Render(RenderArgs),
}

/// Arguments for `analyze`
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Dataset root containing an `images` directory
    #[arg(value_name = "DATASET")]
    pub dataset: PathBuf,
}

/// Arguments for `render`
#[derive(Args)]
pub struct RenderArgs {
    /// Dataset root containing an `images` directory
    #[arg(value_name = "DATASET")]
    pub dataset: PathBuf,

    /// Target image (a random dataset image when omitted)
    #[arg(value_name = "TARGET")]
    pub target: Option<PathBuf>,

    /// Mosaic width in tiles
    #[arg(short, long, default_value_t = DEFAULT_OUTPUT_WIDTH)]
    pub width: u32,

    /// Tile edge length in pixels
    #[arg(short, long, default_value_t = DEFAULT_TILE_SIZE)]
    pub tile_size: u32,

    /// Output image path; format follows the extension
    #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output: PathBuf,

    /// Seed for choosing the random target
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Rebuild the catalog even if one exists
    #[arg(short, long)]
    pub reanalyze: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Most verbose log level to emit
    pub const fn log_level(&self) -> Level {
        if self.quiet {
            Level::ERROR
        } else if self.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        }
    }
}

/// Executes the parsed command on a sized worker pool
pub struct MosaicRunner {
    cli: Cli,
    progress_manager: ProgressManager,
}

impl MosaicRunner {
    /// Create a runner for the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = ProgressManager::new(cli.should_show_progress());
        Self {
            cli,
            progress_manager,
        }
    }

    /// Run the command
    ///
    /// # Errors
    ///
    /// Returns an error if the worker pool cannot be built or the command
    /// fails
    pub fn run(&mut self) -> Result<()> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.cli.threads)
            .build()
            .map_err(|e| MosaicError::ThreadPool {
                reason: e.to_string(),
            })?;

        let result = pool.install(|| match &self.cli.command {
            Command::Analyze(args) => Self::analyze(&mut self.progress_manager, args),
            Command::Render(args) => Self::render(&mut self.progress_manager, args),
        });

        self.progress_manager.finish();
        result
    }

    fn analyze(progress_manager: &mut ProgressManager, args: &AnalyzeArgs) -> Result<()> {
        let start_time = Instant::now();
        let layout = DatasetLayout::new(&args.dataset);
        let report = layout.analyze(
            &ColorProfiler::default(),
            &progress_manager.stage("profiling"),
        )?;

        tracing::info!(
            profiled = report.catalog.len(),
            skipped = report.skipped.len(),
            elapsed_ms = start_time.elapsed().as_millis(),
            catalog = %layout.catalog_path().display(),
            "analysis complete"
        );
        Ok(())
    }

    fn render(progress_manager: &mut ProgressManager, args: &RenderArgs) -> Result<()> {
        let start_time = Instant::now();
        let settings = RenderSettings::new(args.width, args.tile_size)?;
        let layout = DatasetLayout::new(&args.dataset);

        if args.reanalyze || !layout.has_catalog() {
            tracing::info!(dataset = %layout.root().display(), "building color catalog");
            layout.analyze(
                &ColorProfiler::default(),
                &progress_manager.stage("profiling"),
            )?;
        }

        let target_path = match &args.target {
            Some(path) => path.clone(),
            None => {
                let mut rng = args
                    .seed
                    .map_or_else(|| StdRng::from_rng(&mut rand::rng()), StdRng::seed_from_u64);
                let path = layout.random_image(&mut rng)?;
                tracing::info!(image = %path.display(), "using random dataset image");
                path
            }
        };

        let mut job = MosaicJob::new(settings);
        job.load_catalog(layout.load_catalog()?)?;
        job.build_index()?;
        job.plan_grid_from_file(&target_path)?;

        let source = DirectorySource::with_decoders(layout.images_dir(), DecoderChain::default());
        let mosaic = job.render(&source, &progress_manager.stage("compositing"))?;
        mosaic.save(&args.output)?;

        tracing::info!(
            output = %args.output.display(),
            elapsed_ms = start_time.elapsed().as_millis(),
            "render complete"
        );
        Ok(())
    }
}
