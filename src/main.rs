//! CLI entry point for dataset analysis and photo mosaic rendering

use clap::Parser;
use photomosaic::io::cli::{Cli, MosaicRunner};

fn main() -> photomosaic::Result<()> {
    let cli = Cli::parse();
    let _ = tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    let mut runner = MosaicRunner::new(cli);
    runner.run()
}
