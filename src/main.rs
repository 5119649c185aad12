//! CLI entry point for mosaic reconstruction

use clap::Parser;
use std::process::ExitCode;
use tilemosaic::io::cli::{Cli, MosaicProcessor};
use tilemosaic::io::logging::init_logging;
use tilemosaic::io::raster::ImageBackend;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let mut processor = MosaicProcessor::new(cli.run_config(), ImageBackend::new());
    match processor.process() {
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("{error}");
            ExitCode::FAILURE
        }
    }
}
