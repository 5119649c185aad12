//! Command-line interface and run orchestration

use crate::io::configuration::{DEFAULT_COMPRESSED_SIZE, OutputOptions, RunConfig};
use crate::io::error::Result;
use crate::io::ingest::TileScanner;
use crate::io::output::MosaicWriter;
use crate::io::progress::ProgressManager;
use crate::io::raster::RasterBackend;
use crate::mosaic::ImageRegistry;
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "tilemosaic")]
#[command(
    author,
    version,
    about = "Reassemble mosaics from positioned tile files"
)]
/// Command-line arguments for mosaic reconstruction
// Each output encoding is an independent switch
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Directory containing `<id> @(<x>|<y>).<ext>` tile files
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Directory receiving reconstructed mosaics
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Log every tile and aggregate
    #[arg(long)]
    pub debug: bool,

    /// Write a lossless TIFF per mosaic
    #[arg(long)]
    pub save_full: bool,

    /// Add reduced-resolution pages to the TIFF
    #[arg(long)]
    pub pyramid: bool,

    /// Write a downscaled JPEG per mosaic
    #[arg(long)]
    pub save_compressed: bool,

    /// Bounding box edge of the downscaled JPEG
    #[arg(
        long,
        default_value_t = DEFAULT_COMPRESSED_SIZE,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub compressed_size: u32,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Output encodings requested on the command line
    pub const fn output_options(&self) -> OutputOptions {
        OutputOptions {
            save_full: self.save_full,
            pyramid: self.pyramid,
            save_compressed: self.save_compressed,
            compressed_size: self.compressed_size,
        }
    }

    /// Run configuration for these arguments
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            input_dir: self.input_dir.clone(),
            output_dir: self.output_dir.clone(),
            debug: self.debug,
            show_progress: self.should_show_progress(),
            output: self.output_options(),
        }
    }
}

/// Orchestrates ingestion, validation and output of every mosaic
pub struct MosaicProcessor<B: RasterBackend> {
    config: RunConfig,
    backend: B,
    progress_manager: Option<ProgressManager>,
}

impl<B: RasterBackend> MosaicProcessor<B> {
    /// Create a processor for the given configuration
    pub fn new(config: RunConfig, backend: B) -> Self {
        let progress_manager = config.show_progress.then(ProgressManager::new);

        Self {
            config,
            backend,
            progress_manager,
        }
    }

    /// Configuration of this run
    pub const fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Ingest and validate every mosaic in the input directory
    ///
    /// # Errors
    ///
    /// Returns the first ingestion or validation failure
    pub fn load(&self) -> Result<ImageRegistry<B::Handle>> {
        let scanner = TileScanner::new()?;
        let mut registry = scanner.ingest(&self.config.input_dir, &self.backend)?;
        registry.finalize_all()?;

        for aggregate in registry.all() {
            info!(image = aggregate.id(), "loaded");
            if self.config.debug {
                debug!("{aggregate}");
                for tile in aggregate.tiles() {
                    debug!(
                        path = %tile.locator().display(),
                        x = tile.x_pos(),
                        y = tile.y_pos(),
                        width = tile.width(),
                        height = tile.height(),
                        "tile"
                    );
                }
            }
        }

        Ok(registry)
    }

    /// Run the whole pipeline
    ///
    /// # Errors
    ///
    /// Returns the first failure; nothing after it is processed
    pub fn process(&mut self) -> Result<ImageRegistry<B::Handle>> {
        let registry = self.load()?;

        if !self.config.output.any() {
            return Ok(registry);
        }

        let writer = MosaicWriter::new(
            &self.backend,
            &self.config.output_dir,
            self.config.output,
        );
        writer.prepare()?;

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(registry.len());
        }

        for aggregate in registry.all() {
            if let Some(ref pm) = self.progress_manager {
                pm.start_mosaic(aggregate.id());
            }

            writer.write(aggregate, self.progress_manager.as_ref())?;

            if let Some(ref pm) = self.progress_manager {
                pm.complete_mosaic();
            }
        }

        if let Some(ref pm) = self.progress_manager {
            pm.finish();
        }

        Ok(registry)
    }
}
