//! Compositing and encoding of validated mosaics

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::io::configuration::{
    COMPRESSED_OUTPUT_EXTENSION, FULL_OUTPUT_EXTENSION, JPEG_QUALITY, OutputOptions,
};
use crate::io::error::{Result, fs_error, invalid_argument};
use crate::io::progress::{OutputStage, ProgressManager};
use crate::io::raster::{FullSaveOptions, RasterBackend};
use crate::mosaic::ImageAggregate;

/// Path of the lossless output for `id`
pub fn full_output_path(output_dir: &Path, id: &str) -> PathBuf {
    output_dir.join(format!("{id}.{FULL_OUTPUT_EXTENSION}"))
}

/// Path of the compressed output for `id` at `size`
pub fn compressed_output_path(output_dir: &Path, id: &str, size: u32) -> PathBuf {
    output_dir.join(format!("{id} (x{size}).{COMPRESSED_OUTPUT_EXTENSION}"))
}

/// Writes validated mosaics through a [`RasterBackend`]
pub struct MosaicWriter<'a, B: RasterBackend> {
    backend: &'a B,
    output_dir: &'a Path,
    options: OutputOptions,
}

impl<'a, B: RasterBackend> MosaicWriter<'a, B> {
    /// Create a writer targeting `output_dir`
    pub const fn new(backend: &'a B, output_dir: &'a Path, options: OutputOptions) -> Self {
        Self {
            backend,
            output_dir,
            options,
        }
    }

    /// Create the output directory if needed
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created
    pub fn prepare(&self) -> Result<()> {
        fs::create_dir_all(self.output_dir).map_err(fs_error(self.output_dir, "create directory"))
    }

    /// Join, crop and encode one mosaic
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the aggregate has not been validated, or
    /// the first compositing or encoding failure
    pub fn write(
        &self,
        aggregate: &ImageAggregate<B::Handle>,
        progress: Option<&ProgressManager>,
    ) -> Result<()> {
        let id = aggregate.id();
        let (Some(shape), Some(width), Some(height), true) = (
            aggregate.grid(),
            aggregate.width(),
            aggregate.height(),
            aggregate.is_validated(),
        ) else {
            return Err(invalid_argument(
                "aggregate",
                &id,
                &"mosaic must be validated before output",
            ));
        };
        let report = |stage: OutputStage| {
            if let Some(progress) = progress {
                progress.stage(stage);
            }
        };

        report(OutputStage::Joining);
        let joined = self.backend.join_grid(&aggregate.handles(), shape.columns)?;
        info!(image = id, "joined");

        report(OutputStage::Cropping);
        let full = self.backend.crop(&joined, 0, 0, width, height)?;
        drop(joined);
        info!(image = id, width, height, "cropped");

        if self.options.save_full {
            report(OutputStage::SavingFull);
            let path = full_output_path(self.output_dir, id);
            let full_options = FullSaveOptions {
                pyramid: self.options.pyramid,
            };
            self.backend.save_full(&full, &path, full_options)?;
            info!(image = id, path = %path.display(), "saved (full)");
        }

        if self.options.save_compressed {
            report(OutputStage::SavingCompressed);
            let size = self.options.compressed_size;
            let path = compressed_output_path(self.output_dir, id, size);
            self.backend
                .save_compressed(&full, &path, size, JPEG_QUALITY)?;
            info!(image = id, path = %path.display(), "saved (compressed)");
        }

        Ok(())
    }
}
