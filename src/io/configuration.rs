//! Run constants and the configuration threaded through a reconstruction run

use std::path::PathBuf;

// Input naming contract
/// Tile file name pattern: `<id> @(<x>|<y>).<ext>`
pub const TILE_FILE_PATTERN: &str = r"^([a-f0-9-]+) @\(([0-9]+)\|([0-9]+)\)\.([A-Za-z0-9]+)$";
/// Operating system artifact silently ignored during directory scans
pub const SKIPPED_FILE_NAME: &str = ".DS_Store";

// Output settings
/// Default bounding box edge for compressed output
pub const DEFAULT_COMPRESSED_SIZE: u32 = 10_000;
/// JPEG quality used for compressed output
pub const JPEG_QUALITY: u8 = 100;
/// Resolution written into full TIFF output (dots per inch)
pub const FULL_RESOLUTION_DPI: u32 = 300;
/// Pyramid levels stop once the longest edge fits within this many pixels
pub const PYRAMID_MIN_EDGE: u32 = 256;
/// Extension of full-resolution output
pub const FULL_OUTPUT_EXTENSION: &str = "tiff";
/// Extension of compressed output
pub const COMPRESSED_OUTPUT_EXTENSION: &str = "jpg";

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;

/// Which encodings to write for every validated mosaic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputOptions {
    /// Write the lossless TIFF encoding
    pub save_full: bool,
    /// Add reduced-resolution pages to the TIFF
    pub pyramid: bool,
    /// Write the downscaled JPEG encoding
    pub save_compressed: bool,
    /// Bounding box edge of the compressed output
    pub compressed_size: u32,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            save_full: false,
            pyramid: false,
            save_compressed: false,
            compressed_size: DEFAULT_COMPRESSED_SIZE,
        }
    }
}

impl OutputOptions {
    /// Whether the output stage has anything to write
    pub const fn any(&self) -> bool {
        self.save_full || self.save_compressed
    }
}

/// Complete configuration of one reconstruction run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Directory scanned for tile files
    pub input_dir: PathBuf,
    /// Directory receiving the reconstructed mosaics
    pub output_dir: PathBuf,
    /// Emit per-tile diagnostics
    pub debug: bool,
    /// Display progress bars during output
    pub show_progress: bool,
    /// Encodings to produce
    pub output: OutputOptions,
}
