//! Directory scanning and tile file-name parsing
//!
//! Tile files are named `<id> @(<x>|<y>).<ext>`, where `id` is lowercase hex
//! with hyphens and `x`/`y` give the tile origin in pixels. Every regular file
//! in the input directory must follow this pattern except the skip-listed
//! operating system artifact; anything else aborts the run.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::debug;

use crate::io::configuration::{SKIPPED_FILE_NAME, TILE_FILE_PATTERN};
use crate::io::error::{MosaicError, Result, fs_error};
use crate::io::raster::RasterBackend;
use crate::mosaic::{ImageRegistry, TileRecord};

/// Identifier and origin parsed from a tile file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileName {
    /// Mosaic identifier
    pub id: String,
    /// Horizontal offset
    pub x_pos: u32,
    /// Vertical offset
    pub y_pos: u32,
}

/// Parses tile file names and loads tile directories
#[derive(Debug, Clone)]
pub struct TileScanner {
    pattern: Regex,
}

impl TileScanner {
    /// Compile the tile file-name pattern
    ///
    /// # Errors
    ///
    /// Returns an error if the built-in pattern fails to compile
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(TILE_FILE_PATTERN)?,
        })
    }

    /// Parse a file name
    ///
    /// Returns `Ok(None)` for the skip-listed file name.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFileName` if the name does not follow the tile pattern
    /// or a coordinate does not fit in `u32`
    pub fn parse(&self, file_name: &str) -> Result<Option<TileName>> {
        if file_name == SKIPPED_FILE_NAME {
            return Ok(None);
        }

        let invalid = || MosaicError::InvalidFileName {
            name: file_name.to_string(),
        };

        let captures = self.pattern.captures(file_name).ok_or_else(invalid)?;
        let (Some(id), Some(x), Some(y)) = (captures.get(1), captures.get(2), captures.get(3))
        else {
            return Err(invalid());
        };

        Ok(Some(TileName {
            id: id.as_str().to_string(),
            x_pos: x.as_str().parse::<u32>().ok().ok_or_else(invalid)?,
            y_pos: y.as_str().parse::<u32>().ok().ok_or_else(invalid)?,
        }))
    }

    /// Regular files of `dir`, ordered by file name
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or an entry cannot be read
    pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(dir).map_err(fs_error(dir, "read directory"))? {
            let entry = entry.map_err(fs_error(dir, "read directory entry"))?;
            let file_type = entry
                .file_type()
                .map_err(fs_error(entry.path(), "read file type"))?;
            if file_type.is_file() {
                files.push(entry.path());
            }
        }
        files.sort();
        Ok(files)
    }

    /// Load every tile in `dir` into a registry grouped by identifier
    ///
    /// Aggregates are returned as ingested; post-processing is left to the
    /// caller.
    ///
    /// # Errors
    ///
    /// Returns the first file-name, decode, or insertion failure
    pub fn ingest<B: RasterBackend>(
        &self,
        dir: &Path,
        backend: &B,
    ) -> Result<ImageRegistry<B::Handle>> {
        let mut registry = ImageRegistry::new();

        for path in Self::list_files(dir)? {
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();

            let Some(name) = self.parse(&file_name)? else {
                continue;
            };

            debug!(file = %file_name, "loading");

            let handle = backend.load(&path)?;
            let width = backend.width(&handle);
            let height = backend.height(&handle);
            let record = TileRecord::new(path, name.x_pos, name.y_pos, width, height, handle)?;

            registry.get_or_create(&name.id)?.add_tile(record)?;
        }

        Ok(registry)
    }
}
