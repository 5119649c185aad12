//! Positioned tile records

use std::path::{Path, PathBuf};

use crate::io::error::{Result, invalid_argument};

/// One source tile: where it came from, where it goes, and its pixels
///
/// Dimensions are cached at construction so grid inference never needs to
/// query the pixel buffer again. The handle is released when the record drops.
#[derive(Debug)]
pub struct TileRecord<H> {
    locator: PathBuf,
    x_pos: u32,
    y_pos: u32,
    width: u32,
    height: u32,
    handle: H,
}

impl<H> TileRecord<H> {
    /// Create a tile record
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `width` or `height` is zero
    pub fn new(
        locator: impl Into<PathBuf>,
        x_pos: u32,
        y_pos: u32,
        width: u32,
        height: u32,
        handle: H,
    ) -> Result<Self> {
        if width == 0 {
            return Err(invalid_argument("width", &width, &"must be positive"));
        }
        if height == 0 {
            return Err(invalid_argument("height", &height, &"must be positive"));
        }

        Ok(Self {
            locator: locator.into(),
            x_pos,
            y_pos,
            width,
            height,
            handle,
        })
    }

    /// Source file of this tile
    pub fn locator(&self) -> &Path {
        &self.locator
    }

    /// Horizontal offset of the top-left pixel
    pub const fn x_pos(&self) -> u32 {
        self.x_pos
    }

    /// Vertical offset of the top-left pixel
    pub const fn y_pos(&self) -> u32 {
        self.y_pos
    }

    /// Top-left offset as `(x, y)`
    pub const fn origin(&self) -> (u32, u32) {
        (self.x_pos, self.y_pos)
    }

    /// Intrinsic width in pixels
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Intrinsic height in pixels
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Decoded pixel buffer
    pub const fn handle(&self) -> &H {
        &self.handle
    }

    /// Row-major sort key
    pub(crate) const fn row_major_key(&self) -> (u32, u32) {
        (self.y_pos, self.x_pos)
    }

    /// Offset one past the right edge, `None` on overflow
    pub const fn right(&self) -> Option<u32> {
        self.x_pos.checked_add(self.width)
    }

    /// Offset one past the bottom edge, `None` on overflow
    pub const fn bottom(&self) -> Option<u32> {
        self.y_pos.checked_add(self.height)
    }
}
