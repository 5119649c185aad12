//! Pixel-buffer collaborator: decoding, compositing and encoding
//!
//! The grid logic only needs tile dimensions; everything that touches pixels
//! sits behind [`RasterBackend`]. [`ImageBackend`] implements it with the
//! `image` crate for decoding, composition and JPEG output and the `tiff`
//! crate for BigTIFF output with optional reduced-resolution pages. Sources
//! with more than 8 bits per channel are composited and archived at 16 bits.

use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, ImageBuffer, Rgba, RgbaImage};
use tiff::encoder::colortype::{self, ColorType};
use tiff::encoder::compression::{Deflate, DeflateLevel};
use tiff::encoder::{Rational, TiffEncoder, TiffKindBig, TiffValue};
use tiff::tags::{ResolutionUnit, Tag};

use crate::io::configuration::{FULL_RESOLUTION_DPI, PYRAMID_MIN_EDGE};
use crate::io::error::{MosaicError, Result, composite_error, fs_error, invalid_argument};

/// Options for the lossless full-resolution encoding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FullSaveOptions {
    /// Append reduced-resolution pages after the full image
    pub pyramid: bool,
}

/// Image-processing operations the mosaic pipeline depends on
///
/// Handles are released by dropping them.
pub trait RasterBackend {
    /// Decoded pixel buffer
    type Handle;

    /// Decode a tile file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded
    fn load(&self, path: &Path) -> Result<Self::Handle>;

    /// Intrinsic width in pixels
    fn width(&self, handle: &Self::Handle) -> u32;

    /// Intrinsic height in pixels
    fn height(&self, handle: &Self::Handle) -> u32;

    /// Composite handles given in row-major order into one buffer
    ///
    /// # Errors
    ///
    /// Returns an error for a zero column count or an empty tile list
    fn join_grid(&self, tiles: &[&Self::Handle], columns: usize) -> Result<Self::Handle>;

    /// Extract a rectangle
    ///
    /// # Errors
    ///
    /// Returns an error if the rectangle is empty or exceeds the handle
    fn crop(
        &self,
        handle: &Self::Handle,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Result<Self::Handle>;

    /// Write the lossless archival encoding
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or encoded
    fn save_full(&self, handle: &Self::Handle, path: &Path, options: FullSaveOptions)
    -> Result<()>;

    /// Write a downscaled lossy encoding fitting `target_size × target_size`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or encoded
    fn save_compressed(
        &self,
        handle: &Self::Handle,
        path: &Path,
        target_size: u32,
        quality: u8,
    ) -> Result<()>;
}

/// [`RasterBackend`] built on the `image` and `tiff` crates
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageBackend;

impl ImageBackend {
    /// Create the backend
    pub const fn new() -> Self {
        Self
    }
}

/// Top-left placement of every tile plus the canvas size
///
/// Each tile sits right of its row predecessor and below its column
/// predecessor, so non-uniform cells never overlap.
pub fn grid_layout(sizes: &[(u32, u32)], columns: usize) -> (Vec<(u32, u32)>, u32, u32) {
    let columns = columns.max(1);
    let mut column_bottoms = vec![0_u32; columns];
    let mut placements = Vec::with_capacity(sizes.len());
    let mut canvas_width = 0_u32;
    let mut cursor_x = 0_u32;

    for (index, &(width, height)) in sizes.iter().enumerate() {
        let column = index % columns;
        if column == 0 {
            cursor_x = 0;
        }
        let Some(bottom) = column_bottoms.get_mut(column) else {
            continue;
        };

        placements.push((cursor_x, *bottom));
        cursor_x = cursor_x.saturating_add(width);
        *bottom = bottom.saturating_add(height);
        canvas_width = canvas_width.max(cursor_x);
    }

    let canvas_height = column_bottoms.iter().copied().max().unwrap_or(0);
    (placements, canvas_width, canvas_height)
}

impl RasterBackend for ImageBackend {
    type Handle = DynamicImage;

    fn load(&self, path: &Path) -> Result<DynamicImage> {
        image::open(path).map_err(|source| MosaicError::ImageLoad {
            path: path.to_path_buf(),
            source,
        })
    }

    fn width(&self, handle: &DynamicImage) -> u32 {
        handle.width()
    }

    fn height(&self, handle: &DynamicImage) -> u32 {
        handle.height()
    }

    fn join_grid(&self, tiles: &[&DynamicImage], columns: usize) -> Result<DynamicImage> {
        if columns == 0 {
            return Err(invalid_argument("columns", &columns, &"must be positive"));
        }
        if tiles.is_empty() {
            return Err(composite_error("join", &"no tiles to join"));
        }

        let sizes: Vec<(u32, u32)> = tiles.iter().map(|tile| tile.dimensions()).collect();
        let (placements, width, height) = grid_layout(&sizes, columns);
        let with_alpha = tiles.iter().any(|tile| tile.color().has_alpha());

        if tiles.iter().any(|tile| is_deep(tile)) {
            let mut canvas = ImageBuffer::<Rgba<u16>, Vec<u16>>::new(width, height);
            for (tile, &(x, y)) in tiles.iter().zip(&placements) {
                imageops::replace(&mut canvas, &tile.to_rgba16(), i64::from(x), i64::from(y));
            }
            let joined = DynamicImage::ImageRgba16(canvas);
            return Ok(if with_alpha {
                joined
            } else {
                DynamicImage::ImageRgb16(joined.to_rgb16())
            });
        }

        let mut canvas = RgbaImage::new(width, height);
        for (tile, &(x, y)) in tiles.iter().zip(&placements) {
            imageops::replace(&mut canvas, *tile, i64::from(x), i64::from(y));
        }
        let joined = DynamicImage::ImageRgba8(canvas);
        Ok(if with_alpha {
            joined
        } else {
            DynamicImage::ImageRgb8(joined.to_rgb8())
        })
    }

    fn crop(
        &self,
        handle: &DynamicImage,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Result<DynamicImage> {
        let fits_x = x
            .checked_add(width)
            .is_some_and(|right| right <= handle.width());
        let fits_y = y
            .checked_add(height)
            .is_some_and(|bottom| bottom <= handle.height());
        if !fits_x || !fits_y || width == 0 || height == 0 {
            return Err(composite_error(
                "crop",
                &format!(
                    "{width}x{height}+{x}+{y} does not fit a {}x{} image",
                    handle.width(),
                    handle.height()
                ),
            ));
        }

        Ok(handle.crop_imm(x, y, width, height))
    }

    fn save_full(
        &self,
        handle: &DynamicImage,
        path: &Path,
        options: FullSaveOptions,
    ) -> Result<()> {
        let file = File::create(path).map_err(fs_error(path, "create"))?;
        let tiff_error = |source| MosaicError::TiffExport {
            path: path.to_path_buf(),
            source,
        };

        let mut encoder = TiffEncoder::new_big(BufWriter::new(file)).map_err(tiff_error)?;
        let layout = PageLayout {
            with_alpha: handle.color().has_alpha(),
            deep: is_deep(handle),
        };

        write_level(&mut encoder, handle, layout, false).map_err(tiff_error)?;
        // Reduced pages are strip-organised like the full page; the encoder
        // has no tiled layout
        if options.pyramid {
            let mut level = next_pyramid_level(handle);
            while let Some(reduced) = level {
                write_level(&mut encoder, &reduced, layout, true).map_err(tiff_error)?;
                level = next_pyramid_level(&reduced);
            }
        }

        Ok(())
    }

    fn save_compressed(
        &self,
        handle: &DynamicImage,
        path: &Path,
        target_size: u32,
        quality: u8,
    ) -> Result<()> {
        if target_size == 0 {
            return Err(invalid_argument(
                "target_size",
                &target_size,
                &"must be positive",
            ));
        }

        let resized = handle
            .resize(target_size, target_size, FilterType::Lanczos3)
            .to_rgb8();

        let file = File::create(path).map_err(fs_error(path, "create"))?;
        let mut writer = BufWriter::new(file);

        JpegEncoder::new_with_quality(&mut writer, quality)
            .encode_image(&resized)
            .map_err(|source| MosaicError::ImageExport {
                path: path.to_path_buf(),
                source,
            })?;
        writer.flush().map_err(fs_error(path, "flush"))
    }
}

// Half-size copy, or `None` once the longest edge fits the floor
fn next_pyramid_level(image: &DynamicImage) -> Option<DynamicImage> {
    let (width, height) = image.dimensions();
    (width.max(height) > PYRAMID_MIN_EDGE).then(|| {
        image.resize_exact(
            (width / 2).max(1),
            (height / 2).max(1),
            FilterType::Triangle,
        )
    })
}

// More than 8 bits per channel; floating-point sources are narrowed to 16
fn is_deep(image: &DynamicImage) -> bool {
    let color = image.color();
    color.bytes_per_pixel() > color.channel_count()
}

// Sample layout shared by every page of one file
#[derive(Clone, Copy)]
struct PageLayout {
    with_alpha: bool,
    deep: bool,
}

fn write_level<W: Write + Seek>(
    encoder: &mut TiffEncoder<W, TiffKindBig>,
    level: &DynamicImage,
    layout: PageLayout,
    reduced: bool,
) -> tiff::TiffResult<()> {
    let (width, height) = level.dimensions();
    match (layout.deep, layout.with_alpha) {
        (true, true) => {
            let pixels = level.to_rgba16();
            write_page::<colortype::RGBA16, _>(encoder, width, height, pixels.as_raw(), reduced)
        }
        (true, false) => {
            let pixels = level.to_rgb16();
            write_page::<colortype::RGB16, _>(encoder, width, height, pixels.as_raw(), reduced)
        }
        (false, true) => {
            let pixels = level.to_rgba8();
            write_page::<colortype::RGBA8, _>(encoder, width, height, pixels.as_raw(), reduced)
        }
        (false, false) => {
            let pixels = level.to_rgb8();
            write_page::<colortype::RGB8, _>(encoder, width, height, pixels.as_raw(), reduced)
        }
    }
}

fn write_page<C, W>(
    encoder: &mut TiffEncoder<W, TiffKindBig>,
    width: u32,
    height: u32,
    pixels: &[C::Inner],
    reduced: bool,
) -> tiff::TiffResult<()>
where
    C: ColorType,
    [C::Inner]: TiffValue,
    W: Write + Seek,
{
    let mut page = encoder.new_image_with_compression::<C, _>(
        width,
        height,
        Deflate::with_level(DeflateLevel::Balanced),
    )?;
    page.resolution(
        ResolutionUnit::Inch,
        Rational {
            n: FULL_RESOLUTION_DPI,
            d: 1,
        },
    );
    // Marks the page as a reduced-resolution copy of the first one
    if reduced {
        page.encoder().write_tag(Tag::NewSubfileType, 1_u32)?;
    }
    page.write_data(pixels)
}
