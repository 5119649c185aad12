//! Grid shape inference and structural validation
//!
//! In a well-formed grid every tile sharing an `x_pos` sits in the same
//! column, and each row contributes exactly one tile to that column. Counting
//! tiles per `x_pos` therefore yields the row count at every populated offset,
//! and counting per `y_pos` yields the column count. Any disagreement between
//! populated offsets means the tiles do not form a regular grid.
//!
//! All functions here report failures without image context; the owning
//! aggregate attaches its identifier.

use ndarray::{Array1, ArrayView1};

use crate::io::error::{Axis, GridError, IntegrityFault};
use crate::mosaic::tile::TileRecord;

/// Rows and columns of a reconstructed grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    /// Tiles per row
    pub columns: usize,
    /// Tiles per column
    pub rows: usize,
}

impl GridShape {
    /// Number of cells in the grid, `None` on overflow
    pub const fn cells(&self) -> Option<usize> {
        self.columns.checked_mul(self.rows)
    }
}

/// Single non-zero count shared by every populated offset
///
/// # Errors
///
/// Returns `AmbiguousShape` at the first populated offset whose count differs
/// from the first populated offset, or `NoTiles` when every count is zero
pub fn common_value(
    frequencies: ArrayView1<'_, usize>,
    axis: Axis,
) -> Result<usize, IntegrityFault> {
    let mut common = None;

    for (position, &count) in frequencies.iter().enumerate() {
        if count == 0 {
            continue;
        }
        match common {
            None => common = Some(count),
            Some(expected) if expected != count => {
                return Err(IntegrityFault::AmbiguousShape {
                    axis,
                    position,
                    expected,
                    found: count,
                });
            }
            Some(_) => {}
        }
    }

    common.ok_or(IntegrityFault::NoTiles { axis })
}

/// Count tiles per `x_pos` over `[0, width)` and per `y_pos` over `[0, height)`
///
/// The histograms are sized by the mosaic, so the mosaic may be no larger than
/// its tiles laid end to end along each axis.
///
/// # Errors
///
/// Returns `UncoveredExtent` if the mosaic exceeds what its tiles can span,
/// `OutOfBounds` if a tile origin lies outside the mosaic, or a resource error
/// if a histogram cannot be allocated
pub fn position_histograms<H>(
    tiles: &[TileRecord<H>],
    width: u32,
    height: u32,
) -> Result<(Array1<usize>, Array1<usize>), GridError> {
    let spanned_width: u64 = tiles.iter().map(|tile| u64::from(tile.width())).sum();
    let spanned_height: u64 = tiles.iter().map(|tile| u64::from(tile.height())).sum();
    if u64::from(width) > spanned_width || u64::from(height) > spanned_height {
        return Err(IntegrityFault::UncoveredExtent { width, height }.into());
    }

    let mut by_x_pos = zeroed_histogram(width)?;
    let mut by_y_pos = zeroed_histogram(height)?;

    for tile in tiles {
        let out_of_bounds = || IntegrityFault::OutOfBounds {
            x: tile.x_pos(),
            y: tile.y_pos(),
            width,
            height,
        };
        *by_x_pos
            .get_mut(tile.x_pos() as usize)
            .ok_or_else(out_of_bounds)? += 1;
        *by_y_pos
            .get_mut(tile.y_pos() as usize)
            .ok_or_else(out_of_bounds)? += 1;
    }

    Ok((by_x_pos, by_y_pos))
}

fn zeroed_histogram(len: u32) -> Result<Array1<usize>, GridError> {
    let len = len as usize;
    let mut counts = Vec::new();
    counts
        .try_reserve_exact(len)
        .map_err(|source| GridError::Resource {
            operation: "position histogram",
            source,
        })?;
    counts.resize(len, 0);
    Ok(Array1::from_vec(counts))
}

/// Infer the grid shape of tiles covering a `width × height` mosaic
///
/// Columns come from the `y_pos` counts and rows from the `x_pos` counts.
///
/// # Errors
///
/// Returns the failure from [`position_histograms`] or [`common_value`]
pub fn infer_shape<H>(
    tiles: &[TileRecord<H>],
    width: u32,
    height: u32,
) -> Result<GridShape, GridError> {
    let (by_x_pos, by_y_pos) = position_histograms(tiles, width, height)?;

    let columns = common_value(by_y_pos.view(), Axis::Y)?;
    let rows = common_value(by_x_pos.view(), Axis::X)?;

    Ok(GridShape { columns, rows })
}

/// Require a tile anchored at the mosaic origin
///
/// # Errors
///
/// Returns `DetachedOrigin` naming the first tile in row-major order, or
/// `EmptyImage` if there are no tiles
pub fn check_origin<H>(tiles: &[TileRecord<H>]) -> Result<(), IntegrityFault> {
    let first = tiles
        .iter()
        .map(TileRecord::row_major_key)
        .min()
        .ok_or(IntegrityFault::EmptyImage)?;
    match first {
        (0, 0) => Ok(()),
        (y, x) => Err(IntegrityFault::DetachedOrigin { x, y }),
    }
}

/// Require one tile per grid cell
///
/// # Errors
///
/// Returns `MissingTiles` when the cell count differs from `tile_count`
pub fn check_completeness(shape: GridShape, tile_count: usize) -> Result<(), IntegrityFault> {
    if shape.cells() == Some(tile_count) {
        Ok(())
    } else {
        Err(IntegrityFault::MissingTiles {
            columns: shape.columns,
            rows: shape.rows,
            tiles: tile_count,
        })
    }
}

/// Require row and column neighbours to abut exactly
///
/// `tiles` must be in row-major order. Each adjacent pair sharing `x_pos` must
/// stack vertically without gap or overlap, and each pair sharing `y_pos` must
/// sit side by side the same way. Pairs sharing neither are not checked.
///
/// # Errors
///
/// Returns `InconsistentGrid` for the first offending pair in scan order
pub fn check_contiguity<H>(tiles: &[TileRecord<H>]) -> Result<(), IntegrityFault> {
    for pair in tiles.windows(2) {
        let [previous, current] = pair else {
            continue;
        };

        if previous.x_pos() == current.x_pos() {
            let bottom = previous.bottom().ok_or(IntegrityFault::ExtentOverflow {
                x: previous.x_pos(),
                y: previous.y_pos(),
            })?;
            if bottom != current.y_pos() {
                return Err(inconsistent(previous, current, Axis::X));
            }
        }

        if previous.y_pos() == current.y_pos() {
            let right = previous.right().ok_or(IntegrityFault::ExtentOverflow {
                x: previous.x_pos(),
                y: previous.y_pos(),
            })?;
            if right != current.x_pos() {
                return Err(inconsistent(previous, current, Axis::Y));
            }
        }
    }

    Ok(())
}

const fn inconsistent<H>(
    previous: &TileRecord<H>,
    current: &TileRecord<H>,
    shared: Axis,
) -> IntegrityFault {
    IntegrityFault::InconsistentGrid {
        previous: previous.origin(),
        current: current.origin(),
        shared,
    }
}
