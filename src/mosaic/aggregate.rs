//! Tiles sharing one identifier and the post-processing that validates them

use std::collections::HashSet;
use std::fmt;

use tracing::debug;

use crate::io::error::{IntegrityFault, MosaicError, Result, WithImage, invalid_argument};
use crate::mosaic::grid::{self, GridShape};
use crate::mosaic::tile::TileRecord;

/// Every tile of one mosaic plus the geometry derived from them
///
/// Dimensions and grid shape stay unset until post-processing computes them.
/// After [`ImageAggregate::finalize`] succeeds the tiles are in row-major
/// order and partition the `width × height` rectangle into a regular grid.
#[derive(Debug)]
pub struct ImageAggregate<H> {
    id: String,
    tiles: Vec<TileRecord<H>>,
    origins: HashSet<(u32, u32)>,
    dimensions: Option<(u32, u32)>,
    grid: Option<GridShape>,
    validated: bool,
}

impl<H> ImageAggregate<H> {
    /// Create an empty aggregate
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `id` is empty
    pub fn new(id: &str) -> Result<Self> {
        if id.is_empty() {
            return Err(invalid_argument("id", &id, &"must not be empty"));
        }

        Ok(Self {
            id: id.to_string(),
            tiles: Vec::new(),
            origins: HashSet::new(),
            dimensions: None,
            grid: None,
            validated: false,
        })
    }

    /// Identifier shared by all tiles
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Tiles in their current order
    pub fn tiles(&self) -> &[TileRecord<H>] {
        &self.tiles
    }

    /// Pixel buffers in their current order
    pub fn handles(&self) -> Vec<&H> {
        self.tiles.iter().map(TileRecord::handle).collect()
    }

    /// Number of tiles
    pub const fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether no tile has been added
    pub const fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Overall width, once computed
    pub fn width(&self) -> Option<u32> {
        self.dimensions.map(|(width, _)| width)
    }

    /// Overall height, once computed
    pub fn height(&self) -> Option<u32> {
        self.dimensions.map(|(_, height)| height)
    }

    /// Grid shape, once inferred
    pub const fn grid(&self) -> Option<GridShape> {
        self.grid
    }

    /// Grid column count, once inferred
    pub fn grid_cols(&self) -> Option<usize> {
        self.grid.map(|shape| shape.columns)
    }

    /// Grid row count, once inferred
    pub fn grid_rows(&self) -> Option<usize> {
        self.grid.map(|shape| shape.rows)
    }

    /// Whether [`ImageAggregate::finalize`] has succeeded since the last change
    pub const fn is_validated(&self) -> bool {
        self.validated
    }

    /// Append a tile
    ///
    /// Appending invalidates previously computed geometry.
    ///
    /// # Errors
    ///
    /// Returns an integrity error if another tile already occupies the same
    /// origin, or a resource error if storage cannot grow
    pub fn add_tile(&mut self, record: TileRecord<H>) -> Result<()> {
        let origin = record.origin();
        if self.origins.contains(&origin) {
            return Err(IntegrityFault::DuplicateOrigin {
                x: origin.0,
                y: origin.1,
            })
            .for_image(&self.id);
        }

        self.tiles
            .try_reserve(1)
            .map_err(|source| MosaicError::Resource {
                operation: "tile storage",
                source,
            })?;
        self.origins
            .try_reserve(1)
            .map_err(|source| MosaicError::Resource {
                operation: "tile origin index",
                source,
            })?;

        self.origins.insert(origin);
        self.tiles.push(record);
        self.dimensions = None;
        self.grid = None;
        self.validated = false;
        Ok(())
    }

    /// Order tiles by `y_pos`, then `x_pos`
    pub fn sort(&mut self) {
        self.tiles.sort_by_key(TileRecord::row_major_key);
    }

    /// Derive overall dimensions from the bottom-right tile
    ///
    /// Sorts first. The result is provisional until the grid checks pass.
    ///
    /// # Errors
    ///
    /// Returns an integrity error for an empty aggregate or if the extent
    /// overflows
    pub fn compute_dimensions(&mut self) -> Result<(u32, u32)> {
        self.sort();

        let last = self
            .tiles
            .last()
            .ok_or(IntegrityFault::EmptyImage)
            .for_image(&self.id)?;

        let overflow = IntegrityFault::ExtentOverflow {
            x: last.x_pos(),
            y: last.y_pos(),
        };
        let width = last.right().ok_or_else(|| overflow.clone());
        let height = last.bottom().ok_or(overflow);
        let dimensions = (width.for_image(&self.id)?, height.for_image(&self.id)?);

        self.dimensions = Some(dimensions);
        Ok(dimensions)
    }

    /// Infer grid shape and require one tile per cell
    ///
    /// Computes dimensions first if they are not yet known.
    ///
    /// # Errors
    ///
    /// Returns an integrity error if no tile sits at the origin, the shape is
    /// ambiguous, the aggregate is empty, a tile lies outside the mosaic, or
    /// tiles are missing; a resource error if the histograms cannot be
    /// allocated
    pub fn infer_and_validate_grid(&mut self) -> Result<GridShape> {
        let (width, height) = match self.dimensions {
            Some(dimensions) => dimensions,
            None => self.compute_dimensions()?,
        };

        grid::check_origin(&self.tiles).for_image(&self.id)?;
        let shape = grid::infer_shape(&self.tiles, width, height).for_image(&self.id)?;
        grid::check_completeness(shape, self.tiles.len()).for_image(&self.id)?;

        self.grid = Some(shape);
        Ok(shape)
    }

    /// Require row and column neighbours to abut exactly
    ///
    /// Sorts first.
    ///
    /// # Errors
    ///
    /// Returns an integrity error for the first gap or overlap found
    pub fn validate_contiguity(&mut self) -> Result<()> {
        self.sort();
        grid::check_contiguity(&self.tiles).for_image(&self.id)
    }

    /// Run the complete post-processing pipeline
    ///
    /// # Errors
    ///
    /// Returns the first integrity error found; geometry is cleared on failure
    pub fn finalize(&mut self) -> Result<()> {
        debug!(image = %self.id, tiles = self.tiles.len(), "postprocessing");

        let outcome = self.run_checks();
        self.validated = outcome.is_ok();
        if !self.validated {
            self.dimensions = None;
            self.grid = None;
        }
        outcome
    }

    fn run_checks(&mut self) -> Result<()> {
        self.compute_dimensions()?;
        self.infer_and_validate_grid()?;
        self.validate_contiguity()
    }
}

impl<H> fmt::Display for ImageAggregate<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)?;
        if let Some((width, height)) = self.dimensions {
            write!(f, " [{width} x {height}]")?;
        }
        if let Some(shape) = self.grid {
            write!(f, " grid {} x {}", shape.columns, shape.rows)?;
        }
        write!(f, " ({} tiles)", self.tiles.len())
    }
}
