//! Error types and context management for mosaic reconstruction

use std::fmt;
use std::path::PathBuf;

/// Broad failure category used to decide how an error is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or missing input to a core operation
    InvalidArgument,
    /// Reconstructed grid is inconsistent
    Integrity,
    /// Internal container could not grow
    Resource,
    /// Failure surfaced by the image load, compose or encode layer
    Collaborator,
}

/// Position axis of a tile origin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Horizontal offset (`x_pos`)
    X,
    /// Vertical offset (`y_pos`)
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => f.write_str("x"),
            Self::Y => f.write_str("y"),
        }
    }
}

/// Structural problem found while reconstructing a tile grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityFault {
    /// Two populated offsets disagree on how many tiles they hold
    AmbiguousShape {
        /// Axis whose offsets were being counted
        axis: Axis,
        /// Offset holding the mismatching count
        position: usize,
        /// Count established by the first populated offset
        expected: usize,
        /// Count found at `position`
        found: usize,
    },

    /// No offset along the axis holds a tile
    NoTiles {
        /// Axis whose offsets were being counted
        axis: Axis,
    },

    /// Aggregate holds no tiles at all
    EmptyImage,

    /// Inferred grid cell count differs from the number of tiles
    MissingTiles {
        /// Inferred column count
        columns: usize,
        /// Inferred row count
        rows: usize,
        /// Tiles actually present
        tiles: usize,
    },

    /// Neighbouring tiles leave a gap or overlap
    InconsistentGrid {
        /// Origin of the earlier tile in row-major order
        previous: (u32, u32),
        /// Origin of the later tile
        current: (u32, u32),
        /// Coordinate the pair shares
        shared: Axis,
    },

    /// A second tile claims an origin already in use
    DuplicateOrigin {
        /// Horizontal offset
        x: u32,
        /// Vertical offset
        y: u32,
    },

    /// Tile origin lies outside the computed mosaic bounds
    OutOfBounds {
        /// Horizontal offset
        x: u32,
        /// Vertical offset
        y: u32,
        /// Computed mosaic width
        width: u32,
        /// Computed mosaic height
        height: u32,
    },

    /// Tile origin plus its extent does not fit in `u32`
    ExtentOverflow {
        /// Horizontal offset
        x: u32,
        /// Vertical offset
        y: u32,
    },

    /// No tile sits at `(0, 0)`; the first tile in row-major order is given
    DetachedOrigin {
        /// Horizontal offset
        x: u32,
        /// Vertical offset
        y: u32,
    },

    /// Mosaic is wider or taller than all of its tiles laid end to end
    UncoveredExtent {
        /// Computed mosaic width
        width: u32,
        /// Computed mosaic height
        height: u32,
    },
}

impl fmt::Display for IntegrityFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AmbiguousShape {
                axis,
                position,
                expected,
                found,
            } => write!(
                f,
                "ambiguous grid shape: {axis} offset {position} holds {found} tiles, expected {expected}"
            ),
            Self::NoTiles { axis } => write!(f, "no tiles found along the {axis} axis"),
            Self::EmptyImage => f.write_str("image has no tiles"),
            Self::MissingTiles {
                columns,
                rows,
                tiles,
            } => write!(
                f,
                "missing tiles: grid is {columns}x{rows} but only {tiles} tiles are present"
            ),
            Self::InconsistentGrid {
                previous,
                current,
                shared,
            } => write!(
                f,
                "inconsistent grid: tiles at ({}, {}) and ({}, {}) share {shared} but do not abut",
                previous.0, previous.1, current.0, current.1
            ),
            Self::DuplicateOrigin { x, y } => {
                write!(f, "duplicate tile origin ({x}, {y})")
            }
            Self::OutOfBounds {
                x,
                y,
                width,
                height,
            } => write!(
                f,
                "tile origin ({x}, {y}) lies outside the {width}x{height} mosaic"
            ),
            Self::ExtentOverflow { x, y } => {
                write!(f, "tile at ({x}, {y}) extends past the addressable range")
            }
            Self::DetachedOrigin { x, y } => {
                write!(f, "no tile at (0, 0); first tile is at ({x}, {y})")
            }
            Self::UncoveredExtent { width, height } => write!(
                f,
                "{width}x{height} mosaic is larger than its tiles can cover"
            ),
        }
    }
}

/// Failure of a grid computation that needs working storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Tiles do not form a regular grid
    Fault(IntegrityFault),
    /// Working storage could not be allocated
    Resource {
        /// Container that failed to grow
        operation: &'static str,
        /// Underlying allocation failure
        source: std::collections::TryReserveError,
    },
}

impl From<IntegrityFault> for GridError {
    fn from(fault: IntegrityFault) -> Self {
        Self::Fault(fault)
    }
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fault(fault) => write!(f, "{fault}"),
            Self::Resource { operation, source } => {
                write!(f, "cannot allocate {operation}: {source}")
            }
        }
    }
}

/// Main error type for all mosaic operations
#[derive(Debug)]
pub enum MosaicError {
    /// Core operation received malformed input
    InvalidArgument {
        /// Name of the invalid argument
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Tile file name does not follow `<id> @(<x>|<y>).<ext>`
    InvalidFileName {
        /// Offending file name
        name: String,
    },

    /// Grid reconstruction found an inconsistency
    Integrity {
        /// Identifier of the mosaic being processed
        image: String,
        /// What was wrong with the grid
        fault: IntegrityFault,
    },

    /// Internal storage could not be grown
    Resource {
        /// Container that failed to grow
        operation: &'static str,
        /// Underlying allocation failure
        source: std::collections::TryReserveError,
    },

    /// Failed to decode a tile file
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to encode an output image
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// Failed to encode a TIFF output
    TiffExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying TIFF encoder error
        source: tiff::TiffError,
    },

    /// Joining or cropping pixel buffers failed
    Composite {
        /// Operation that failed
        operation: &'static str,
        /// Description of the failure
        reason: String,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Built-in file name pattern failed to compile
    Pattern {
        /// Underlying regex error
        source: regex::Error,
    },
}

impl MosaicError {
    /// Category of the failure
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument { .. } | Self::InvalidFileName { .. } | Self::Pattern { .. } => {
                ErrorKind::InvalidArgument
            }
            Self::Integrity { .. } => ErrorKind::Integrity,
            Self::Resource { .. } => ErrorKind::Resource,
            Self::ImageLoad { .. }
            | Self::ImageExport { .. }
            | Self::TiffExport { .. }
            | Self::Composite { .. }
            | Self::FileSystem { .. } => ErrorKind::Collaborator,
        }
    }

    /// Integrity fault carried by this error, if any
    pub const fn fault(&self) -> Option<&IntegrityFault> {
        match self {
            Self::Integrity { fault, .. } => Some(fault),
            _ => None,
        }
    }
}

impl fmt::Display for MosaicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid argument '{parameter}' = '{value}': {reason}")
            }
            Self::InvalidFileName { name } => {
                write!(f, "Filename does not match the tile pattern: '{name}'")
            }
            Self::Integrity { image, fault } => {
                write!(f, "Image '{image}': {fault}")
            }
            Self::Resource { operation, source } => {
                write!(f, "Cannot grow storage for {operation}: {source}")
            }
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::TiffExport { path, source } => {
                write!(f, "Failed to write TIFF '{}': {source}", path.display())
            }
            Self::Composite { operation, reason } => {
                write!(f, "Compositing error in {operation}: {reason}")
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::Pattern { source } => {
                write!(f, "Invalid file name pattern: {source}")
            }
        }
    }
}

impl std::error::Error for MosaicError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::TiffExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            Self::Resource { source, .. } => Some(source),
            Self::Pattern { source } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for mosaic results
pub type Result<T> = std::result::Result<T, MosaicError>;

/// Attaches the owning image identifier to grid failures
pub trait WithImage<T> {
    /// Convert a grid failure into a crate error for `image`
    ///
    /// Faults become integrity errors carrying `image`; allocation failures
    /// become resource errors.
    ///
    /// # Errors
    ///
    /// Propagates the original failure converted to [`MosaicError`]
    fn for_image(self, image: &str) -> Result<T>;
}

impl<T, E: Into<GridError>> WithImage<T> for std::result::Result<T, E> {
    fn for_image(self, image: &str) -> Result<T> {
        self.map_err(|error| match error.into() {
            GridError::Fault(fault) => MosaicError::Integrity {
                image: image.to_string(),
                fault,
            },
            GridError::Resource { operation, source } => {
                MosaicError::Resource { operation, source }
            }
        })
    }
}

impl From<regex::Error> for MosaicError {
    fn from(err: regex::Error) -> Self {
        Self::Pattern { source: err }
    }
}

/// Create an invalid argument error
pub fn invalid_argument(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> MosaicError {
    MosaicError::InvalidArgument {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a compositing error
pub fn composite_error(operation: &'static str, reason: &impl ToString) -> MosaicError {
    MosaicError::Composite {
        operation,
        reason: reason.to_string(),
    }
}

/// Create a file system error bound to `path`
pub fn fs_error(
    path: impl Into<PathBuf>,
    operation: &'static str,
) -> impl FnOnce(std::io::Error) -> MosaicError {
    let path = path.into();
    move |source| MosaicError::FileSystem {
        path,
        operation,
        source,
    }
}
