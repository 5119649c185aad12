//! Mosaic reconstruction from positioned tile files
//!
//! Tiles named `<id> @(<x>|<y>).<ext>` are grouped by identifier, their grid
//! shape is inferred purely from tile origins, and the grid is checked for
//! completeness and exact contiguity before any pixels are composited. Any
//! inconsistency aborts the run; no best-effort mosaic is ever produced.

#![forbid(unsafe_code)]

/// Input/output, pixel handling, configuration and error handling
pub mod io;
/// Tile records, aggregates, grid inference and the identifier registry
pub mod mosaic;

pub use io::error::{MosaicError, Result};
