//! Tile grouping and grid reconstruction
//!
//! This module contains the core of the crate:
//! - Positioned tile records
//! - Per-identifier aggregates and their post-processing
//! - Grid shape inference and validation
//! - The identifier registry used during ingestion

/// Per-identifier tile collections
pub mod aggregate;
/// Grid shape inference, completeness and contiguity checks
pub mod grid;
/// Identifier to aggregate mapping
pub mod registry;
/// Positioned tile records
pub mod tile;

pub use aggregate::ImageAggregate;
pub use grid::GridShape;
pub use registry::ImageRegistry;
pub use tile::TileRecord;
