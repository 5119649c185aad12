//! Everything around the grid core: files, pixels, output and the CLI

/// Command-line interface and run orchestration
pub mod cli;
/// Run constants and configuration
pub mod configuration;
/// Error types and context helpers
pub mod error;
/// Directory scanning and tile file-name parsing
pub mod ingest;
/// Diagnostic logging setup
pub mod logging;
/// Compositing and encoding of validated mosaics
pub mod output;
/// Output-stage progress display
pub mod progress;
/// Pixel-buffer collaborator interface and implementation
pub mod raster;
