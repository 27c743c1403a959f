//! Run configuration and the prepared sketch every output is rendered from.

/// JSON run configuration.
pub mod config;
/// Preparing, rendering and exporting one sketch.
pub mod sketch;
