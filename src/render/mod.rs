//! Offline output of the stage: SVG documents, rasterization and frame ranges.

/// Range rendering (chunked, optionally parallel) into a sink.
pub mod frames;
/// Per-medium grain filters.
pub mod filters;
/// SVG rasterization via resvg.
pub mod raster;
/// Still and animated SVG documents.
pub mod svg;
