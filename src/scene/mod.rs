//! Loading artwork into ordered strokes.

/// Preset artwork selection.
pub mod doodle;
/// SVG loading boundary.
pub mod loader;
/// The immutable stroke model.
pub mod shape;
