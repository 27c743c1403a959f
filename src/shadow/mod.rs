//! Randomized shadow strokes that give each medium its texture.

/// Shadow generation.
pub mod generate;
