//! The render tree strokes are drawn into, and its timeline sampling.

/// Sampling the tree at a timeline position.
pub mod sample;
/// Elements, run tokens and mutations.
pub mod tree;
