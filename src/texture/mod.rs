//! Drawing media and their shadow profiles.

/// The five media and their constant profiles.
pub mod profile;
/// Resolving a texture request to a profile.
pub mod select;
