/// Convenience result type used across scribble.
pub type ScribbleResult<T> = Result<T, ScribbleError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum ScribbleError {
    /// A scene asset could not be read or parsed. Aborts that load; no partial scene is drawn.
    #[error("asset load error: {0}")]
    AssetLoad(String),

    /// A texture name that is not one of the five known media.
    #[error("invalid texture: {0}")]
    InvalidTexture(String),

    /// Invalid user-provided options or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while rasterizing, encoding or writing frames.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScribbleError {
    /// Build a [`ScribbleError::AssetLoad`] value.
    pub fn asset_load(msg: impl Into<String>) -> Self {
        Self::AssetLoad(msg.into())
    }

    /// Build a [`ScribbleError::InvalidTexture`] value.
    pub fn invalid_texture(name: impl Into<String>) -> Self {
        Self::InvalidTexture(name.into())
    }

    /// Build a [`ScribbleError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ScribbleError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`ScribbleError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
