use crate::foundation::error::{ScribbleError, ScribbleResult};
use crate::foundation::rng::RandomSource;
use crate::texture::profile::{Texture, TextureProfile};

/// What the caller asked for: a specific medium, or any of them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TextureRequest {
    /// Pick uniformly among all media.
    #[default]
    Random,
    /// Use exactly this medium.
    Named(Texture),
}

impl std::str::FromStr for TextureRequest {
    type Err = ScribbleError;

    fn from_str(s: &str) -> ScribbleResult<Self> {
        if s.trim().eq_ignore_ascii_case("random") {
            return Ok(Self::Random);
        }
        s.parse::<Texture>().map(Self::Named)
    }
}

impl TryFrom<String> for TextureRequest {
    type Error = ScribbleError;

    fn try_from(value: String) -> ScribbleResult<Self> {
        value.parse()
    }
}

impl From<TextureRequest> for String {
    fn from(value: TextureRequest) -> Self {
        value.to_string()
    }
}

impl std::fmt::Display for TextureRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Random => f.write_str("random"),
            Self::Named(t) => f.write_str(t.name()),
        }
    }
}

impl From<Texture> for TextureRequest {
    fn from(value: Texture) -> Self {
        Self::Named(value)
    }
}

/// Resolve a request to one profile. `Random` consumes one sample.
pub fn resolve_texture(request: TextureRequest, rng: &mut dyn RandomSource) -> TextureProfile {
    let texture = match request {
        TextureRequest::Named(t) => t,
        TextureRequest::Random => Texture::ALL[rng.pick_index(Texture::ALL.len())],
    };
    texture.profile()
}

/// String-level entry point: `"random"` or a medium name.
///
/// Fails with [`ScribbleError::InvalidTexture`] for an unknown name, before any randomness is
/// consumed.
pub fn resolve_texture_name(
    name: &str,
    rng: &mut dyn RandomSource,
) -> ScribbleResult<TextureProfile> {
    let request = name.parse::<TextureRequest>()?;
    Ok(resolve_texture(request, rng))
}

#[cfg(test)]
#[path = "../../tests/unit/texture/select.rs"]
mod tests;
