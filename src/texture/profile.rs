use crate::foundation::error::{ScribbleError, ScribbleResult};

/// A drawing medium. Each one maps to a fixed [`TextureProfile`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Texture {
    /// Fine, subtle strokes.
    Pencil,
    /// Coarse, rough strokes.
    Crayon,
    /// Soft, smudged strokes.
    Pastel,
    /// Bold, uniform strokes.
    Marker,
    /// Diffuse, transparent strokes.
    Watercolor,
}

impl Texture {
    /// All media in a fixed order. Random selection draws uniformly from this list.
    pub const ALL: [Texture; 5] = [
        Texture::Pencil,
        Texture::Crayon,
        Texture::Pastel,
        Texture::Marker,
        Texture::Watercolor,
    ];

    /// Lowercase name used in configs, CLI flags and filter ids.
    pub fn name(self) -> &'static str {
        match self {
            Texture::Pencil => "pencil",
            Texture::Crayon => "crayon",
            Texture::Pastel => "pastel",
            Texture::Marker => "marker",
            Texture::Watercolor => "watercolor",
        }
    }

    /// The constant shadow profile for this medium.
    pub fn profile(self) -> TextureProfile {
        match self {
            Texture::Pencil => TextureProfile {
                texture: self,
                shadow_count: (3, 4),
                width_jitter_max: 0.8,
                opacity: (0.15, 0.45),
                offset_max: 1.5,
                filter_id: "pencil",
            },
            Texture::Crayon => TextureProfile {
                texture: self,
                shadow_count: (4, 6),
                width_jitter_max: 2.5,
                opacity: (0.20, 0.60),
                offset_max: 3.5,
                filter_id: "crayon",
            },
            Texture::Pastel => TextureProfile {
                texture: self,
                shadow_count: (5, 7),
                width_jitter_max: 4.0,
                opacity: (0.10, 0.35),
                offset_max: 5.0,
                filter_id: "pastel",
            },
            Texture::Marker => TextureProfile {
                texture: self,
                shadow_count: (2, 3),
                width_jitter_max: 0.3,
                opacity: (0.40, 0.70),
                offset_max: 0.5,
                filter_id: "marker",
            },
            Texture::Watercolor => TextureProfile {
                texture: self,
                shadow_count: (6, 8),
                width_jitter_max: 3.0,
                opacity: (0.05, 0.25),
                offset_max: 6.0,
                filter_id: "watercolor",
            },
        }
    }
}

impl std::fmt::Display for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Texture {
    type Err = ScribbleError;

    fn from_str(s: &str) -> ScribbleResult<Self> {
        let wanted = s.trim();
        Texture::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ScribbleError::invalid_texture(wanted))
    }
}

/// Shadow parameters for one medium.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct TextureProfile {
    /// Medium this profile belongs to.
    pub texture: Texture,
    /// Inclusive `(min, max)` number of shadow copies per stroke.
    pub shadow_count: (u32, u32),
    /// Upper bound of the random width added to the base stroke width.
    pub width_jitter_max: f64,
    /// `(min, max)` stroke opacity of each shadow.
    pub opacity: (f64, f64),
    /// Side of the square the per-shadow offset is drawn from, centered on the stroke.
    pub offset_max: f64,
    /// Id of the SVG filter applied to shadows.
    pub filter_id: &'static str,
}

#[cfg(test)]
#[path = "../../tests/unit/texture/profile.rs"]
mod tests;
