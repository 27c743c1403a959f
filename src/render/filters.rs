use std::fmt::Write as _;

use crate::texture::profile::Texture;

/// Parameters of the grain filter applied to a medium's shadows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GrainFilter {
    /// `feTurbulence` base frequency.
    pub base_frequency: f64,
    /// `feTurbulence` octaves.
    pub octaves: u32,
    /// `feDisplacementMap` scale.
    pub displacement: f64,
    /// Optional `feGaussianBlur` standard deviation.
    pub blur: Option<f64>,
}

/// Grain filter for `texture`.
pub fn grain_filter(texture: Texture) -> GrainFilter {
    match texture {
        Texture::Pencil => GrainFilter {
            base_frequency: 0.9,
            octaves: 2,
            displacement: 1.2,
            blur: None,
        },
        Texture::Crayon => GrainFilter {
            base_frequency: 0.6,
            octaves: 3,
            displacement: 2.5,
            blur: None,
        },
        Texture::Pastel => GrainFilter {
            base_frequency: 0.35,
            octaves: 3,
            displacement: 3.0,
            blur: Some(0.8),
        },
        Texture::Marker => GrainFilter {
            base_frequency: 0.05,
            octaves: 1,
            displacement: 0.6,
            blur: None,
        },
        Texture::Watercolor => GrainFilter {
            base_frequency: 0.02,
            octaves: 2,
            displacement: 5.0,
            blur: Some(1.5),
        },
    }
}

/// `<filter>` element for `texture`, with the profile's `filter_id` as its id.
///
/// The filter region is in user space so thin horizontal or vertical strokes, whose bounding box
/// has no area, still render.
pub fn filter_def(texture: Texture) -> String {
    let id = texture.profile().filter_id;
    let f = grain_filter(texture);
    let mut out = String::new();
    let _ = write!(
        out,
        r#"<filter id="{id}" filterUnits="userSpaceOnUse" x="-10%" y="-10%" width="120%" height="120%">"#
    );
    let _ = write!(
        out,
        r#"<feTurbulence type="fractalNoise" baseFrequency="{}" numOctaves="{}" seed="{}" result="noise"/>"#,
        f.base_frequency,
        f.octaves,
        texture as u32 + 1
    );
    let _ = write!(
        out,
        r#"<feDisplacementMap in="SourceGraphic" in2="noise" scale="{}" xChannelSelector="R" yChannelSelector="G"{}/>"#,
        f.displacement,
        if f.blur.is_some() { r#" result="grain""# } else { "" }
    );
    if let Some(sd) = f.blur {
        let _ = write!(out, r#"<feGaussianBlur in="grain" stdDeviation="{sd}"/>"#);
    }
    out.push_str("</filter>");
    out
}

/// `<defs>` block with one filter per distinct texture, in [`Texture::ALL`] order.
///
/// Empty string when no texture is used.
pub fn filter_defs(used: impl IntoIterator<Item = Texture>) -> String {
    let mut seen = [false; Texture::ALL.len()];
    for t in used {
        seen[t as usize] = true;
    }
    if !seen.iter().any(|s| *s) {
        return String::new();
    }
    let mut out = String::from("<defs>");
    for t in Texture::ALL {
        if seen[t as usize] {
            out.push_str(&filter_def(t));
        }
    }
    out.push_str("</defs>");
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/filters.rs"]
mod tests;
