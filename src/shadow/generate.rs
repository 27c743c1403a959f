use smallvec::SmallVec;

use crate::foundation::core::Vec2;
use crate::foundation::rng::RandomSource;
use crate::scene::shape::StrokeShape;
use crate::texture::profile::{Texture, TextureProfile};

/// Shadows for one stroke. The largest profile yields 8, so these never spill to the heap.
pub type ShadowSet = SmallVec<[ShadowInstance; 8]>;

/// A disposable, jittered copy of a stroke drawn beneath it.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ShadowInstance {
    /// Base width plus jitter.
    pub stroke_width: f64,
    /// Sampled stroke opacity.
    pub opacity: f64,
    /// Translation applied on top of the stroke's placement.
    pub offset: Vec2,
    /// Filter applied when painting.
    pub filter_id: &'static str,
    /// Medium that produced it.
    pub texture: Texture,
}

impl ShadowInstance {
    /// Always `true`; distinguishes shadows from originals wherever both are handled.
    pub fn is_shadow(&self) -> bool {
        true
    }
}

/// Expand one stroke into its shadow copies.
///
/// The count is uniform over the profile's inclusive range. Each shadow then draws, in order,
/// width jitter, opacity, x offset and y offset.
pub fn generate_shadows(
    shape: &StrokeShape,
    profile: &TextureProfile,
    rng: &mut dyn RandomSource,
) -> ShadowSet {
    let (min, max) = profile.shadow_count;
    let count = rng.uniform_inclusive(min, max);
    let base = shape.base_width();
    let (op_lo, op_hi) = profile.opacity;

    (0..count)
        .map(|_| {
            let stroke_width = base + rng.next_f64() * profile.width_jitter_max;
            let opacity = rng.uniform(op_lo, op_hi);
            let dx = (rng.next_f64() - 0.5) * profile.offset_max;
            let dy = (rng.next_f64() - 0.5) * profile.offset_max;
            ShadowInstance {
                stroke_width,
                opacity,
                offset: Vec2::new(dx, dy),
                filter_id: profile.filter_id,
                texture: profile.texture,
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/shadow/generate.rs"]
mod tests;
