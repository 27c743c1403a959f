use crate::foundation::error::{ScribbleError, ScribbleResult};

pub use kurbo::{Affine, BezPath, Cap, Join, Point, Rect, Vec2};

/// A point or span on the sketch timeline, in milliseconds.
///
/// Timers, transitions and mutation events all share this clock. Fractional values are kept
/// because per-shape durations are sampled from a continuous range.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Millis(pub f64);

impl Millis {
    /// Timeline origin.
    pub const ZERO: Self = Self(0.0);

    /// Raw milliseconds.
    pub fn as_f64(self) -> f64 {
        self.0
    }

    /// Convert to seconds.
    pub fn as_secs_f64(self) -> f64 {
        self.0 / 1000.0
    }

    /// Convert to a [`std::time::Duration`]; negative and non-finite values clamp to zero.
    pub fn to_duration(self) -> std::time::Duration {
        if !self.0.is_finite() || self.0 <= 0.0 {
            return std::time::Duration::ZERO;
        }
        std::time::Duration::from_secs_f64(self.0 / 1000.0)
    }

    /// Larger of two instants.
    pub fn max(self, other: Self) -> Self {
        if other.0 > self.0 { other } else { self }
    }
}

impl std::ops::Add for Millis {
    type Output = Millis;

    fn add(self, rhs: Self) -> Self::Output {
        Millis(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Millis {
    type Output = Millis;

    fn sub(self, rhs: Self) -> Self::Output {
        Millis(self.0 - rhs.0)
    }
}

impl std::fmt::Display for Millis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}ms", self.0)
    }
}

/// Absolute 0-based frame index in output video space.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Half-open frame range `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    /// Inclusive range start.
    pub start: FrameIndex,
    /// Exclusive range end.
    pub end: FrameIndex,
}

impl FrameRange {
    /// Create a validated range with `start <= end`.
    pub fn new(start: FrameIndex, end: FrameIndex) -> ScribbleResult<Self> {
        if start.0 > end.0 {
            return Err(ScribbleError::validation("FrameRange start must be <= end"));
        }
        Ok(Self { start, end })
    }

    /// Number of frames contained in the range.
    pub fn len_frames(self) -> u64 {
        self.end.0.saturating_sub(self.start.0)
    }

    /// Return `true` when the range has no frames.
    pub fn is_empty(self) -> bool {
        self.start.0 == self.end.0
    }

    /// Return `true` when `f` is inside `[start, end)`.
    pub fn contains(self, f: FrameIndex) -> bool {
        self.start.0 <= f.0 && f.0 < self.end.0
    }
}

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> ScribbleResult<Self> {
        if den == 0 {
            return Err(ScribbleError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(ScribbleError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Timeline position of the start of frame `f`.
    pub fn frame_to_millis(self, f: FrameIndex) -> Millis {
        Millis((f.0 as f64) * 1000.0 * f64::from(self.den) / f64::from(self.num))
    }

    /// Number of frames needed to cover `span`, rounding up and always at least one.
    pub fn frames_covering(self, span: Millis) -> u64 {
        let frames = (span.as_secs_f64() * self.as_f64()).ceil();
        if frames.is_finite() && frames >= 1.0 {
            frames as u64
        } else {
            1
        }
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque black, the default ink.
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    /// Opaque white, the default paper.
    pub const WHITE: Self = Self::opaque(255, 255, 255);

    /// Fully opaque color.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// `#rrggbb` form used in SVG paint attributes (alpha is written separately).
    pub fn to_hex_rgb(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha as a `[0, 1]` opacity.
    pub fn alpha_f64(self) -> f64 {
        f64::from(self.a) / 255.0
    }
}

impl From<[u8; 4]> for Rgba8 {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}

impl From<Rgba8> for [u8; 4] {
    fn from(c: Rgba8) -> Self {
        [c.r, c.g, c.b, c.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
