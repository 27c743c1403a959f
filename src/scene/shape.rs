use std::sync::Arc;

use kurbo::{ParamCurveArclen, PathSeg};

use crate::foundation::core::{Affine, BezPath, Cap, Join, Rgba8};

/// Stroke width used when the source path does not declare one.
pub const DEFAULT_STROKE_WIDTH: f64 = 4.0;

const ARCLEN_ACCURACY: f64 = 1e-3;

/// One drawable line of the artwork, read-only once loaded.
#[derive(Clone, Debug)]
pub struct StrokeShape {
    /// Geometry in the path's own coordinate space (dash lengths are measured here).
    pub path: Arc<BezPath>,
    /// Placement of the path on the canvas.
    pub transform: Affine,
    /// Declared stroke width, if any.
    pub stroke_width: Option<f64>,
    /// Ink color; alpha carries the declared stroke opacity.
    pub color: Rgba8,
    /// Line end style. Butt unless the source declares otherwise.
    pub cap: Cap,
    /// Corner style. Miter unless the source declares otherwise.
    pub join: Join,
    length: f64,
}

impl StrokeShape {
    /// Build a shape and measure its traceable length.
    pub fn new(path: BezPath, transform: Affine, stroke_width: Option<f64>, color: Rgba8) -> Self {
        let length = total_length(&path);
        Self {
            path: Arc::new(path),
            transform,
            stroke_width,
            color,
            cap: Cap::Butt,
            join: Join::Miter,
            length,
        }
    }

    /// Replace the cap and join styles.
    pub fn with_line_style(mut self, cap: Cap, join: Join) -> Self {
        self.cap = cap;
        self.join = join;
        self
    }

    /// Parse SVG path data (`d` attribute) into an identity-placed black stroke.
    pub fn from_svg_path(d: &str, stroke_width: Option<f64>) -> Result<Self, kurbo::SvgParseError> {
        let path = BezPath::from_svg(d.trim())?;
        Ok(Self::new(path, Affine::IDENTITY, stroke_width, Rgba8::BLACK))
    }

    /// Base width shadows jitter from: the declared width, or 4.
    pub fn base_width(&self) -> f64 {
        match self.stroke_width {
            Some(w) if w.is_finite() && w > 0.0 => w,
            _ => DEFAULT_STROKE_WIDTH,
        }
    }

    /// Total traceable length. Degenerate geometry measures 0.
    pub fn total_length(&self) -> f64 {
        self.length
    }
}

/// Sum of segment arc lengths. Non-finite results collapse to 0.
pub fn total_length(path: &BezPath) -> f64 {
    let len: f64 = path
        .segments()
        .map(|seg: PathSeg| seg.arclen(ARCLEN_ACCURACY))
        .sum();
    if len.is_finite() && len > 0.0 { len } else { 0.0 }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/shape.rs"]
mod tests;
