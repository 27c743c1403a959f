use crate::foundation::core::Canvas;
use crate::foundation::error::{ScribbleError, ScribbleResult};

/// Rendered frame pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Copy with straight (non-premultiplied) alpha, as image encoders expect.
    pub fn to_straight(&self) -> FrameRGBA {
        if !self.premultiplied {
            return self.clone();
        }
        let mut data = self.data.clone();
        for px in data.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        FrameRGBA {
            width: self.width,
            height: self.height,
            data,
            premultiplied: false,
        }
    }
}

const MAX_DIM: u32 = 16_384;

/// Pixel canvas for a document of `width` x `height` units at `scale`.
///
/// Rounds to whole pixels; `even` rounds each side up to a multiple of two (needed for yuv420p).
pub fn canvas_for(width: f64, height: f64, scale: f64, even: bool) -> ScribbleResult<Canvas> {
    fn to_px(v: f64, even: bool) -> ScribbleResult<u32> {
        if !v.is_finite() || v <= 0.0 {
            return Err(ScribbleError::render("canvas has invalid width/height"));
        }
        let mut px = (v.round() as u32).max(1);
        if even && px % 2 == 1 {
            px += 1;
        }
        if px > MAX_DIM {
            return Err(ScribbleError::render(format!(
                "canvas side {px} too large (max {MAX_DIM})"
            )));
        }
        Ok(px)
    }

    Ok(Canvas {
        width: to_px(width * scale, even)?,
        height: to_px(height * scale, even)?,
    })
}

/// Parse an SVG document and rasterize it to fill `canvas`.
pub fn rasterize_svg(svg: &str, canvas: Canvas) -> ScribbleResult<FrameRGBA> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg, &opts)
        .map_err(|e| ScribbleError::render(format!("parse frame svg: {e}")))?;
    rasterize_tree(&tree, canvas)
}

/// Rasterize a parsed tree, stretched to fill `canvas`.
pub fn rasterize_tree(tree: &usvg::Tree, canvas: Canvas) -> ScribbleResult<FrameRGBA> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(canvas.width, canvas.height)
        .ok_or_else(|| ScribbleError::render("failed to allocate frame pixmap"))?;

    let sx = (canvas.width as f32) / tree.size().width();
    let sy = (canvas.height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(FrameRGBA {
        width: canvas.width,
        height: canvas.height,
        data: pixmap.take(),
        premultiplied: true,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
