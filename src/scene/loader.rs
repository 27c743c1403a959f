use std::path::{Path, PathBuf};

use anyhow::Context as _;
use resvg::tiny_skia::PathSegment;

use crate::foundation::core::{Affine, BezPath, Cap, Join, Point, Rect, Rgba8};
use crate::foundation::error::{ScribbleError, ScribbleResult};
use crate::scene::shape::StrokeShape;

/// A loaded artwork: its strokes in document order plus canvas sizing.
#[derive(Clone, Debug)]
pub struct Scene {
    /// Strokes in the order they appear in the document.
    pub shapes: Vec<StrokeShape>,
    /// Visible region in canvas units.
    pub view_box: Rect,
    /// Intrinsic document width.
    pub width: f64,
    /// Intrinsic document height.
    pub height: f64,
}

impl Scene {
    /// Total traceable length of all strokes.
    pub fn total_length(&self) -> f64 {
        self.shapes.iter().map(StrokeShape::total_length).sum()
    }
}

/// Source of scenes by identifier.
pub trait SceneLoader {
    /// Load the scene named `id`. Fails with [`ScribbleError::AssetLoad`].
    fn load_scene(&self, id: &str) -> ScribbleResult<Scene>;
}

/// Loads `<root>/<id>` from disk.
#[derive(Clone, Debug)]
pub struct DirSceneLoader {
    root: PathBuf,
}

impl DirSceneLoader {
    /// Loader rooted at an assets directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The assets directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SceneLoader for DirSceneLoader {
    #[tracing::instrument(skip(self), fields(root = %self.root.display()))]
    fn load_scene(&self, id: &str) -> ScribbleResult<Scene> {
        let rel = Path::new(id);
        if rel.is_absolute()
            || rel
                .components()
                .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            return Err(ScribbleError::asset_load(format!(
                "scene id '{id}' must be a relative path inside the assets directory"
            )));
        }

        let path = self.root.join(rel);
        let bytes = std::fs::read(&path)
            .with_context(|| format!("read scene '{}'", path.display()))
            .map_err(|e| ScribbleError::asset_load(format!("{e:#}")))?;
        let scene = parse_scene(&bytes)?;
        tracing::debug!(shapes = scene.shapes.len(), "scene loaded");
        Ok(scene)
    }
}

/// Parse an SVG document into a [`Scene`].
///
/// Every visible path-producing element contributes one stroke, in document order. Geometry stays
/// in the element's local space and the accumulated transform (including the viewBox mapping) is
/// kept alongside, so lengths match what a browser reports for the element.
pub fn parse_scene(bytes: &[u8]) -> ScribbleResult<Scene> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts)
        .map_err(|e| ScribbleError::asset_load(format!("parse svg: {e}")))?;

    let size = tree.size();
    let width = f64::from(size.width());
    let height = f64::from(size.height());

    let mut shapes = Vec::new();
    collect_shapes(tree.root(), &mut shapes);

    Ok(Scene {
        shapes,
        view_box: Rect::new(0.0, 0.0, width, height),
        width,
        height,
    })
}

fn collect_shapes(group: &usvg::Group, out: &mut Vec<StrokeShape>) {
    for child in group.children() {
        match child {
            usvg::Node::Group(g) => collect_shapes(g.as_ref(), out),
            usvg::Node::Path(p) => {
                if p.is_visible() {
                    out.push(shape_from_usvg(p.as_ref()));
                }
            }
            usvg::Node::Image(_) | usvg::Node::Text(_) => {}
        }
    }
}

fn shape_from_usvg(p: &usvg::Path) -> StrokeShape {
    let t = p.abs_transform();
    let transform = Affine::new([
        f64::from(t.sx),
        f64::from(t.ky),
        f64::from(t.kx),
        f64::from(t.sy),
        f64::from(t.tx),
        f64::from(t.ty),
    ]);

    let (stroke_width, color, cap, join) = match p.stroke() {
        Some(s) => {
            let alpha = (s.opacity().get() * 255.0).round().clamp(0.0, 255.0) as u8;
            let color = match s.paint() {
                usvg::Paint::Color(c) => Rgba8 {
                    r: c.red,
                    g: c.green,
                    b: c.blue,
                    a: alpha,
                },
                // Gradients and patterns fall back to plain ink.
                _ => Rgba8 { a: alpha, ..Rgba8::BLACK },
            };
            let cap = match s.linecap() {
                usvg::LineCap::Butt => Cap::Butt,
                usvg::LineCap::Round => Cap::Round,
                usvg::LineCap::Square => Cap::Square,
            };
            let join = match s.linejoin() {
                usvg::LineJoin::Miter | usvg::LineJoin::MiterClip => Join::Miter,
                usvg::LineJoin::Round => Join::Round,
                usvg::LineJoin::Bevel => Join::Bevel,
            };
            (Some(f64::from(s.width().get())), color, cap, join)
        }
        None => (None, Rgba8::BLACK, Cap::Butt, Join::Miter),
    };

    StrokeShape::new(to_bez_path(p.data()), transform, stroke_width, color)
        .with_line_style(cap, join)
}

fn to_bez_path(data: &resvg::tiny_skia::Path) -> BezPath {
    fn pt(p: resvg::tiny_skia::Point) -> Point {
        Point::new(f64::from(p.x), f64::from(p.y))
    }

    let mut out = BezPath::new();
    for seg in data.segments() {
        match seg {
            PathSegment::MoveTo(p) => out.move_to(pt(p)),
            PathSegment::LineTo(p) => out.line_to(pt(p)),
            PathSegment::QuadTo(p1, p2) => out.quad_to(pt(p1), pt(p2)),
            PathSegment::CubicTo(p1, p2, p3) => out.curve_to(pt(p1), pt(p2), pt(p3)),
            PathSegment::Close => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/scene/loader.rs"]
mod tests;
