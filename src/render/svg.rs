//! SVG documents built from the stage: a still of any timeline position, or the whole reveal as
//! a self-contained SMIL animation.

use std::fmt::Write as _;

use crate::foundation::core::{Affine, Cap, Join, Millis, Rgba8};
use crate::render::filters::filter_defs;
use crate::scene::loader::Scene;
use crate::stage::sample::ElementFrame;
use crate::stage::tree::{Element, ElementRole, Stage};

/// Document-level options shared by still and animated output.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SvgOpts {
    /// Paper color painted under the strokes. `None` leaves the canvas transparent.
    pub background: Option<Rgba8>,
    /// Output size multiplier applied through `width`/`height` (the viewBox is unchanged).
    pub scale: f64,
}

impl Default for SvgOpts {
    fn default() -> Self {
        Self {
            background: Some(Rgba8::WHITE),
            scale: 1.0,
        }
    }
}

/// Still SVG of the stage at `t`.
///
/// Only strokes that paint something at `t` are emitted, in paint order.
pub fn snapshot_svg(scene: &Scene, stage: &Stage, t: Millis, opts: &SvgOpts) -> String {
    let frames: Vec<ElementFrame<'_>> = stage
        .sample(t)
        .into_iter()
        .filter(ElementFrame::is_visible)
        .collect();

    let mut out = open_document(scene, opts);
    out.push_str(&filter_defs(frames.iter().filter_map(|f| shadow_texture(f.element))));
    push_background(&mut out, opts);
    out.push_str(r#"<g id="doodle">"#);
    for frame in &frames {
        let mut attrs = stroke_attrs(frame.element);
        if frame.opacity < 1.0 {
            let _ = write!(attrs, r#" opacity="{}""#, num(frame.opacity));
        }
        if let Some((array, offset)) = frame.solid_dash() {
            let _ = write!(
                attrs,
                r#" stroke-dasharray="{}" stroke-dashoffset="{}""#,
                num(array),
                num(offset)
            );
        }
        push_element(&mut out, frame.element, &attrs, "");
    }
    out.push_str("</g></svg>");
    out
}

/// Self-contained animated SVG replaying every mutation of the current run.
///
/// Each stroke starts out of the document flow, appears at its insertion time, follows its opacity
/// changes with `<set>`, and draws itself with a linear `<animate>` of `stroke-dashoffset`.
pub fn animated_svg(scene: &Scene, stage: &Stage, opts: &SvgOpts) -> String {
    let elements: Vec<&Element> = stage.elements().iter().collect();

    let mut out = open_document(scene, opts);
    out.push_str(&filter_defs(elements.iter().filter_map(|e| shadow_texture(e))));
    push_background(&mut out, opts);
    out.push_str(r#"<g id="doodle">"#);
    for el in elements {
        let mut attrs = stroke_attrs(el);
        let mut anim = String::new();

        if el.inserted_at > Millis::ZERO {
            attrs.push_str(r#" display="none""#);
            push_set(&mut anim, "display", "inline", el.inserted_at);
        }
        for &(at, value) in &el.style.opacity_log {
            push_set(&mut anim, "opacity", &num(value), at);
        }
        // Zero-length strokes keep no dash at all and show solid as soon as they are opaque.
        let dashed = el.style.dash_array.filter(|&a| a > 0.0);
        if let (Some(array), Some(primed_at)) = (dashed, el.style.primed_at) {
            let _ = write!(attrs, r#" stroke-dasharray="{}""#, num(array));
            push_set(&mut anim, "stroke-dashoffset", &num(array), primed_at);
        }
        if let Some(tr) = el.style.transition.filter(|_| dashed.is_some()) {
            let _ = write!(
                anim,
                r#"<animate attributeName="stroke-dashoffset" from="{}" to="{}" begin="{}ms" dur="{}ms" calcMode="linear" fill="freeze"/>"#,
                num(tr.from),
                num(tr.to),
                num(tr.start.0),
                num(tr.duration.0.max(f64::EPSILON))
            );
        }
        push_element(&mut out, el, &attrs, &anim);
    }
    out.push_str("</g></svg>");
    out
}

fn open_document(scene: &Scene, opts: &SvgOpts) -> String {
    let vb = scene.view_box;
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="{} {} {} {}">"#,
        num(scene.width * opts.scale),
        num(scene.height * opts.scale),
        num(vb.x0),
        num(vb.y0),
        num(vb.width()),
        num(vb.height())
    )
}

fn push_background(out: &mut String, opts: &SvgOpts) {
    if let Some(bg) = opts.background {
        let _ = write!(
            out,
            r#"<rect width="100%" height="100%" fill="{}" fill-opacity="{}"/>"#,
            bg.to_hex_rgb(),
            num(bg.alpha_f64())
        );
    }
}

fn shadow_texture(el: &Element) -> Option<crate::texture::profile::Texture> {
    match el.role {
        ElementRole::Shadow { texture, .. } => Some(texture),
        ElementRole::Original { .. } => None,
    }
}

fn stroke_attrs(el: &Element) -> String {
    format!(
        r#"d="{}" transform="{}" fill="none" stroke="{}" stroke-width="{}" stroke-opacity="{}" stroke-linecap="{}" stroke-linejoin="{}""#,
        el.path.to_svg(),
        matrix(el.placement()),
        el.color.to_hex_rgb(),
        num(el.stroke_width),
        num(el.stroke_opacity),
        linecap(el.cap),
        linejoin(el.join)
    )
}

fn linecap(cap: Cap) -> &'static str {
    match cap {
        Cap::Butt => "butt",
        Cap::Round => "round",
        Cap::Square => "square",
    }
}

fn linejoin(join: Join) -> &'static str {
    match join {
        Join::Miter => "miter",
        Join::Round => "round",
        Join::Bevel => "bevel",
    }
}

// Filters go on a wrapping group so their region is in canvas space, not the path's local space.
fn push_element(out: &mut String, el: &Element, attrs: &str, children: &str) {
    let filter = el.filter_id.filter(|_| el.is_shadow());
    if let Some(id) = filter {
        let _ = write!(out, r#"<g filter="url(#{id})">"#);
    }
    if children.is_empty() {
        let _ = write!(out, "<path {attrs}/>");
    } else {
        let _ = write!(out, "<path {attrs}>{children}</path>");
    }
    if filter.is_some() {
        out.push_str("</g>");
    }
}

fn push_set(out: &mut String, attr: &str, to: &str, at: Millis) {
    let _ = write!(
        out,
        r#"<set attributeName="{attr}" to="{to}" begin="{}ms" fill="freeze"/>"#,
        num(at.0)
    );
}

fn matrix(a: Affine) -> String {
    let [xx, yx, xy, yy, x0, y0] = a.as_coeffs();
    format!(
        "matrix({} {} {} {} {} {})",
        num(xx),
        num(yx),
        num(xy),
        num(yy),
        num(x0),
        num(y0)
    )
}

/// Compact decimal: at most three fractional digits, trailing zeros dropped.
fn num(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_owned();
    }
    let s = format!("{v:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" || s.is_empty() {
        "0".to_owned()
    } else {
        s.to_owned()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
