use super::*;
use crate::foundation::core::{Cap, Join, Rect};
use crate::foundation::rng::Rng64;
use crate::scene::shape::StrokeShape;
use crate::sequence::event_loop::{VirtualClock, run_sequence};
use crate::sequence::run::SequenceOpts;
use crate::texture::profile::Texture;
use crate::texture::select::TextureRequest;

fn drawn(texture: Texture) -> (Scene, Stage, Millis) {
    let shapes = vec![
        StrokeShape::from_svg_path("M10 10 L90 10", Some(3.0)).unwrap(),
        StrokeShape::from_svg_path("M10 50 C30 20 60 80 90 50", None).unwrap(),
    ];
    let out = run_sequence(
        &shapes,
        TextureRequest::Named(texture),
        &SequenceOpts::default(),
        VirtualClock::new(),
        Rng64::new(17),
    )
    .unwrap();
    let scene = Scene {
        shapes,
        view_box: Rect::new(0.0, 0.0, 100.0, 60.0),
        width: 100.0,
        height: 60.0,
    };
    (scene, out.stage, out.report.finished_at)
}

#[test]
fn num_is_compact() {
    assert_eq!(num(1.0), "1");
    assert_eq!(num(0.25), "0.25");
    assert_eq!(num(1.23456), "1.235");
    assert_eq!(num(-0.0001), "0");
    assert_eq!(num(f64::NAN), "0");
}

#[test]
fn nothing_is_painted_before_the_first_reveal() {
    let (scene, stage, _) = drawn(Texture::Pencil);
    let svg = snapshot_svg(&scene, &stage, Millis::ZERO, &SvgOpts::default());
    assert!(svg.starts_with("<svg "));
    assert!(svg.contains(r#"viewBox="0 0 100 60""#));
    assert!(!svg.contains("<path"));
    assert!(!svg.contains("<defs>"));
}

#[test]
fn settled_snapshot_has_filters_and_shadows_beneath_originals() {
    let (scene, stage, end) = drawn(Texture::Crayon);
    let svg = snapshot_svg(&scene, &stage, end, &SvgOpts::default());

    assert!(svg.contains(r##"<filter id="crayon""##));
    let paths = svg.matches("<path ").count();
    assert_eq!(paths, stage.elements().len());

    // Paint order: the last path of each batch is the unfiltered original.
    let last_shadow = svg.rfind(r#"filter="url(#crayon)""#).unwrap();
    let last_path = svg.rfind("<path ").unwrap();
    assert!(last_shadow < last_path);
    assert!(svg.contains(r#"stroke-dashoffset="0""#));
}

#[test]
fn mid_reveal_snapshot_shows_partial_dash() {
    let (scene, stage, _) = drawn(Texture::Marker);
    let first = stage
        .elements()
        .iter()
        .find(|e| !e.is_shadow())
        .unwrap();
    let tr = first.style.transition.unwrap();
    let mid = tr.start + Millis(tr.duration.0 / 2.0);

    let svg = snapshot_svg(&scene, &stage, mid, &SvgOpts::default());
    let expected = format!(r#"stroke-dashoffset="{}""#, num(tr.value_at(mid)));
    assert!(svg.contains(&expected));
}

#[test]
fn transparent_background_and_scale() {
    let (scene, stage, end) = drawn(Texture::Pencil);
    let opts = SvgOpts {
        background: None,
        scale: 2.0,
    };
    let svg = snapshot_svg(&scene, &stage, end, &opts);
    assert!(svg.contains(r#"width="200" height="120""#));
    assert!(!svg.contains("<rect"));
}

#[test]
fn animated_export_replays_the_run() {
    let (scene, stage, _) = drawn(Texture::Watercolor);
    let svg = animated_svg(&scene, &stage, &SvgOpts::default());

    let transitions = stage
        .elements()
        .iter()
        .filter(|e| e.style.transition.is_some())
        .count();
    assert_eq!(svg.matches("<animate ").count(), transitions);
    assert!(svg.contains(r#"attributeName="opacity" to="0" begin="0ms""#));
    assert!(svg.contains(r#"display="none""#));
    assert!(svg.contains(r#"calcMode="linear" fill="freeze""#));
    assert!(svg.contains(r##"<filter id="watercolor""##));
}

#[test]
fn settled_dot_is_painted_without_a_dash() {
    let shapes = vec![StrokeShape::from_svg_path("M50 50 L50 50", Some(6.0)).unwrap()];
    let out = run_sequence(
        &shapes,
        TextureRequest::Named(Texture::Marker),
        &SequenceOpts::default(),
        VirtualClock::new(),
        Rng64::new(17),
    )
    .unwrap();
    let scene = Scene {
        shapes,
        view_box: Rect::new(0.0, 0.0, 100.0, 100.0),
        width: 100.0,
        height: 100.0,
    };
    let later = out.report.finished_at + Millis(1000.0);

    let svg = snapshot_svg(&scene, &out.stage, later, &SvgOpts::default());
    assert_eq!(svg.matches("<path ").count(), out.stage.elements().len());
    assert!(!svg.contains("stroke-dasharray"));

    let animated = animated_svg(&scene, &out.stage, &SvgOpts::default());
    assert_eq!(animated.matches("<path ").count(), out.stage.elements().len());
    assert!(!animated.contains("stroke-dasharray"));
    assert!(!animated.contains("<animate "));
}

#[test]
fn strokes_keep_their_caps_and_joins() {
    let shapes = vec![
        StrokeShape::from_svg_path("M10 10 L90 10", None)
            .unwrap()
            .with_line_style(Cap::Round, Join::Bevel),
        StrokeShape::from_svg_path("M10 50 L90 50", None).unwrap(),
    ];
    let mut stage = Stage::new();
    let token = stage.begin_run(Millis::ZERO);
    let mut edit = stage.edit(token, Millis::ZERO).unwrap();
    for (i, shape) in shapes.iter().enumerate() {
        edit.append_original(i, shape);
    }
    let scene = Scene {
        shapes,
        view_box: Rect::new(0.0, 0.0, 100.0, 60.0),
        width: 100.0,
        height: 60.0,
    };

    let svg = snapshot_svg(&scene, &stage, Millis::ZERO, &SvgOpts::default());
    assert!(svg.contains(r#"stroke-linecap="round" stroke-linejoin="bevel""#));
    assert!(svg.contains(r#"stroke-linecap="butt" stroke-linejoin="miter""#));
}
