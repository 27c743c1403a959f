use super::*;
use crate::encode::sink::InMemorySink;
use crate::foundation::core::Rect;
use crate::foundation::rng::Rng64;
use crate::render::raster::canvas_for;
use crate::scene::shape::StrokeShape;
use crate::sequence::event_loop::{VirtualClock, run_sequence};
use crate::sequence::run::SequenceOpts;
use crate::texture::profile::Texture;
use crate::texture::select::TextureRequest;

fn drawn() -> (Scene, Stage, Millis) {
    let shapes = vec![
        StrokeShape::from_svg_path("M2 2 L30 2", Some(2.0)).unwrap(),
        StrokeShape::from_svg_path("M2 10 L30 18", Some(2.0)).unwrap(),
    ];
    let out = run_sequence(
        &shapes,
        TextureRequest::Named(Texture::Marker),
        &SequenceOpts::default(),
        VirtualClock::new(),
        Rng64::new(8),
    )
    .unwrap();
    let scene = Scene {
        shapes,
        view_box: Rect::new(0.0, 0.0, 32.0, 20.0),
        width: 32.0,
        height: 20.0,
    };
    (scene, out.stage, out.report.finished_at)
}

fn opts(parallel: bool) -> RenderOpts {
    RenderOpts {
        fps: Fps { num: 20, den: 1 },
        parallel,
        chunk_size: 4,
        threads: Some(2),
        ..Default::default()
    }
}

#[test]
fn timeline_covers_the_drawing_and_the_hold() {
    let fps = Fps { num: 10, den: 1 };
    let r = timeline_range(fps, Millis(950.0), Millis(1000.0));
    assert_eq!(r.start, FrameIndex(0));
    assert_eq!(r.end, FrameIndex(20));
    assert_eq!(timeline_range(fps, Millis::ZERO, Millis::ZERO).len_frames(), 1);
}

#[test]
fn single_frame_has_canvas_size() {
    let (scene, stage, end) = drawn();
    let canvas = canvas_for(scene.width, scene.height, 2.0, false).unwrap();
    let frame = render_frame(&scene, &stage, end, canvas, &SvgOpts::default()).unwrap();
    assert_eq!((frame.width, frame.height), (64, 40));
    assert_eq!(frame.data.len(), 64 * 40 * 4);
    // White paper with ink somewhere on it.
    assert!(frame.data.chunks_exact(4).any(|px| px[0] < 128));
}

#[test]
fn frames_reach_the_sink_in_order() {
    let (scene, stage, end) = drawn();
    let canvas = canvas_for(scene.width, scene.height, 1.0, true).unwrap();
    let range = timeline_range(Fps { num: 20, den: 1 }, end, Millis(500.0));
    let mut sink = InMemorySink::new();
    let stats = render_range(&scene, &stage, range, canvas, &opts(true), &mut sink).unwrap();

    assert_eq!(stats.frames_total, range.len_frames());
    assert_eq!(stats.frames_rendered + stats.frames_elided, stats.frames_total);
    assert!(stats.frames_elided > 0);
    assert!(sink.is_ended());
    assert_eq!(sink.config().unwrap().width, canvas.width);
    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, (0..range.len_frames()).collect::<Vec<_>>());

    // The held tail is identical.
    let frames = sink.frames();
    assert_eq!(frames[frames.len() - 1].1, frames[frames.len() - 2].1);
}

#[test]
fn parallel_and_sequential_render_identically() {
    let (scene, stage, end) = drawn();
    let canvas = canvas_for(scene.width, scene.height, 1.0, false).unwrap();
    let range = timeline_range(Fps { num: 20, den: 1 }, end, Millis(100.0));

    let mut a = InMemorySink::new();
    let mut b = InMemorySink::new();
    render_range(&scene, &stage, range, canvas, &opts(true), &mut a).unwrap();
    let no_elision = RenderOpts {
        static_frame_elision: false,
        ..opts(false)
    };
    let stats = render_range(&scene, &stage, range, canvas, &no_elision, &mut b).unwrap();

    assert_eq!(stats.frames_elided, 0);
    assert_eq!(a.frames(), b.frames());
}

#[test]
fn zero_threads_is_rejected() {
    let (scene, stage, _) = drawn();
    let canvas = canvas_for(scene.width, scene.height, 1.0, false).unwrap();
    let bad = RenderOpts {
        threads: Some(0),
        ..opts(true)
    };
    let mut sink = InMemorySink::new();
    let range = FrameRange::new(FrameIndex(0), FrameIndex(1)).unwrap();
    assert!(render_range(&scene, &stage, range, canvas, &bad, &mut sink).is_err());
}
