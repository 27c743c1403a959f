use super::*;

#[test]
fn frame_range_validation_and_len() {
    assert!(FrameRange::new(FrameIndex(5), FrameIndex(4)).is_err());
    let r = FrameRange::new(FrameIndex(2), FrameIndex(6)).unwrap();
    assert_eq!(r.len_frames(), 4);
    assert!(r.contains(FrameIndex(2)));
    assert!(!r.contains(FrameIndex(6)));
    assert!(FrameRange::new(FrameIndex(3), FrameIndex(3)).unwrap().is_empty());
}

#[test]
fn fps_rejects_zero_and_maps_frames_to_millis() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());

    let fps = Fps::new(25, 1).unwrap();
    assert_eq!(fps.frame_to_millis(FrameIndex(0)), Millis(0.0));
    assert!((fps.frame_to_millis(FrameIndex(5)).0 - 200.0).abs() < 1e-9);
}

#[test]
fn frames_covering_rounds_up_and_never_returns_zero() {
    let fps = Fps::new(30, 1).unwrap();
    assert_eq!(fps.frames_covering(Millis(1000.0)), 30);
    assert_eq!(fps.frames_covering(Millis(1001.0)), 31);
    assert_eq!(fps.frames_covering(Millis(0.0)), 1);
}

#[test]
fn millis_arithmetic_and_duration() {
    let a = Millis(250.0) + Millis(40.0);
    assert_eq!(a, Millis(290.0));
    assert_eq!(a - Millis(90.0), Millis(200.0));
    assert_eq!(Millis(-3.0).to_duration(), std::time::Duration::ZERO);
    assert_eq!(
        Millis(1500.0).to_duration(),
        std::time::Duration::from_millis(1500)
    );
    assert_eq!(Millis(3.0).max(Millis(7.0)), Millis(7.0));
}

#[test]
fn rgba8_hex_and_alpha() {
    let c = Rgba8::from([16, 32, 255, 51]);
    assert_eq!(c.to_hex_rgb(), "#1020ff");
    assert!((c.alpha_f64() - 0.2).abs() < 1e-9);
    assert_eq!(<[u8; 4]>::from(Rgba8::WHITE), [255, 255, 255, 255]);
}
