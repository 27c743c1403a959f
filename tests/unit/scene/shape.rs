use super::*;

#[test]
fn straight_line_length() {
    let s = StrokeShape::from_svg_path("M0 0 L100 0", None).unwrap();
    assert!((s.total_length() - 100.0).abs() < 1e-6);
}

#[test]
fn closed_square_counts_closing_edge() {
    let s = StrokeShape::from_svg_path("M0 0 H10 V10 H0 Z", Some(2.0)).unwrap();
    assert!((s.total_length() - 40.0).abs() < 1e-6);
}

#[test]
fn curve_length_is_measured_by_arclen() {
    // Quarter circle approximation, radius 50.
    let s = StrokeShape::from_svg_path("M50 0 C50 27.614 27.614 50 0 50", None).unwrap();
    let quarter = std::f64::consts::PI * 50.0 / 2.0;
    assert!((s.total_length() - quarter).abs() < 0.1);
}

#[test]
fn degenerate_geometry_measures_zero() {
    assert_eq!(StrokeShape::from_svg_path("M5 5", None).unwrap().total_length(), 0.0);
    assert_eq!(
        StrokeShape::from_svg_path("M5 5 L5 5", None).unwrap().total_length(),
        0.0
    );
    assert_eq!(total_length(&BezPath::new()), 0.0);
}

#[test]
fn base_width_defaults_to_four() {
    let s = StrokeShape::from_svg_path("M0 0 L1 1", None).unwrap();
    assert_eq!(s.base_width(), DEFAULT_STROKE_WIDTH);
    assert_eq!(s.base_width(), 4.0);

    let s = StrokeShape::from_svg_path("M0 0 L1 1", Some(2.5)).unwrap();
    assert_eq!(s.base_width(), 2.5);

    let s = StrokeShape::from_svg_path("M0 0 L1 1", Some(0.0)).unwrap();
    assert_eq!(s.base_width(), 4.0);
}

#[test]
fn invalid_path_data_is_rejected() {
    assert!(StrokeShape::from_svg_path("M0 0 K 3 4", None).is_err());
}
