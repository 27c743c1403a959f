use super::*;
use crate::foundation::rng::{Rng64, SequenceRandom};

fn line(width: Option<f64>) -> StrokeShape {
    StrokeShape::from_svg_path("M0 0 L100 0", width).unwrap()
}

#[test]
fn count_stays_within_profile_range() {
    let shape = line(Some(2.0));
    let mut rng = Rng64::new(7);
    for t in Texture::ALL {
        let p = t.profile();
        let mut seen_min = false;
        let mut seen_max = false;
        for _ in 0..1000 {
            let n = generate_shadows(&shape, &p, &mut rng).len() as u32;
            assert!(n >= p.shadow_count.0 && n <= p.shadow_count.1, "{t}: {n}");
            seen_min |= n == p.shadow_count.0;
            seen_max |= n == p.shadow_count.1;
        }
        assert!(seen_min && seen_max, "{t} never hit both ends");
    }
}

#[test]
fn sampled_values_respect_profile_bounds() {
    let shape = line(Some(3.0));
    let mut rng = Rng64::new(99);
    for t in Texture::ALL {
        let p = t.profile();
        for _ in 0..200 {
            for s in generate_shadows(&shape, &p, &mut rng) {
                assert!(s.is_shadow());
                assert!(s.opacity >= p.opacity.0 && s.opacity <= p.opacity.1);
                assert!(s.stroke_width >= 3.0);
                assert!(s.stroke_width <= 3.0 + p.width_jitter_max);
                assert!(s.offset.x.abs() <= p.offset_max / 2.0);
                assert!(s.offset.y.abs() <= p.offset_max / 2.0);
                assert_eq!(s.filter_id, p.filter_id);
                assert_eq!(s.texture, t);
            }
        }
    }
}

#[test]
fn missing_width_jitters_from_four() {
    let shape = line(None);
    let p = Texture::Marker.profile();
    // count draw, then width/opacity/x/y per shadow.
    let mut rng = SequenceRandom::new(vec![0.0, 0.0, 0.0, 0.5, 0.5]);
    let shadows = generate_shadows(&shape, &p, &mut rng);
    assert_eq!(shadows.len(), 2);
    assert_eq!(shadows[0].stroke_width, 4.0);
    assert_eq!(shadows[0].opacity, 0.40);
    assert_eq!(shadows[0].offset, Vec2::new(0.0, 0.0));
}

#[test]
fn draw_order_is_width_opacity_x_y() {
    let shape = line(Some(1.0));
    let p = Texture::Pencil.profile();
    let mut rng = SequenceRandom::new(vec![0.0, 0.5, 0.5, 1.0, 0.0]);
    let s = &generate_shadows(&shape, &p, &mut rng)[0];
    assert!((s.stroke_width - (1.0 + 0.4)).abs() < 1e-12);
    assert!((s.opacity - 0.30).abs() < 1e-12);
    assert!((s.offset.x - 0.75).abs() < 1e-9);
    assert!((s.offset.y + 0.75).abs() < 1e-12);
}

#[test]
fn offsets_are_sampled_independently() {
    let shape = line(None);
    let p = Texture::Watercolor.profile();
    let mut rng = Rng64::new(5);
    let differing = (0..100)
        .flat_map(|_| generate_shadows(&shape, &p, &mut rng))
        .filter(|s| (s.offset.x - s.offset.y).abs() > 1e-9)
        .count();
    assert!(differing > 0);
}
