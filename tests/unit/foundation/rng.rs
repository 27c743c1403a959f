use super::*;

#[test]
fn rng_is_deterministic() {
    let mut a = Rng64::new(123);
    let mut b = Rng64::new(123);
    for _ in 0..10 {
        assert_eq!(a.next_u64(), b.next_u64());
    }
}

#[test]
fn samples_stay_in_unit_interval() {
    let mut rng = Rng64::new(9);
    for _ in 0..10_000 {
        let v = rng.next_f64();
        assert!((0.0..1.0).contains(&v));
    }
}

#[test]
fn uniform_inclusive_hits_both_ends() {
    let mut rng = Rng64::new(42);
    let mut seen = [false; 3];
    for _ in 0..1000 {
        let v = rng.uniform_inclusive(2, 4);
        assert!((2..=4).contains(&v));
        seen[(v - 2) as usize] = true;
    }
    assert_eq!(seen, [true, true, true]);
    assert_eq!(rng.uniform_inclusive(5, 5), 5);
}

#[test]
fn sequence_random_replays_and_cycles() {
    let mut r = SequenceRandom::new(vec![0.25, 0.5]);
    assert_eq!(r.next_f64(), 0.25);
    assert_eq!(r.next_f64(), 0.5);
    assert_eq!(r.next_f64(), 0.25);
    assert!(SequenceRandom::new(vec![1.0]).next_f64() < 1.0);
}

#[test]
fn pick_index_maps_top_of_range_to_last() {
    let mut r = SequenceRandom::new(vec![0.999_999]);
    assert_eq!(r.pick_index(5), 4);
    let mut r = SequenceRandom::new(vec![0.0]);
    assert_eq!(r.pick_index(5), 0);
}
