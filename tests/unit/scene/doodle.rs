use super::*;
use crate::foundation::rng::SequenceRandom;

#[test]
fn random_picks_among_presets() {
    let mut rng = SequenceRandom::new(vec![0.0, 0.5, 0.99]);
    let req = DoodleRequest::Random;
    assert_eq!(req.resolve(&mut rng), "doodle_01.svg");
    assert_eq!(req.resolve(&mut rng), "doodle_03.svg");
    assert_eq!(req.resolve(&mut rng), "doodle_05.svg");
}

#[test]
fn named_passes_through_without_sampling() {
    let mut rng = SequenceRandom::new(Vec::new());
    let req = DoodleRequest::from("custom/cat.svg");
    assert_eq!(req.resolve(&mut rng), "custom/cat.svg");
    assert_eq!(DoodleRequest::from(" Random "), DoodleRequest::Random);
}
