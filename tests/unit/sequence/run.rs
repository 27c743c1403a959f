use super::*;
use crate::foundation::rng::{Rng64, SequenceRandom};
use crate::stage::tree::{ElementRole, MutationKind};

fn lines(lengths: &[f64]) -> Vec<StrokeShape> {
    lengths
        .iter()
        .map(|l| StrokeShape::from_svg_path(&format!("M0 0 L{l} 0"), Some(2.0)).unwrap())
        .collect()
}

#[test]
fn begin_appends_and_hides_every_original() {
    let mut stage = Stage::new();
    let shapes = lines(&[10.0, 20.0]);
    let run = SequenceRun::begin(
        &mut stage,
        &shapes,
        Texture::Pencil.profile(),
        SequenceOpts::default(),
        Millis(0.0),
    )
    .unwrap();
    assert_eq!(stage.elements().len(), 2);
    assert!(stage
        .elements()
        .iter()
        .all(|e| e.style.opacity_at(Millis(0.0)) == 0.0));
    assert_eq!(run.phases(), &[ShapePhase::Hidden, ShapePhase::Hidden]);
}

#[test]
fn one_step_draws_exactly_one_shape() {
    let mut stage = Stage::new();
    let shapes = lines(&[100.0, 100.0]);
    let mut run = SequenceRun::begin(
        &mut stage,
        &shapes,
        Texture::Marker.profile(),
        SequenceOpts::default(),
        Millis(0.0),
    )
    .unwrap();
    // count -> 2, four draws per shadow, then duration sample 0.5 -> 350ms.
    let mut rng = SequenceRandom::new(vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.1, 0.2, 0.3, 0.4, 0.5]);
    let step = run.step(&mut stage, &mut rng, Millis(0.0)).unwrap();
    assert_eq!(step, Step::Sleep(Millis(390.0)));
    assert_eq!(
        run.phases(),
        &[ShapePhase::Animating, ShapePhase::Hidden]
    );

    let roles: Vec<bool> = stage.elements().iter().map(|e| e.is_shadow()).collect();
    assert_eq!(roles, vec![true, true, false, false]);
    for e in &stage.elements()[..3] {
        let tr = e.style.transition.unwrap();
        assert_eq!(tr.from, e.length);
        assert_eq!(tr.to, 0.0);
        assert_eq!(tr.duration, Millis(350.0));
    }
    assert!(stage.elements()[3].style.transition.is_none());
}

#[test]
fn steps_finish_with_settled_and_settle_every_shape() {
    let mut stage = Stage::new();
    let shapes = lines(&[5.0, 6.0, 7.0]);
    let mut run = SequenceRun::begin(
        &mut stage,
        &shapes,
        Texture::Crayon.profile(),
        SequenceOpts::default(),
        Millis(0.0),
    )
    .unwrap();
    let mut rng = Rng64::new(3);
    let mut now = Millis(0.0);
    let mut sleeps = 0;
    loop {
        match run.step(&mut stage, &mut rng, now).unwrap() {
            Step::Sleep(d) => {
                assert!(d.0 >= 240.0 && d.0 < 540.0);
                now = now + d;
                sleeps += 1;
            }
            Step::Settled => break,
            Step::Superseded => panic!("not superseded"),
        }
    }
    assert_eq!(sleeps, 3);
    assert!(run.phases().iter().all(|p| *p == ShapePhase::Settled));

    let report = run.into_report(RunOutcome::Settled, now);
    assert_eq!(report.shapes.len(), 3);
    assert_eq!(report.texture, Texture::Crayon);
    assert!(report.shadow_count() >= 12 && report.shadow_count() <= 18);
    for pair in report.shapes.windows(2) {
        assert_eq!(pair[1].started_at, pair[0].resumes_at);
    }
}

#[test]
fn shadows_are_anchored_to_their_own_original() {
    let mut stage = Stage::new();
    let shapes = lines(&[10.0, 10.0]);
    let mut run = SequenceRun::begin(
        &mut stage,
        &shapes,
        Texture::Pastel.profile(),
        SequenceOpts::default(),
        Millis(0.0),
    )
    .unwrap();
    let mut rng = Rng64::new(11);
    let Step::Sleep(d) = run.step(&mut stage, &mut rng, Millis(0.0)).unwrap() else {
        panic!("expected sleep");
    };
    run.step(&mut stage, &mut rng, d).unwrap();

    let els = stage.elements();
    let mut current_anchor = None;
    for e in els.iter().rev() {
        match e.role {
            ElementRole::Original { .. } => current_anchor = Some(e.id),
            ElementRole::Shadow { of, .. } => assert_eq!(Some(of), current_anchor),
        }
    }
}

#[test]
fn stale_run_reports_superseded_without_mutating() {
    let mut stage = Stage::new();
    let shapes = lines(&[10.0]);
    let mut old = SequenceRun::begin(
        &mut stage,
        &shapes,
        Texture::Pencil.profile(),
        SequenceOpts::default(),
        Millis(0.0),
    )
    .unwrap();
    let _new = SequenceRun::begin(
        &mut stage,
        &shapes,
        Texture::Marker.profile(),
        SequenceOpts::default(),
        Millis(5.0),
    )
    .unwrap();
    let before = stage.events().len();
    let mut rng = Rng64::new(1);
    assert_eq!(
        old.step(&mut stage, &mut rng, Millis(6.0)).unwrap(),
        Step::Superseded
    );
    assert_eq!(stage.events().len(), before);
}

#[test]
fn layout_flush_sits_between_priming_and_transitions() {
    let mut stage = Stage::new();
    let shapes = lines(&[10.0]);
    let mut run = SequenceRun::begin(
        &mut stage,
        &shapes,
        Texture::Marker.profile(),
        SequenceOpts::default(),
        Millis(0.0),
    )
    .unwrap();
    run.step(&mut stage, &mut Rng64::new(4), Millis(0.0)).unwrap();

    let kinds: Vec<&MutationKind> = stage.events().iter().map(|e| &e.kind).collect();
    let flush = kinds
        .iter()
        .position(|k| **k == MutationKind::LayoutFlushed)
        .unwrap();
    assert!(kinds[..flush]
        .iter()
        .any(|k| matches!(k, MutationKind::Primed { .. })));
    assert!(kinds[flush..]
        .iter()
        .all(|k| !matches!(k, MutationKind::Primed { .. })));
    assert!(kinds[flush..]
        .iter()
        .filter(|k| matches!(k, MutationKind::TransitionStarted { coalesced: false, .. }))
        .count()
        >= 3);
}

#[test]
fn opts_validation() {
    assert!(SequenceOpts::default().validate().is_ok());
    let inverted = SequenceOpts {
        min_duration_ms: 600.0,
        ..Default::default()
    };
    assert!(inverted.validate().is_err());
    let negative = SequenceOpts {
        settle_pad_ms: -1.0,
        ..Default::default()
    };
    assert!(negative.validate().is_err());
}
