use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Instant;

use crate::foundation::core::Millis;
use crate::foundation::error::{ScribbleError, ScribbleResult};
use crate::foundation::rng::RandomSource;
use crate::scene::shape::StrokeShape;
use crate::sequence::run::{RunOutcome, RunReport, SequenceOpts, SequenceRun, Step};
use crate::stage::tree::Stage;
use crate::texture::select::{TextureRequest, resolve_texture};

/// Timeline source for the event loop.
pub trait Clock {
    /// Current timeline position.
    fn now(&self) -> Millis;
    /// Wait until `t` (no-op when `t` is already past).
    fn advance_to(&mut self, t: Millis);
}

/// Clock that jumps straight to the next due timer.
#[derive(Clone, Copy, Debug, Default)]
pub struct VirtualClock {
    now: Millis,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock starting at `now`.
    pub fn starting_at(now: Millis) -> Self {
        Self { now }
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> Millis {
        self.now
    }

    fn advance_to(&mut self, t: Millis) {
        self.now = self.now.max(t);
    }
}

/// Wall clock; `advance_to` sleeps the calling thread.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Millis {
        Millis(self.origin.elapsed().as_secs_f64() * 1000.0)
    }

    fn advance_to(&mut self, t: Millis) {
        let wait = t - self.now();
        if wait.0 > 0.0 {
            std::thread::sleep(wait.to_duration());
        }
    }
}

/// Handle to a run started on an [`EventLoop`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct RunId(pub u32);

#[derive(Clone, Copy, Debug)]
struct Timer {
    due: Millis,
    seq: u64,
    run: RunId,
}

impl PartialEq for Timer {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Timer {}

impl PartialOrd for Timer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timer {
    // Earliest due first; equal due times fire in scheduling order.
    fn cmp(&self, other: &Self) -> Ordering {
        self.due
            .0
            .total_cmp(&other.due.0)
            .then(self.seq.cmp(&other.seq))
    }
}

#[derive(Debug)]
enum RunSlot {
    Active(SequenceRun),
    Finished(RunReport),
    Taken,
}

/// Single-threaded cooperative scheduler that owns the stage.
///
/// Each timer fires exactly one sequencer step. Runs never overlap on the stage: starting a new
/// run supersedes any run still in flight.
pub struct EventLoop<C: Clock, R: RandomSource> {
    clock: C,
    rng: R,
    stage: Stage,
    timers: BinaryHeap<Reverse<Timer>>,
    runs: Vec<RunSlot>,
    next_seq: u64,
}

impl<C: Clock, R: RandomSource> EventLoop<C, R> {
    /// Loop over an empty stage.
    pub fn new(clock: C, rng: R) -> Self {
        Self::with_stage(Stage::new(), clock, rng)
    }

    /// Loop over an existing stage (its next run clears it).
    pub fn with_stage(stage: Stage, clock: C, rng: R) -> Self {
        Self {
            clock,
            rng,
            stage,
            timers: BinaryHeap::new(),
            runs: Vec::new(),
            next_seq: 0,
        }
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn into_stage(self) -> Stage {
        self.stage
    }

    pub fn now(&self) -> Millis {
        self.clock.now()
    }

    /// `true` when no timer is pending.
    pub fn is_idle(&self) -> bool {
        self.timers.is_empty()
    }

    /// Start drawing `shapes` now.
    ///
    /// Options and texture are resolved before the stage is touched, so a failure leaves the
    /// previous drawing in place.
    #[tracing::instrument(skip(self, shapes), fields(shapes = shapes.len()))]
    pub fn start(
        &mut self,
        shapes: &[StrokeShape],
        request: TextureRequest,
        opts: &SequenceOpts,
    ) -> ScribbleResult<RunId> {
        opts.validate()?;
        let profile = resolve_texture(request, &mut self.rng);
        let now = self.clock.now();
        let run = SequenceRun::begin(&mut self.stage, shapes, profile, *opts, now)?;

        let id = RunId(self.runs.len() as u32);
        self.runs.push(RunSlot::Active(run));
        self.schedule(now, id);
        Ok(id)
    }

    /// Fire the next timer. Returns `false` when nothing was pending.
    pub fn fire_next(&mut self) -> ScribbleResult<bool> {
        let Some(Reverse(timer)) = self.timers.pop() else {
            return Ok(false);
        };
        self.clock.advance_to(timer.due);
        let now = self.clock.now();

        let slot = self
            .runs
            .get_mut(timer.run.0 as usize)
            .ok_or_else(|| ScribbleError::validation(format!("unknown run {}", timer.run.0)))?;
        let RunSlot::Active(run) = slot else {
            return Ok(true);
        };

        match run.step(&mut self.stage, &mut self.rng, now)? {
            Step::Sleep(wait) => self.schedule(now + wait, timer.run),
            Step::Settled => self.finish(timer.run, RunOutcome::Settled, now),
            Step::Superseded => {
                tracing::warn!(run = timer.run.0, "run superseded by a newer one; dropped");
                self.finish(timer.run, RunOutcome::Superseded, now);
            }
        }
        Ok(true)
    }

    /// Fire timers until none remain.
    pub fn run_until_idle(&mut self) -> ScribbleResult<()> {
        while self.fire_next()? {}
        Ok(())
    }

    /// Fire every timer due at or before `t`, then move the clock to `t`.
    pub fn run_until(&mut self, t: Millis) -> ScribbleResult<()> {
        while self
            .timers
            .peek()
            .is_some_and(|Reverse(timer)| timer.due <= t)
        {
            self.fire_next()?;
        }
        self.clock.advance_to(t);
        Ok(())
    }

    /// Report of a finished run, if it has finished and was not taken yet.
    pub fn report(&self, id: RunId) -> Option<&RunReport> {
        match self.runs.get(id.0 as usize)? {
            RunSlot::Finished(report) => Some(report),
            _ => None,
        }
    }

    /// Move a finished run's report out of the loop.
    pub fn take_report(&mut self, id: RunId) -> Option<RunReport> {
        let slot = self.runs.get_mut(id.0 as usize)?;
        match std::mem::replace(slot, RunSlot::Taken) {
            RunSlot::Finished(report) => Some(report),
            other => {
                *slot = other;
                None
            }
        }
    }

    fn schedule(&mut self, due: Millis, run: RunId) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.push(Reverse(Timer { due, seq, run }));
    }

    fn finish(&mut self, id: RunId, outcome: RunOutcome, now: Millis) {
        let Some(slot) = self.runs.get_mut(id.0 as usize) else {
            return;
        };
        if let RunSlot::Active(run) = std::mem::replace(slot, RunSlot::Taken) {
            let report = run.into_report(outcome, now);
            tracing::debug!(
                run = id.0,
                outcome = ?report.outcome,
                shadows = report.shadow_count(),
                finished_at = %report.finished_at,
                "run finished"
            );
            *slot = RunSlot::Finished(report);
        }
    }
}

/// A settled stage and the report of the run that drew it.
#[derive(Debug)]
pub struct SequenceOutcome {
    pub stage: Stage,
    pub report: RunReport,
}

/// Draw `shapes` one after another and return once the whole sequence has settled.
pub fn run_sequence<C: Clock, R: RandomSource>(
    shapes: &[StrokeShape],
    request: TextureRequest,
    opts: &SequenceOpts,
    clock: C,
    rng: R,
) -> ScribbleResult<SequenceOutcome> {
    let mut event_loop = EventLoop::new(clock, rng);
    let id = event_loop.start(shapes, request, opts)?;
    event_loop.run_until_idle()?;
    let report = event_loop
        .take_report(id)
        .ok_or_else(|| ScribbleError::validation("sequence ended without a report"))?;
    Ok(SequenceOutcome {
        stage: event_loop.into_stage(),
        report,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/event_loop.rs"]
mod tests;
