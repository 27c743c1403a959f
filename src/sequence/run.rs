use crate::foundation::core::Millis;
use crate::foundation::error::{ScribbleError, ScribbleResult};
use crate::foundation::rng::RandomSource;
use crate::scene::shape::StrokeShape;
use crate::shadow::generate::generate_shadows;
use crate::stage::tree::{ElementId, RunToken, Stage};
use crate::texture::profile::{Texture, TextureProfile};

/// Timing knobs for the per-shape reveal.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SequenceOpts {
    /// Shortest per-shape draw duration (inclusive).
    pub min_duration_ms: f64,
    /// Longest per-shape draw duration (exclusive).
    pub max_duration_ms: f64,
    /// Extra wait after each shape's draw before the next one starts.
    pub settle_pad_ms: f64,
}

impl Default for SequenceOpts {
    fn default() -> Self {
        Self {
            min_duration_ms: 200.0,
            max_duration_ms: 500.0,
            settle_pad_ms: 40.0,
        }
    }
}

impl SequenceOpts {
    /// Reject negative, non-finite or inverted ranges.
    pub fn validate(&self) -> ScribbleResult<()> {
        let all = [self.min_duration_ms, self.max_duration_ms, self.settle_pad_ms];
        if all.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(ScribbleError::validation(
                "sequence durations must be finite and >= 0",
            ));
        }
        if self.min_duration_ms > self.max_duration_ms {
            return Err(ScribbleError::validation(
                "sequence min_duration_ms must be <= max_duration_ms",
            ));
        }
        Ok(())
    }
}

/// Progress of one shape through its reveal. Only ever moves forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapePhase {
    /// In the tree, opacity 0.
    Hidden,
    /// Shadows inserted beneath it.
    ShadowsAttached,
    /// Dash fully retracted, visible, layout flushed.
    Primed,
    /// Dash offset transition running.
    Animating,
    /// Fully drawn.
    Settled,
}

/// When and how one shape was drawn.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ShapeTiming {
    /// Index in the scene.
    pub shape: usize,
    /// Stage element of the original stroke.
    pub element: ElementId,
    /// Shadows inserted beneath it.
    pub shadows: usize,
    /// Traceable length of the stroke.
    pub length: f64,
    /// When priming and the transitions started.
    pub started_at: Millis,
    /// Shared transition duration.
    pub duration: Millis,
    /// When the sequencer moved on to the next shape.
    pub resumes_at: Millis,
}

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// Every shape drawn.
    Settled,
    /// A newer run took over the stage before this one finished.
    Superseded,
}

/// Summary of a finished run.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RunReport {
    /// Medium used for every shape of the run.
    pub texture: Texture,
    /// How the run ended.
    pub outcome: RunOutcome,
    /// Stage generation the run owned.
    pub generation: u64,
    /// When the run cleared the stage.
    pub started_at: Millis,
    /// When the run ended (last resume for settled runs).
    pub finished_at: Millis,
    /// Per-shape timings for the shapes that were started.
    pub shapes: Vec<ShapeTiming>,
}

impl RunReport {
    /// Total shadows inserted by the run.
    pub fn shadow_count(&self) -> usize {
        self.shapes.iter().map(|s| s.shadows).sum()
    }
}

/// What the sequencer wants next.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step {
    /// Call again after this long.
    Sleep(Millis),
    /// All shapes drawn.
    Settled,
    /// The stage belongs to a newer run; nothing was changed.
    Superseded,
}

/// One pass over a scene's strokes: each shape primed, revealed, then waited out, strictly in turn.
#[derive(Debug)]
pub struct SequenceRun {
    token: RunToken,
    profile: TextureProfile,
    opts: SequenceOpts,
    shapes: Vec<StrokeShape>,
    originals: Vec<ElementId>,
    phases: Vec<ShapePhase>,
    timings: Vec<ShapeTiming>,
    started_at: Millis,
    cursor: usize,
}

impl SequenceRun {
    /// Clear the stage, append every stroke in order and hide them all.
    pub fn begin(
        stage: &mut Stage,
        shapes: &[StrokeShape],
        profile: TextureProfile,
        opts: SequenceOpts,
        now: Millis,
    ) -> ScribbleResult<Self> {
        let token = stage.begin_run(now);
        let mut originals = Vec::with_capacity(shapes.len());
        if let Some(mut edit) = stage.edit(token, now) {
            for (i, shape) in shapes.iter().enumerate() {
                originals.push(edit.append_original(i, shape));
            }
            for &id in &originals {
                edit.hide(id)?;
            }
        }
        tracing::debug!(
            generation = token.generation(),
            texture = %profile.texture,
            shapes = shapes.len(),
            "sequence run started"
        );

        Ok(Self {
            token,
            profile,
            opts,
            shapes: shapes.to_vec(),
            originals,
            phases: vec![ShapePhase::Hidden; shapes.len()],
            timings: Vec::with_capacity(shapes.len()),
            started_at: now,
            cursor: 0,
        })
    }

    /// Token of the stage generation this run owns.
    pub fn token(&self) -> RunToken {
        self.token
    }

    /// Profile applied to every shape.
    pub fn profile(&self) -> &TextureProfile {
        &self.profile
    }

    /// Current phase of every shape.
    pub fn phases(&self) -> &[ShapePhase] {
        &self.phases
    }

    /// Draw the next shape, or finish.
    pub fn step(
        &mut self,
        stage: &mut Stage,
        rng: &mut dyn RandomSource,
        now: Millis,
    ) -> ScribbleResult<Step> {
        let Some(mut edit) = stage.edit(self.token, now) else {
            tracing::debug!(generation = self.token.generation(), "run superseded");
            return Ok(Step::Superseded);
        };

        if let Some(prev) = self.cursor.checked_sub(1) {
            self.advance(prev, ShapePhase::Settled);
        }
        if self.cursor >= self.shapes.len() {
            return Ok(Step::Settled);
        }

        let i = self.cursor;
        self.cursor += 1;
        let shape = self.shapes[i].clone();
        let original = self.originals[i];

        let shadows = generate_shadows(&shape, &self.profile, rng);
        let mut batch = Vec::with_capacity(shadows.len() + 1);
        for shadow in &shadows {
            batch.push(edit.insert_shadow_before(original, &shape, shadow)?);
        }
        batch.push(original);
        self.advance(i, ShapePhase::ShadowsAttached);

        for &id in &batch {
            edit.prime(id)?;
        }
        edit.force_layout();
        self.advance(i, ShapePhase::Primed);

        let duration = Millis(rng.uniform(self.opts.min_duration_ms, self.opts.max_duration_ms));
        for &id in &batch {
            edit.animate_dash_offset(id, 0.0, duration)?;
        }
        self.advance(i, ShapePhase::Animating);

        let wait = duration + Millis(self.opts.settle_pad_ms);
        self.timings.push(ShapeTiming {
            shape: i,
            element: original,
            shadows: shadows.len(),
            length: shape.total_length(),
            started_at: now,
            duration,
            resumes_at: now + wait,
        });
        tracing::debug!(
            shape = i,
            shadows = shadows.len(),
            length = shape.total_length(),
            %duration,
            "shape reveal started"
        );

        Ok(Step::Sleep(wait))
    }

    /// Consume the run into its report.
    pub fn into_report(self, outcome: RunOutcome, now: Millis) -> RunReport {
        RunReport {
            texture: self.profile.texture,
            outcome,
            generation: self.token.generation(),
            started_at: self.started_at,
            finished_at: now,
            shapes: self.timings,
        }
    }

    fn advance(&mut self, shape: usize, to: ShapePhase) {
        let phase = &mut self.phases[shape];
        debug_assert!(*phase <= to, "shape phase moved backwards");
        *phase = (*phase).max(to);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/run.rs"]
mod tests;
