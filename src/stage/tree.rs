use std::sync::Arc;

use smallvec::SmallVec;

use crate::foundation::core::{Affine, BezPath, Cap, Join, Millis, Rgba8, Vec2};
use crate::foundation::error::{ScribbleError, ScribbleResult};
use crate::scene::shape::StrokeShape;
use crate::shadow::generate::ShadowInstance;
use crate::texture::profile::Texture;

/// Stable handle to an element on the stage.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ElementId(pub u32);

/// Proof that a run is the stage's current one.
///
/// Obtained from [`Stage::begin_run`]. Once a newer run begins, older tokens stop granting edits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RunToken {
    generation: u64,
}

impl RunToken {
    /// Generation this token was issued for.
    pub fn generation(self) -> u64 {
        self.generation
    }
}

/// Whether an element is a loaded stroke or a texture copy of one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum ElementRole {
    /// A stroke from the loaded scene (index into the scene's shapes).
    Original {
        /// Index of the source shape.
        shape: usize,
    },
    /// A shadow painted beneath its original.
    Shadow {
        /// The original this shadow belongs to.
        of: ElementId,
        /// Medium that produced it.
        texture: Texture,
    },
}

/// Linear dash-offset animation.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct DashTransition {
    /// Offset at `start`.
    pub from: f64,
    /// Offset at `start + duration`.
    pub to: f64,
    /// Timeline position the transition begins.
    pub start: Millis,
    /// Transition length.
    pub duration: Millis,
}

impl DashTransition {
    /// Offset at `t`, clamped to the endpoints outside the transition window.
    pub fn value_at(&self, t: Millis) -> f64 {
        if self.duration.0 <= 0.0 {
            return if t >= self.start { self.to } else { self.from };
        }
        let k = ((t - self.start).0 / self.duration.0).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * k
    }

    /// Timeline position the transition completes.
    pub fn end(&self) -> Millis {
        self.start + self.duration
    }
}

/// Presentation state of an element, as set through [`StageEdit`].
#[derive(Clone, Debug, Default)]
pub struct DrawStyle {
    /// Opacity changes in timeline order. Empty means the element was never styled (fully shown).
    pub(crate) opacity_log: SmallVec<[(Millis, f64); 2]>,
    /// Dash array length, once primed.
    pub dash_array: Option<f64>,
    /// Specified dash offset.
    pub dash_offset: Option<f64>,
    /// When the dash was first primed.
    pub primed_at: Option<Millis>,
    /// Dash offset as of the last layout flush.
    committed_offset: Option<f64>,
    /// Specified values not yet seen by a layout flush.
    dirty: bool,
    /// Active dash offset animation.
    pub transition: Option<DashTransition>,
}

impl DrawStyle {
    /// Opacity as of `t`.
    pub fn opacity_at(&self, t: Millis) -> f64 {
        self.opacity_log
            .iter()
            .rev()
            .find(|(at, _)| *at <= t)
            .map(|(_, v)| *v)
            .unwrap_or(1.0)
    }

    /// Dash offset as of `t`, or `None` before the dash was primed.
    pub fn dash_offset_at(&self, t: Millis) -> Option<f64> {
        let primed_at = self.primed_at?;
        if t < primed_at {
            return None;
        }
        match self.transition {
            Some(tr) if t >= tr.start => Some(tr.value_at(t)),
            _ => self.committed_offset.or(self.dash_offset),
        }
    }
}

/// One painted stroke in the render tree.
#[derive(Clone, Debug)]
pub struct Element {
    /// Handle.
    pub id: ElementId,
    /// Original or shadow.
    pub role: ElementRole,
    /// Geometry shared with the source shape.
    pub path: Arc<BezPath>,
    /// Placement of the geometry on the canvas.
    pub transform: Affine,
    /// Extra translation (shadows only).
    pub offset: Vec2,
    /// Ink color.
    pub color: Rgba8,
    /// Painted stroke width.
    pub stroke_width: f64,
    /// Stroke opacity multiplier.
    pub stroke_opacity: f64,
    /// Line end style, copied from the source shape.
    pub cap: Cap,
    /// Corner style, copied from the source shape.
    pub join: Join,
    /// Filter reference, if any.
    pub filter_id: Option<&'static str>,
    /// Traceable length of `path`.
    pub length: f64,
    /// When the element entered the tree.
    pub inserted_at: Millis,
    /// Presentation state.
    pub style: DrawStyle,
}

impl Element {
    /// `true` for texture copies.
    pub fn is_shadow(&self) -> bool {
        matches!(self.role, ElementRole::Shadow { .. })
    }

    /// Full placement: the shadow offset applied in canvas space on top of the stroke's transform.
    pub fn placement(&self) -> Affine {
        Affine::translate(self.offset) * self.transform
    }
}

/// What a mutation did.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MutationKind {
    /// Tree emptied for a new run.
    Cleared,
    /// Original stroke appended.
    Appended,
    /// Opacity set to 0.
    Hidden,
    /// Shadow inserted directly before `anchor`.
    InsertedBefore {
        /// The original the shadow precedes.
        anchor: ElementId,
    },
    /// Dash array and offset set to the full length, opacity set to 1.
    Primed {
        /// Dash length used.
        length: f64,
    },
    /// Pending styles committed.
    LayoutFlushed,
    /// Dash offset animation requested.
    TransitionStarted {
        /// Animation length.
        duration: Millis,
        /// `true` when the primed state was never flushed, so the change applied instantly.
        coalesced: bool,
    },
}

/// Timestamped record of one applied mutation.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct MutationEvent {
    /// When it happened.
    pub at: Millis,
    /// Run generation that made it.
    pub generation: u64,
    /// Element touched, if any.
    pub element: Option<ElementId>,
    /// What happened.
    pub kind: MutationKind,
}

/// The render tree strokes are drawn into.
///
/// Elements are kept in paint order. Only the current run may change them, see [`Stage::edit`].
#[derive(Clone, Debug, Default)]
pub struct Stage {
    elements: Vec<Element>,
    events: Vec<MutationEvent>,
    generation: u64,
    next_id: u32,
}

impl Stage {
    /// Empty stage with no run.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the tree and start a new run generation. Older tokens are invalidated.
    pub fn begin_run(&mut self, now: Millis) -> RunToken {
        self.generation += 1;
        self.elements.clear();
        self.events.push(MutationEvent {
            at: now,
            generation: self.generation,
            element: None,
            kind: MutationKind::Cleared,
        });
        RunToken {
            generation: self.generation,
        }
    }

    /// Current run generation (0 before any run).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// `true` when `token` belongs to the current run.
    pub fn is_current(&self, token: RunToken) -> bool {
        token.generation == self.generation
    }

    /// Editing handle for the current run, or `None` for a superseded token.
    pub fn edit(&mut self, token: RunToken, now: Millis) -> Option<StageEdit<'_>> {
        if !self.is_current(token) {
            return None;
        }
        Some(StageEdit { stage: self, now })
    }

    /// Elements in paint order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Look up an element.
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Every applied mutation, across all runs, in order.
    pub fn events(&self) -> &[MutationEvent] {
        &self.events
    }

    /// Time the last transition of the current tree completes (or the last mutation, if later).
    pub fn settled_at(&self) -> Millis {
        let last_event = self
            .events
            .iter()
            .rev()
            .find(|e| e.generation == self.generation)
            .map(|e| e.at)
            .unwrap_or(Millis::ZERO);
        self.elements
            .iter()
            .filter_map(|e| e.style.transition.map(|t| t.end()))
            .fold(last_event, Millis::max)
    }

    fn position(&self, id: ElementId) -> ScribbleResult<usize> {
        self.elements
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| ScribbleError::validation(format!("no stage element {}", id.0)))
    }

    fn alloc_id(&mut self) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        id
    }

    fn log(&mut self, at: Millis, element: Option<ElementId>, kind: MutationKind) {
        self.events.push(MutationEvent {
            at,
            generation: self.generation,
            element,
            kind,
        });
    }
}

/// Mutations available to the current run, all stamped with the same timeline position.
pub struct StageEdit<'a> {
    stage: &'a mut Stage,
    now: Millis,
}

impl StageEdit<'_> {
    /// Timeline position of this edit.
    pub fn now(&self) -> Millis {
        self.now
    }

    /// Append a loaded stroke at the top of the paint order.
    pub fn append_original(&mut self, shape_index: usize, shape: &StrokeShape) -> ElementId {
        let id = self.stage.alloc_id();
        self.stage.elements.push(Element {
            id,
            role: ElementRole::Original { shape: shape_index },
            path: shape.path.clone(),
            transform: shape.transform,
            offset: Vec2::ZERO,
            color: shape.color,
            stroke_width: shape.base_width(),
            stroke_opacity: shape.color.alpha_f64(),
            cap: shape.cap,
            join: shape.join,
            filter_id: None,
            length: shape.total_length(),
            inserted_at: self.now,
            style: DrawStyle::default(),
        });
        self.stage.log(self.now, Some(id), MutationKind::Appended);
        id
    }

    /// Set opacity to 0.
    pub fn hide(&mut self, id: ElementId) -> ScribbleResult<()> {
        let idx = self.stage.position(id)?;
        self.stage.elements[idx]
            .style
            .opacity_log
            .push((self.now, 0.0));
        self.stage.log(self.now, Some(id), MutationKind::Hidden);
        Ok(())
    }

    /// Insert a shadow of `shape` immediately before `anchor`, so the anchor paints on top.
    pub fn insert_shadow_before(
        &mut self,
        anchor: ElementId,
        shape: &StrokeShape,
        shadow: &ShadowInstance,
    ) -> ScribbleResult<ElementId> {
        let idx = self.stage.position(anchor)?;
        let id = self.stage.alloc_id();
        self.stage.elements.insert(
            idx,
            Element {
                id,
                role: ElementRole::Shadow {
                    of: anchor,
                    texture: shadow.texture,
                },
                path: shape.path.clone(),
                transform: shape.transform,
                offset: shadow.offset,
                color: shape.color,
                stroke_width: shadow.stroke_width,
                stroke_opacity: shadow.opacity,
                cap: shape.cap,
                join: shape.join,
                filter_id: Some(shadow.filter_id),
                length: shape.total_length(),
                inserted_at: self.now,
                style: DrawStyle::default(),
            },
        );
        self.stage
            .log(self.now, Some(id), MutationKind::InsertedBefore { anchor });
        Ok(id)
    }

    /// Retract the stroke fully (dash array and offset = own length) and make it visible.
    pub fn prime(&mut self, id: ElementId) -> ScribbleResult<()> {
        let idx = self.stage.position(id)?;
        let now = self.now;
        let el = &mut self.stage.elements[idx];
        let length = el.length;
        el.style.dash_array = Some(length);
        el.style.dash_offset = Some(length);
        el.style.primed_at.get_or_insert(now);
        el.style.dirty = true;
        el.style.opacity_log.push((now, 1.0));
        self.stage.log(now, Some(id), MutationKind::Primed { length });
        Ok(())
    }

    /// Commit every pending style so later transitions animate from it.
    pub fn force_layout(&mut self) {
        for el in &mut self.stage.elements {
            if el.style.dirty {
                el.style.committed_offset = el.style.dash_offset;
                el.style.dirty = false;
            }
        }
        self.stage.log(self.now, None, MutationKind::LayoutFlushed);
    }

    /// Animate the dash offset linearly to `to` over `duration`.
    ///
    /// Animates from the last committed value. If the element's current style was never flushed,
    /// the change lands instantly, the way a browser coalesces style writes within one frame.
    pub fn animate_dash_offset(
        &mut self,
        id: ElementId,
        to: f64,
        duration: Millis,
    ) -> ScribbleResult<()> {
        let idx = self.stage.position(id)?;
        let now = self.now;
        let el = &mut self.stage.elements[idx];
        let coalesced = el.style.dirty || el.style.committed_offset.is_none();
        let from = if coalesced {
            to
        } else {
            el.style.committed_offset.unwrap_or(to)
        };
        if coalesced {
            tracing::warn!(
                element = id.0,
                "dash transition requested without a layout flush; applied instantly"
            );
        }
        el.style.transition = Some(DashTransition {
            from,
            to,
            start: now,
            duration,
        });
        el.style.dash_offset = Some(to);
        el.style.dirty = true;
        self.stage.log(
            now,
            Some(id),
            MutationKind::TransitionStarted {
                duration,
                coalesced,
            },
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stage/tree.rs"]
mod tests;
