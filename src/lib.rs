//! Scribble draws line art the way a hand would.
//!
//! A scene's strokes are revealed one after another, each with a few jittered, filtered copies
//! ("shadows") painted beneath it to imitate a drawing medium. The flow is session-oriented:
//!
//! - Describe the run with a [`SketchConfig`]
//! - [`SketchSession::prepare`] loads the scene and draws it on a virtual clock
//! - Render single frames, stream a range into a [`FrameSink`], or export an animated SVG
//!
//! The building blocks ([`generate_shadows`], [`resolve_texture`], [`run_sequence`], the
//! [`Stage`]) are public for callers that drive the reveal themselves.
#![forbid(unsafe_code)]

mod foundation;

/// Frame sinks.
pub mod encode;
/// SVG, raster and frame-range output.
pub mod render;
/// Scene loading and the stroke model.
pub mod scene;
/// Sequential stroke reveal.
pub mod sequence;
/// Run configuration and prepared sketches.
pub mod session;
/// Shadow generation.
pub mod shadow;
/// The render tree.
pub mod stage;
/// Drawing media.
pub mod texture;

pub use crate::foundation::core::{
    Affine, BezPath, Canvas, Cap, Fps, FrameIndex, FrameRange, Join, Millis, Point, Rect, Rgba8,
    Vec2,
};
pub use crate::foundation::error::{ScribbleError, ScribbleResult};
pub use crate::foundation::rng::{RandomSource, Rng64, SequenceRandom};

pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::sink::{FrameSink, InMemorySink, PngSequenceSink, SinkConfig, write_png};
pub use crate::render::frames::{RenderOpts, RenderStats};
pub use crate::render::raster::FrameRGBA;
pub use crate::render::svg::SvgOpts;
pub use crate::scene::doodle::{DoodleRequest, PRESET_DOODLES};
pub use crate::scene::loader::{DirSceneLoader, Scene, SceneLoader, parse_scene};
pub use crate::scene::shape::StrokeShape;
pub use crate::sequence::event_loop::{
    Clock, EventLoop, RunId, SequenceOutcome, SystemClock, VirtualClock, run_sequence,
};
pub use crate::sequence::run::{RunOutcome, RunReport, SequenceOpts, ShapePhase, ShapeTiming};
pub use crate::session::config::SketchConfig;
pub use crate::session::sketch::{SketchPlan, SketchSession};
pub use crate::shadow::generate::{ShadowInstance, ShadowSet, generate_shadows};
pub use crate::stage::tree::{ElementId, MutationEvent, MutationKind, RunToken, Stage};
pub use crate::texture::profile::{Texture, TextureProfile};
pub use crate::texture::select::{TextureRequest, resolve_texture, resolve_texture_name};
