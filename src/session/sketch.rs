use crate::encode::sink::FrameSink;
use crate::foundation::core::{Canvas, Millis};
use crate::foundation::error::{ScribbleError, ScribbleResult};
use crate::foundation::math::derive_seed;
use crate::foundation::rng::Rng64;
use crate::render::frames::{RenderStats, render_frame, render_range, timeline_range};
use crate::render::raster::{FrameRGBA, canvas_for};
use crate::render::svg::{animated_svg, snapshot_svg};
use crate::scene::loader::{DirSceneLoader, Scene, SceneLoader};
use crate::sequence::event_loop::{Clock, EventLoop, VirtualClock, run_sequence};
use crate::sequence::run::RunReport;
use crate::session::config::SketchConfig;
use crate::stage::tree::{MutationEvent, Stage};
use crate::texture::profile::Texture;
use crate::texture::select::{TextureRequest, resolve_texture_name};

/// A loaded scene drawn once on a virtual clock, ready to be rendered or exported.
///
/// Preparing resolves the doodle and the texture, loads the scene and runs the whole reveal
/// offline. Every output is then a pure function of the settled stage.
#[derive(Debug)]
pub struct SketchSession {
    cfg: SketchConfig,
    seed: u64,
    doodle: String,
    texture: Texture,
    scene: Scene,
    stage: Stage,
    report: RunReport,
}

/// Serializable summary of a prepared sketch.
#[derive(Clone, Debug, serde::Serialize)]
pub struct SketchPlan {
    /// Scene id that was loaded.
    pub doodle: String,
    /// Medium used for every shadow.
    pub texture: Texture,
    /// Seed every random choice derived from.
    pub seed: u64,
    /// Document width.
    pub width: f64,
    /// Document height.
    pub height: f64,
    /// Output frame rate.
    pub fps: u32,
    /// Time until the last stroke settles.
    pub duration_ms: Millis,
    /// Frames in the rendered video, hold included.
    pub total_frames: u64,
    /// The run itself.
    pub run: RunReport,
}

impl SketchSession {
    /// Load from `cfg.assets_dir`.
    pub fn prepare_from_dir(cfg: SketchConfig) -> ScribbleResult<Self> {
        let loader = DirSceneLoader::new(cfg.assets_dir.clone());
        Self::prepare(cfg, &loader)
    }

    /// Resolve, load and draw.
    ///
    /// Doodle and texture are resolved before anything is loaded, so an unknown texture fails
    /// without touching the assets.
    #[tracing::instrument(skip(cfg, loader))]
    pub fn prepare(cfg: SketchConfig, loader: &dyn SceneLoader) -> ScribbleResult<Self> {
        cfg.validate()?;
        let seed = cfg.seed.unwrap_or_else(|| Rng64::from_entropy().next_u64());

        let mut pick = Rng64::new(derive_seed(seed, "selection"));
        let doodle = cfg.doodle.resolve(&mut pick);
        let texture = resolve_texture_name(&cfg.texture, &mut pick)?.texture;
        tracing::info!("Loading: {doodle}, Texture: {texture}");

        let scene = loader.load_scene(&doodle)?;
        let out = run_sequence(
            &scene.shapes,
            TextureRequest::Named(texture),
            &cfg.sequence,
            VirtualClock::new(),
            Rng64::new(derive_seed(seed, "sequence")),
        )?;
        tracing::info!(
            shapes = scene.shapes.len(),
            shadows = out.report.shadow_count(),
            finished_at = %out.report.finished_at,
            "sketch drawn"
        );

        Ok(Self {
            cfg,
            seed,
            doodle,
            texture,
            scene,
            stage: out.stage,
            report: out.report,
        })
    }

    pub fn config(&self) -> &SketchConfig {
        &self.cfg
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn doodle(&self) -> &str {
        &self.doodle
    }

    pub fn texture(&self) -> Texture {
        self.texture
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn report(&self) -> &RunReport {
        &self.report
    }

    /// Time the drawing is complete.
    pub fn duration(&self) -> Millis {
        self.report.finished_at.max(self.stage.settled_at())
    }

    /// Output pixel canvas. `even` rounds both sides up to even values for video encoders.
    pub fn canvas(&self, even: bool) -> ScribbleResult<Canvas> {
        canvas_for(self.scene.width, self.scene.height, self.cfg.scale, even)
    }

    /// Still SVG of the drawing at `t`.
    pub fn snapshot_svg(&self, t: Millis) -> String {
        snapshot_svg(&self.scene, &self.stage, t, &self.cfg.svg_opts())
    }

    /// Self-contained animated SVG of the whole reveal.
    pub fn animated_svg(&self) -> String {
        animated_svg(&self.scene, &self.stage, &self.cfg.svg_opts())
    }

    /// Rasterize the drawing at `t`.
    pub fn render_frame_at(&self, t: Millis) -> ScribbleResult<FrameRGBA> {
        render_frame(
            &self.scene,
            &self.stage,
            t,
            self.canvas(false)?,
            &self.cfg.svg_opts(),
        )
    }

    /// Render the reveal plus the configured hold into `sink`.
    pub fn render_video(&self, sink: &mut dyn FrameSink, even: bool) -> ScribbleResult<RenderStats> {
        let opts = self.cfg.render_opts()?;
        let range = timeline_range(opts.fps, self.duration(), self.cfg.hold());
        render_range(&self.scene, &self.stage, range, self.canvas(even)?, &opts, sink)
    }

    /// Summary of this sketch.
    pub fn plan(&self) -> ScribbleResult<SketchPlan> {
        let fps = self.cfg.fps()?;
        Ok(SketchPlan {
            doodle: self.doodle.clone(),
            texture: self.texture,
            seed: self.seed,
            width: self.scene.width,
            height: self.scene.height,
            fps: self.cfg.fps,
            duration_ms: self.duration(),
            total_frames: timeline_range(fps, self.duration(), self.cfg.hold()).len_frames(),
            run: self.report.clone(),
        })
    }

    /// Draw the scene again on `clock`, reporting each mutation as it is applied.
    ///
    /// Uses the same seed as [`SketchSession::prepare`], so it replays the same drawing.
    pub fn replay<C: Clock>(
        &self,
        clock: C,
        mut on_event: impl FnMut(&MutationEvent),
    ) -> ScribbleResult<RunReport> {
        let rng = Rng64::new(derive_seed(self.seed, "sequence"));
        let mut event_loop = EventLoop::new(clock, rng);
        let id = event_loop.start(
            &self.scene.shapes,
            TextureRequest::Named(self.texture),
            &self.cfg.sequence,
        )?;

        let mut seen = 0;
        loop {
            let events = event_loop.stage().events();
            for event in &events[seen..] {
                on_event(event);
            }
            seen = events.len();
            if !event_loop.fire_next()? {
                break;
            }
        }

        event_loop
            .take_report(id)
            .ok_or_else(|| ScribbleError::validation("replay ended without a report"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/sketch.rs"]
mod tests;
