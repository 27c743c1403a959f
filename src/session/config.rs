use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::core::{Fps, Millis, Rgba8};
use crate::foundation::error::{ScribbleError, ScribbleResult};
use crate::render::frames::RenderOpts;
use crate::render::svg::SvgOpts;
use crate::scene::doodle::DoodleRequest;
use crate::sequence::run::SequenceOpts;

/// Everything one sketch run depends on. Every field has a default, so `{}` is a valid config.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SketchConfig {
    /// Directory scenes are loaded from.
    pub assets_dir: PathBuf,
    /// `"random"` or a file name inside `assets_dir`.
    pub doodle: DoodleRequest,
    /// `"random"` or a medium name. Checked when the session is prepared.
    pub texture: String,
    /// Seed for every random choice. `None` seeds from the clock.
    pub seed: Option<u64>,
    /// Output frames per second.
    pub fps: u32,
    /// Output pixels per document unit.
    pub scale: f64,
    /// Paper color, straight RGBA.
    pub background: [u8; 4],
    /// How long the finished drawing stays on screen in video output.
    pub hold_ms: f64,
    /// Per-shape reveal timing.
    pub sequence: SequenceOpts,
    /// Render frames on a rayon pool.
    pub parallel: bool,
    /// Frames per render batch.
    pub chunk_size: usize,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("assets"),
            doodle: DoodleRequest::Random,
            texture: "random".to_string(),
            seed: None,
            fps: 30,
            scale: 1.0,
            background: [255, 255, 255, 255],
            hold_ms: 1000.0,
            sequence: SequenceOpts::default(),
            parallel: true,
            chunk_size: 32,
        }
    }
}

impl SketchConfig {
    /// Parse a JSON config.
    pub fn from_json_str(s: &str) -> ScribbleResult<Self> {
        serde_json::from_str(s).map_err(|e| ScribbleError::serde(e.to_string()))
    }

    /// Read and parse a JSON config file.
    pub fn from_path(path: &Path) -> ScribbleResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Reject values no run could use.
    pub fn validate(&self) -> ScribbleResult<()> {
        if self.fps == 0 {
            return Err(ScribbleError::validation("fps must be > 0"));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(ScribbleError::validation("scale must be finite and > 0"));
        }
        if !self.hold_ms.is_finite() || self.hold_ms < 0.0 {
            return Err(ScribbleError::validation("hold_ms must be finite and >= 0"));
        }
        if self.chunk_size == 0 {
            return Err(ScribbleError::validation("chunk_size must be >= 1"));
        }
        self.sequence.validate()
    }

    /// Output frame rate.
    pub fn fps(&self) -> ScribbleResult<Fps> {
        Fps::new(self.fps, 1)
    }

    /// Paper color.
    pub fn background(&self) -> Rgba8 {
        Rgba8::from(self.background)
    }

    /// Hold after the drawing settles.
    pub fn hold(&self) -> Millis {
        Millis(self.hold_ms)
    }

    /// Document options derived from this config.
    pub fn svg_opts(&self) -> SvgOpts {
        SvgOpts {
            background: Some(self.background()),
            scale: self.scale,
        }
    }

    /// Range rendering options derived from this config.
    pub fn render_opts(&self) -> ScribbleResult<RenderOpts> {
        Ok(RenderOpts {
            fps: self.fps()?,
            svg: self.svg_opts(),
            parallel: self.parallel,
            chunk_size: self.chunk_size,
            ..RenderOpts::default()
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/config.rs"]
mod tests;
