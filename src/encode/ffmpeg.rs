use std::io::{Read as _, Write as _};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use anyhow::Context as _;

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{FrameIndex, Rgba8};
use crate::foundation::error::{ScribbleError, ScribbleResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::raster::FrameRGBA;

/// Options for [`FfmpegSink`] MP4 output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
    /// Paper color transparent pixels are flattened onto.
    pub background: Rgba8,
    /// x264 constant rate factor. `None` keeps the encoder default.
    pub crf: Option<u8>,
}

impl FfmpegSinkOpts {
    /// Options for writing an MP4 to `out_path` on white paper.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            background: Rgba8::WHITE,
            crf: None,
        }
    }

    fn command(&self, cfg: &SinkConfig) -> Command {
        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .arg(if self.overwrite { "-y" } else { "-n" })
            .args(["-loglevel", "error", "-f", "rawvideo", "-pix_fmt", "rgba"])
            .args(["-s", &format!("{}x{}", cfg.width, cfg.height)])
            .args(["-r", &format!("{}/{}", cfg.fps.num, cfg.fps.den)])
            .args(["-i", "pipe:0", "-an", "-c:v", "libx264", "-pix_fmt", "yuv420p"]);
        if let Some(crf) = self.crf {
            cmd.args(["-crf", &crf.to_string()]);
        }
        cmd.args(["-movflags", "+faststart"]).arg(&self.out_path);
        cmd
    }
}

/// Streams flattened frames into a system `ffmpeg` producing h264/yuv420p MP4.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    encoder: Option<Encoder>,
}

impl FfmpegSink {
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            encoder: None,
        }
    }

    fn prepare_output(&self) -> ScribbleResult<()> {
        let out = &self.opts.out_path;
        if let Some(dir) = out.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating video directory {}", dir.display()))?;
        }
        if !self.opts.overwrite && out.exists() {
            return Err(ScribbleError::validation(format!(
                "{} exists and overwrite is off",
                out.display()
            )));
        }
        Ok(())
    }
}

/// One live ffmpeg process, from `begin` to `end`.
struct Encoder {
    child: Child,
    stdin: ChildStdin,
    // ffmpeg blocks once its stderr pipe fills, so it is read on the side.
    stderr: JoinHandle<String>,
    cfg: SinkConfig,
    scratch: Vec<u8>,
    last: Option<FrameIndex>,
}

impl Encoder {
    fn spawn(mut cmd: Command, cfg: SinkConfig) -> ScribbleResult<Self> {
        let mut child = cmd
            .spawn()
            .map_err(|e| ScribbleError::render(format!("cannot start ffmpeg: {e}")))?;
        let (Some(stdin), Some(mut pipe)) = (child.stdin.take(), child.stderr.take()) else {
            return Err(ScribbleError::render("ffmpeg started without stdio pipes"));
        };
        let stderr = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            let _ = pipe.read_to_end(&mut bytes);
            String::from_utf8_lossy(&bytes).trim().to_owned()
        });
        let scratch = vec![0u8; cfg.width as usize * cfg.height as usize * 4];
        Ok(Self {
            child,
            stdin,
            stderr,
            cfg,
            scratch,
            last: None,
        })
    }

    fn write(&mut self, idx: FrameIndex, frame: &FrameRGBA, background: Rgba8) -> ScribbleResult<()> {
        if let Some(last) = self.last
            && idx.0 <= last.0
        {
            return Err(ScribbleError::render(format!(
                "frame {} arrived after frame {}",
                idx.0, last.0
            )));
        }
        if (frame.width, frame.height) != (self.cfg.width, self.cfg.height) {
            return Err(ScribbleError::validation(format!(
                "frame is {}x{} but the video is {}x{}",
                frame.width, frame.height, self.cfg.width, self.cfg.height
            )));
        }
        self.last = Some(idx);
        flatten_over_background(&mut self.scratch, frame, background)?;
        self.stdin
            .write_all(&self.scratch)
            .map_err(|e| ScribbleError::render(format!("ffmpeg stopped reading frames: {e}")))
    }

    fn finish(self) -> ScribbleResult<()> {
        let Self {
            mut child,
            stdin,
            stderr,
            ..
        } = self;
        drop(stdin);
        let status = child
            .wait()
            .map_err(|e| ScribbleError::render(format!("lost track of ffmpeg: {e}")))?;
        let log = stderr.join().unwrap_or_default();
        if status.success() {
            Ok(())
        } else {
            Err(ScribbleError::render(format!("ffmpeg failed ({status}): {log}")))
        }
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> ScribbleResult<()> {
        if cfg.fps.num == 0 || cfg.fps.den == 0 {
            return Err(ScribbleError::validation("video fps must be non-zero"));
        }
        // yuv420p subsamples chroma 2x2.
        if [cfg.width, cfg.height].iter().any(|&d| d == 0 || !d.is_multiple_of(2)) {
            return Err(ScribbleError::validation(format!(
                "video size {}x{} must be non-zero and even",
                cfg.width, cfg.height
            )));
        }
        self.prepare_output()?;
        if !is_ffmpeg_on_path() {
            return Err(ScribbleError::render("MP4 output needs ffmpeg on PATH"));
        }

        tracing::debug!(
            out = %self.opts.out_path.display(),
            width = cfg.width,
            height = cfg.height,
            "spawning ffmpeg"
        );
        self.encoder = Some(Encoder::spawn(self.opts.command(&cfg), cfg)?);
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ScribbleResult<()> {
        let background = self.opts.background;
        self.encoder
            .as_mut()
            .ok_or_else(|| ScribbleError::render("no video in progress"))?
            .write(idx, frame, background)
    }

    fn end(&mut self) -> ScribbleResult<()> {
        self.encoder
            .take()
            .ok_or_else(|| ScribbleError::render("no video in progress"))?
            .finish()
    }
}

/// Composite `frame` over an opaque `background` into `dst` (opaque RGBA8).
fn flatten_over_background(dst: &mut [u8], frame: &FrameRGBA, background: Rgba8) -> ScribbleResult<()> {
    if dst.len() != frame.data.len() || !dst.len().is_multiple_of(4) {
        return Err(ScribbleError::validation(format!(
            "frame holds {} bytes, expected {}",
            frame.data.len(),
            dst.len()
        )));
    }

    let paper = [background.r, background.g, background.b];
    for (out, px) in dst.chunks_exact_mut(4).zip(frame.data.chunks_exact(4)) {
        let alpha = u16::from(px[3]);
        for ((o, &ink), &bg) in out.iter_mut().zip(&px[..3]).zip(&paper) {
            let ink = if frame.premultiplied {
                u16::from(ink)
            } else {
                mul_div255_u16(u16::from(ink), alpha)
            };
            *o = (ink + mul_div255_u16(u16::from(bg), 255 - alpha)).min(255) as u8;
        }
        out[3] = u8::MAX;
    }
    Ok(())
}

/// `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
