use std::collections::HashMap;
use std::sync::Arc;

use rayon::prelude::*;

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRange, Millis};
use crate::foundation::error::{ScribbleError, ScribbleResult};
use crate::foundation::math::Fnv1a64;
use crate::render::raster::{FrameRGBA, rasterize_svg};
use crate::render::svg::{SvgOpts, snapshot_svg};
use crate::scene::loader::Scene;
use crate::stage::tree::Stage;

/// Options controlling range rendering.
#[derive(Clone, Debug)]
pub struct RenderOpts {
    /// Output frame rate.
    pub fps: Fps,
    /// Document options for every frame.
    pub svg: SvgOpts,
    /// Render each chunk's frames on a dedicated rayon pool.
    pub parallel: bool,
    /// Frames rendered per batch before they are pushed to the sink.
    pub chunk_size: usize,
    /// Override the number of rayon worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
    /// Rasterize identical consecutive frames once (the held final drawing, idle gaps).
    pub static_frame_elision: bool,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            fps: Fps { num: 30, den: 1 },
            svg: SvgOpts::default(),
            parallel: true,
            chunk_size: 32,
            threads: None,
            static_frame_elision: true,
        }
    }
}

/// Range render statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct RenderStats {
    /// Total frames in the requested range.
    pub frames_total: u64,
    /// Frames actually rasterized.
    pub frames_rendered: u64,
    /// Frames reused from an identical earlier frame.
    pub frames_elided: u64,
}

/// Frames needed to show the stage until `settled_at`, then hold it for `hold`.
pub fn timeline_range(fps: Fps, settled_at: Millis, hold: Millis) -> FrameRange {
    let span = settled_at.max(Millis::ZERO) + hold.max(Millis::ZERO);
    FrameRange {
        start: FrameIndex(0),
        end: FrameIndex(fps.frames_covering(span)),
    }
}

/// Rasterize the stage at `t`.
pub fn render_frame(
    scene: &Scene,
    stage: &Stage,
    t: Millis,
    canvas: Canvas,
    svg: &SvgOpts,
) -> ScribbleResult<FrameRGBA> {
    rasterize_svg(&snapshot_svg(scene, stage, t, svg), canvas)
}

/// Render `range` and push every frame to `sink` in strictly increasing order.
#[tracing::instrument(skip(scene, stage, opts, sink), fields(frames = range.len_frames()))]
pub fn render_range(
    scene: &Scene,
    stage: &Stage,
    range: FrameRange,
    canvas: Canvas,
    opts: &RenderOpts,
    sink: &mut dyn FrameSink,
) -> ScribbleResult<RenderStats> {
    let chunk_size = normalized_chunk_size(opts.chunk_size).min(range.len_frames().max(1));
    let pool = if opts.parallel {
        Some(build_thread_pool(opts.threads)?)
    } else {
        None
    };

    sink.begin(SinkConfig {
        width: canvas.width,
        height: canvas.height,
        fps: opts.fps,
    })?;

    let mut stats = RenderStats::default();
    // Last frame of the previous chunk, so a hold spanning chunks is still elided.
    let mut carry: Option<(u64, Arc<FrameRGBA>)> = None;
    let mut chunk_start = range.start.0;
    while chunk_start < range.end.0 {
        let chunk_end = (chunk_start + chunk_size).min(range.end.0);

        let svgs: Vec<String> = (chunk_start..chunk_end)
            .map(|f| snapshot_svg(scene, stage, opts.fps.frame_to_millis(FrameIndex(f)), &opts.svg))
            .collect();

        // Map every frame of the chunk to a unique document.
        let mut unique: Vec<usize> = Vec::new();
        let mut frame_to_unique: Vec<usize> = Vec::with_capacity(svgs.len());
        let mut seen = HashMap::<u64, usize>::new();
        let mut keys = Vec::with_capacity(svgs.len());
        for (i, svg) in svgs.iter().enumerate() {
            let key = fingerprint(svg);
            keys.push(key);
            if !opts.static_frame_elision {
                frame_to_unique.push(unique.len());
                unique.push(i);
                continue;
            }
            let u = *seen.entry(key).or_insert_with(|| {
                unique.push(i);
                unique.len() - 1
            });
            frame_to_unique.push(u);
        }

        let render_one = |&i: &usize| -> ScribbleResult<Arc<FrameRGBA>> {
            if opts.static_frame_elision
                && let Some((key, frame)) = carry.as_ref()
                && *key == keys[i]
            {
                return Ok(frame.clone());
            }
            rasterize_svg(&svgs[i], canvas).map(Arc::new)
        };
        let rendered: Vec<Arc<FrameRGBA>> = match pool.as_ref() {
            Some(pool) => pool.install(|| {
                unique
                    .par_iter()
                    .map(render_one)
                    .collect::<ScribbleResult<Vec<_>>>()
            })?,
            None => unique
                .iter()
                .map(render_one)
                .collect::<ScribbleResult<Vec<_>>>()?,
        };

        let reused = if opts.static_frame_elision {
            unique
                .iter()
                .filter(|&&i| carry.as_ref().is_some_and(|(key, _)| *key == keys[i]))
                .count() as u64
        } else {
            0
        };
        let chunk_len = chunk_end - chunk_start;
        let rasterized = unique.len() as u64 - reused;
        stats.frames_total += chunk_len;
        stats.frames_rendered += rasterized;
        stats.frames_elided += chunk_len - rasterized;

        for (i, f) in (chunk_start..chunk_end).enumerate() {
            sink.push_frame(FrameIndex(f), &rendered[frame_to_unique[i]])?;
        }

        if let (Some(&key), Some(&u)) = (keys.last(), frame_to_unique.last()) {
            carry = Some((key, rendered[u].clone()));
        }
        chunk_start = chunk_end;
    }

    sink.end()?;
    tracing::debug!(
        rendered = stats.frames_rendered,
        elided = stats.frames_elided,
        "range rendered"
    );
    Ok(stats)
}

fn fingerprint(svg: &str) -> u64 {
    let mut h = Fnv1a64::new(0);
    h.write_bytes(svg.as_bytes());
    h.write_u64(svg.len() as u64);
    h.finish()
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    if chunk_size == 0 {
        1
    } else {
        chunk_size as u64
    }
}

fn build_thread_pool(threads: Option<usize>) -> ScribbleResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ScribbleError::validation(
            "render 'threads' must be >= 1 when set",
        ));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ScribbleError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/frames.rs"]
mod tests;
