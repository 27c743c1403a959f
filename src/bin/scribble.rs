use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use scribble::{
    DoodleRequest, FfmpegSink, FfmpegSinkOpts, Millis, MutationEvent, MutationKind,
    PngSequenceSink, SketchConfig, SketchSession, SystemClock, Texture,
};

#[derive(Parser, Debug)]
#[command(name = "scribble", version, about = "Hand-drawn sketch animation")]
struct Cli {
    /// JSON run configuration. Flags below override its fields.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Scene to draw: `random` or a file name inside the assets directory.
    #[arg(long, global = true)]
    doodle: Option<String>,

    /// Medium: `random`, pencil, crayon, pastel, marker or watercolor.
    #[arg(long, global = true)]
    texture: Option<String>,

    /// Seed for every random choice.
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Assets directory.
    #[arg(long, global = true)]
    assets: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the resolved run as JSON.
    Plan,
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render the whole animation as MP4 (requires `ffmpeg` on PATH) or a PNG sequence.
    Render(RenderArgs),
    /// Write an SVG: animated by default, or a still with `--at-ms`.
    Export(ExportArgs),
    /// Draw in real time, printing every stage mutation as it happens.
    Play,
    /// List the drawing media and their shadow profiles.
    Textures,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Timeline position in milliseconds. Defaults to the finished drawing.
    #[arg(long)]
    at_ms: Option<f64>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Output MP4 path.
    #[arg(long, conflicts_with = "png_dir", required_unless_present = "png_dir")]
    out: Option<PathBuf>,

    /// Write numbered PNG frames into this directory instead.
    #[arg(long)]
    png_dir: Option<PathBuf>,

    /// x264 constant rate factor.
    #[arg(long)]
    crf: Option<u8>,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Output SVG path.
    #[arg(long)]
    out: PathBuf,

    /// Export a still of this timeline position instead of the animation.
    #[arg(long)]
    at_ms: Option<f64>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Command::Textures = cli.cmd {
        cmd_textures();
        return Ok(());
    }

    let cfg = build_config(&cli)?;
    let session = SketchSession::prepare_from_dir(cfg)?;
    match cli.cmd {
        Command::Plan => cmd_plan(&session),
        Command::Frame(args) => cmd_frame(&session, args),
        Command::Render(args) => cmd_render(&session, args),
        Command::Export(args) => cmd_export(&session, args),
        Command::Play => cmd_play(&session),
        Command::Textures => Ok(()),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_config(cli: &Cli) -> anyhow::Result<SketchConfig> {
    let mut cfg = match &cli.config {
        Some(path) => SketchConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => SketchConfig::default(),
    };
    if let Some(doodle) = &cli.doodle {
        cfg.doodle = DoodleRequest::from(doodle.as_str());
    }
    if let Some(texture) = &cli.texture {
        cfg.texture = texture.clone();
    }
    if let Some(seed) = cli.seed {
        cfg.seed = Some(seed);
    }
    if let Some(assets) = &cli.assets {
        cfg.assets_dir = assets.clone();
    }
    Ok(cfg)
}

fn cmd_plan(session: &SketchSession) -> anyhow::Result<()> {
    let plan = session.plan()?;
    println!(
        "{}",
        serde_json::to_string_pretty(&plan).context("serialize plan")?
    );
    Ok(())
}

fn cmd_frame(session: &SketchSession, args: FrameArgs) -> anyhow::Result<()> {
    let t = args.at_ms.map(Millis).unwrap_or_else(|| session.duration());
    let frame = session.render_frame_at(t)?;
    scribble::write_png(&args.out, &frame)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(session: &SketchSession, args: RenderArgs) -> anyhow::Result<()> {
    let (stats, out) = match (args.out, args.png_dir) {
        (_, Some(dir)) => {
            let mut sink = PngSequenceSink::new(&dir);
            (session.render_video(&mut sink, false)?, dir)
        }
        (Some(out), None) => {
            let mut opts = FfmpegSinkOpts::new(&out);
            opts.background = session.config().background();
            opts.crf = args.crf;
            let mut sink = FfmpegSink::new(opts);
            (session.render_video(&mut sink, true)?, out)
        }
        (None, None) => anyhow::bail!("either --out or --png-dir is required"),
    };
    eprintln!(
        "wrote {} ({} frames, {} rasterized)",
        out.display(),
        stats.frames_total,
        stats.frames_rendered
    );
    Ok(())
}

fn cmd_export(session: &SketchSession, args: ExportArgs) -> anyhow::Result<()> {
    let svg = match args.at_ms {
        Some(ms) => session.snapshot_svg(Millis(ms)),
        None => session.animated_svg(),
    };
    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, svg).with_context(|| format!("write svg '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_play(session: &SketchSession) -> anyhow::Result<()> {
    let report = session.replay(SystemClock::new(), print_event)?;
    eprintln!(
        "drew {} shapes with {} shadows in {}",
        report.shapes.len(),
        report.shadow_count(),
        report.finished_at
    );
    Ok(())
}

fn print_event(event: &MutationEvent) {
    let element = event
        .element
        .map(|id| format!("#{}", id.0))
        .unwrap_or_else(|| "-".to_string());
    let what = match &event.kind {
        MutationKind::Cleared => "cleared".to_string(),
        MutationKind::Appended => "appended".to_string(),
        MutationKind::Hidden => "hidden".to_string(),
        MutationKind::InsertedBefore { anchor } => format!("shadow before #{}", anchor.0),
        MutationKind::Primed { length } => format!("primed (length {length:.1})"),
        MutationKind::LayoutFlushed => "layout flushed".to_string(),
        MutationKind::TransitionStarted {
            duration,
            coalesced,
        } => {
            if *coalesced {
                format!("dash jump (coalesced, {duration})")
            } else {
                format!("dash transition {duration}")
            }
        }
    };
    println!("{:>9} {element:>5} {what}", event.at.to_string());
}

fn cmd_textures() {
    println!(
        "{:<11} {:>7} {:>8} {:>11} {:>7}",
        "texture", "shadows", "jitter", "opacity", "offset"
    );
    for t in Texture::ALL {
        let p = t.profile();
        println!(
            "{:<11} {:>7} {:>8.1} {:>11} {:>7.1}",
            t.name(),
            format!("{}-{}", p.shadow_count.0, p.shadow_count.1),
            p.width_jitter_max,
            format!("{:.2}-{:.2}", p.opacity.0, p.opacity.1),
            p.offset_max
        );
    }
}
