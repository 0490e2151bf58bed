use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use scrollscape::{
    AmbientConfig, AmbientField, Animated, CanvasComponent, FrameRGBA, FrameSequence,
    FrameSequenceLoader, FrameSource, HeadlessHost, HostEvent, Point, PointerEvent,
    ScrollScrubber, ScrubberConfig, Viewport,
};

#[derive(Parser, Debug)]
#[command(name = "scrollscape", version)]
struct Cli {
    /// Log debug output to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the frame shown at one scroll position as a PNG.
    Scrub(ScrubArgs),
    /// Render evenly spaced scroll positions to numbered PNGs.
    Sweep(SweepArgs),
    /// Run the particle field for a number of ticks and write the last frame.
    Ambient(AmbientArgs),
}

#[derive(Args, Debug)]
struct SurfaceArgs {
    /// Surface width in logical pixels.
    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    /// Surface height in logical pixels.
    #[arg(long, default_value_t = 720.0)]
    height: f64,

    /// Device pixel ratio.
    #[arg(long)]
    dpr: Option<f64>,
}

impl SurfaceArgs {
    fn viewport(&self) -> Viewport {
        let vp = Viewport::new(self.width, self.height);
        match self.dpr {
            Some(d) => vp.with_device_pixel_ratio(d),
            None => vp,
        }
    }
}

#[derive(Parser, Debug)]
struct ScrubArgs {
    /// Directory holding the frame images.
    #[arg(long)]
    frames: PathBuf,

    /// Scroll progress in [0, 1].
    #[arg(long)]
    progress: f64,

    /// Scrubber config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    surface: SurfaceArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct SweepArgs {
    /// Directory holding the frame images.
    #[arg(long)]
    frames: PathBuf,

    /// Number of progress samples, including both ends.
    #[arg(long, default_value_t = 10)]
    steps: usize,

    /// Scrubber config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    surface: SurfaceArgs,

    /// Output directory for `sweep-NNNN.png` files.
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct AmbientArgs {
    /// Ticks to run before capturing.
    #[arg(long, default_value_t = 60)]
    ticks: usize,

    /// Pointer position as `x,y` in logical pixels.
    #[arg(long, value_parser = parse_point)]
    pointer: Option<Point>,

    /// Palette seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,

    /// Use the side-panel variant (fixed grid).
    #[arg(long, default_value_t = false)]
    panel: bool,

    /// Ambient config JSON; overrides `--panel`.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    surface: SurfaceArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Scrub(args) => cmd_scrub(args),
        Command::Sweep(args) => cmd_sweep(args),
        Command::Ambient(args) => cmd_ambient(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}

fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected 'x,y', got '{s}'"))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("bad x '{x}': {e}"))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("bad y '{y}': {e}"))?;
    Ok(Point::new(x, y))
}

fn load_frames(dir: &Path, config: &ScrubberConfig) -> anyhow::Result<FrameSequence> {
    let sources = FrameSource::discover(dir, &config.extensions)?;
    if sources.is_empty() {
        anyhow::bail!("no frames found in '{}'", dir.display());
    }
    let loader = FrameSequenceLoader::new(&config.frame_pattern)?;
    let seq = loader.load_blocking(sources);
    eprintln!(
        "loaded {} frames ({} failed)",
        seq.len(),
        seq.failed_count()
    );
    Ok(seq)
}

fn scrubber_config(path: Option<&Path>) -> anyhow::Result<ScrubberConfig> {
    let cfg = match path {
        Some(p) => ScrubberConfig::from_path(p)?,
        None => ScrubberConfig::default(),
    };
    cfg.validate()?;
    Ok(cfg)
}

fn cmd_scrub(args: ScrubArgs) -> anyhow::Result<()> {
    let config = scrubber_config(args.config.as_deref())?;
    let seq = load_frames(&args.frames, &config)?;

    let mut host = HeadlessHost::new(args.surface.viewport());
    let mut comp = Animated::new(ScrollScrubber::with_sequence(config, seq)?, Default::default());
    comp.init(&mut host)?;
    host.push_event(HostEvent::Scroll(args.progress));
    host.pump(&mut comp);

    let frame = comp
        .scene()
        .frame()
        .context("no frame could be drawn at this progress")?;
    write_png(&args.out, &frame)?;
    comp.teardown(&mut host);

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_sweep(args: SweepArgs) -> anyhow::Result<()> {
    if args.steps == 0 {
        anyhow::bail!("--steps must be at least 1");
    }
    let config = scrubber_config(args.config.as_deref())?;
    let seq = load_frames(&args.frames, &config)?;

    let mut host = HeadlessHost::new(args.surface.viewport());
    let mut comp = Animated::new(ScrollScrubber::with_sequence(config, seq)?, Default::default());
    comp.init(&mut host)?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let last = args.steps.saturating_sub(1).max(1) as f64;
    let mut written = 0usize;
    for k in 0..args.steps {
        host.push_event(HostEvent::Scroll(k as f64 / last));
        host.pump(&mut comp);
        let Some(frame) = comp.scene().frame() else {
            tracing::warn!(step = k, "nothing presented yet; skipping");
            continue;
        };
        write_png(&args.out_dir.join(format!("sweep-{k:04}.png")), &frame)?;
        written += 1;
    }
    comp.teardown(&mut host);

    eprintln!("wrote {written} frames to {}", args.out_dir.display());
    Ok(())
}

fn cmd_ambient(args: AmbientArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(p) => AmbientConfig::from_path(p)?,
        None if args.panel => AmbientConfig::panel(),
        None => AmbientConfig::background(),
    };
    if args.seed.is_some() {
        config.palette_seed = args.seed;
    }
    let step = config.time_step;

    let mut host = HeadlessHost::new(args.surface.viewport());
    let mut comp = Animated::new(AmbientField::new(config)?, step);
    comp.init(&mut host)?;
    if let Some(p) = args.pointer {
        host.push_event(HostEvent::Pointer(PointerEvent::Move(p)));
    }
    host.run(&mut comp, args.ticks.max(1));

    let frame = comp.scene().frame().context("surface could not be drawn")?;
    write_png(&args.out, &frame)?;
    comp.teardown(&mut host);

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn write_png(path: &Path, frame: &FrameRGBA) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        &frame.to_straight_rgba8(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))
}
