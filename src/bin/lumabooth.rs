use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use image::RgbaImage;
use tokio::sync::broadcast;

use lumabooth::{
    encode_jpeg, encode_png, load_slot_image, render_animation, render_strip, AnimateOptions,
    CaptureEngine, CaptureOptions, CompositionSpec, Countdown, FfmpegSink, FilterPreset,
    FooterFonts, OutputFormat, Pacing, PrerollGroup, PreparedStickers, Session, SessionEvent,
    SyntheticSource,
};

#[derive(Parser, Debug)]
#[command(name = "lumabooth", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a static photostrip from a composition spec.
    Strip(StripArgs),
    /// Render a looping MP4 from a captured session (requires `ffmpeg` on PATH).
    Animate(AnimateArgs),
    /// Run a live 4-shot capture session and persist it to a directory.
    Capture(CaptureArgs),
}

#[derive(Parser, Debug)]
struct StripArgs {
    /// Composition spec JSON (slot image paths resolve against its directory).
    #[arg(long)]
    spec: PathBuf,

    /// Output image path.
    #[arg(long)]
    out: PathBuf,

    /// Encode JPEG at share quality instead of the spec's output format.
    #[arg(long)]
    jpeg: bool,
}

#[derive(Parser, Debug)]
struct AnimateArgs {
    /// Composition spec JSON.
    #[arg(long)]
    spec: PathBuf,

    /// Session directory written by `lumabooth capture`.
    #[arg(long)]
    session: PathBuf,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Output frames per second.
    #[arg(long, default_value_t = 12)]
    fps: u32,

    /// Loop segment length in seconds.
    #[arg(long, default_value_t = 3.0)]
    seconds: f64,

    /// How many times the segment repeats.
    #[arg(long, default_value_t = 2)]
    repetitions: u32,

    /// Render without inter-frame pacing (offline encoding).
    #[arg(long)]
    fast: bool,
}

#[derive(Parser, Debug)]
struct CaptureArgs {
    /// Directory to write stills, pre-roll frames, and session.json into.
    #[arg(long)]
    out_dir: PathBuf,

    /// Countdown seconds per shot (3, 5, or 10).
    #[arg(long, default_value_t = 3)]
    countdown: u32,

    /// Capture filter preset name.
    #[arg(long, default_value = "none")]
    filter: String,

    /// Synthetic source width (ignored with --camera).
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Synthetic source height (ignored with --camera).
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Capture from the default webcam instead of the synthetic source.
    #[cfg(feature = "camera")]
    #[arg(long)]
    camera: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Strip(args) => cmd_strip(args),
        Command::Animate(args) => cmd_animate(args).await,
        Command::Capture(args) => cmd_capture(args).await,
    }
}

fn read_spec(path: &Path) -> anyhow::Result<CompositionSpec> {
    let f = File::open(path).with_context(|| format!("open spec '{}'", path.display()))?;
    let spec: CompositionSpec =
        serde_json::from_reader(BufReader::new(f)).with_context(|| "parse spec JSON")?;
    spec.validate()?;
    Ok(spec)
}

fn load_slots(spec: &CompositionSpec, root: &Path) -> anyhow::Result<Vec<Option<RgbaImage>>> {
    let mut slots = Vec::with_capacity(spec.slots.len());
    for path in &spec.slots {
        slots.push(match path {
            Some(p) => Some(load_slot_image(&root.join(p))?),
            None => None,
        });
    }
    Ok(slots)
}

fn cmd_strip(args: StripArgs) -> anyhow::Result<()> {
    let spec = read_spec(&args.spec)?;
    let root = args.spec.parent().unwrap_or_else(|| Path::new("."));
    let slots = load_slots(&spec, root)?;
    let stickers = PreparedStickers::prepare(&spec.stickers, root);
    let fonts = FooterFonts::load(&spec.fonts);

    let strip = render_strip(&slots, &spec, &stickers, &fonts)?;
    let bytes = if args.jpeg || spec.output == OutputFormat::Jpeg {
        encode_jpeg(&strip)?
    } else {
        encode_png(&strip)?
    };
    std::fs::write(&args.out, bytes)
        .with_context(|| format!("write output '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

async fn cmd_animate(args: AnimateArgs) -> anyhow::Result<()> {
    let spec = read_spec(&args.spec)?;
    let root = args.spec.parent().unwrap_or_else(|| Path::new("."));
    let session = read_session_dir(&args.session)?;
    let stickers = PreparedStickers::prepare(&spec.stickers, root);
    let fonts = FooterFonts::load(&spec.fonts);

    let opts = AnimateOptions {
        fps: args.fps,
        segment_seconds: args.seconds,
        repetitions: args.repetitions,
        pacing: if args.fast {
            Pacing::Immediate
        } else {
            Pacing::Realtime
        },
    };
    let mut sink = FfmpegSink::new(&args.out);
    let stats = render_animation(&session, &spec, &stickers, &fonts, &opts, &mut sink).await?;
    eprintln!(
        "wrote {} ({} frames)",
        args.out.display(),
        stats.frames_pushed
    );
    Ok(())
}

async fn cmd_capture(args: CaptureArgs) -> anyhow::Result<()> {
    let countdown = Countdown::try_from(args.countdown)?;
    let filter: FilterPreset = args.filter.parse()?;
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create session dir '{}'", args.out_dir.display()))?;

    let engine = CaptureEngine::new(CaptureOptions {
        filter,
        ..CaptureOptions::default()
    });
    let mut rx = engine.subscribe();
    let ticker = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(SessionEvent::CountingDown {
                    shot,
                    seconds_remaining,
                }) => eprintln!("shot {}: {seconds_remaining}...", shot + 1),
                Ok(SessionEvent::Shutter { shot }) => eprintln!("shot {}: *click*", shot + 1),
                Ok(SessionEvent::Complete { shots }) => {
                    eprintln!("session complete ({shots} shots)")
                }
                Ok(SessionEvent::Cancelled { shots }) => {
                    eprintln!("session cancelled ({shots} shots)")
                }
                Ok(SessionEvent::Idle) => {}
                Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let mut session = Session::live(countdown, filter);
    run_capture(&engine, &args, &mut session).await?;
    drop(engine);
    let _ = ticker.await;

    write_session_dir(&session, &args.out_dir)?;
    eprintln!("wrote {}", args.out_dir.join("session.json").display());
    Ok(())
}

#[cfg(feature = "camera")]
async fn run_capture(
    engine: &CaptureEngine,
    args: &CaptureArgs,
    session: &mut Session,
) -> anyhow::Result<()> {
    if args.camera {
        let mut source = lumabooth::CameraSource::open(0)?;
        engine.run_session(&mut source, session).await?;
    } else {
        let mut source = SyntheticSource::new(args.width, args.height)?;
        engine.run_session(&mut source, session).await?;
    }
    Ok(())
}

#[cfg(not(feature = "camera"))]
async fn run_capture(
    engine: &CaptureEngine,
    args: &CaptureArgs,
    session: &mut Session,
) -> anyhow::Result<()> {
    let mut source = SyntheticSource::new(args.width, args.height)?;
    engine.run_session(&mut source, session).await?;
    Ok(())
}

fn write_session_dir(session: &Session, dir: &Path) -> anyhow::Result<()> {
    let mut shot_files = Vec::new();
    for (i, shot) in session.shots().iter().enumerate() {
        let name = format!("shot_{i}.png");
        shot.save(dir.join(&name))
            .with_context(|| format!("write still {name}"))?;
        shot_files.push(name);
    }
    for (i, group) in session.preroll_groups().iter().enumerate() {
        let sub = dir.join(format!("preroll_{i}"));
        std::fs::create_dir_all(&sub)
            .with_context(|| format!("create pre-roll dir '{}'", sub.display()))?;
        for (j, frame) in group.frames().iter().enumerate() {
            frame
                .save(sub.join(format!("frame_{j:02}.png")))
                .with_context(|| format!("write pre-roll frame {i}/{j}"))?;
        }
    }
    let manifest = session.manifest(shot_files);
    let f = File::create(dir.join("session.json")).with_context(|| "create session.json")?;
    serde_json::to_writer_pretty(f, &manifest).with_context(|| "write session.json")?;
    Ok(())
}

fn read_session_dir(dir: &Path) -> anyhow::Result<Session> {
    let f = File::open(dir.join("session.json"))
        .with_context(|| format!("open '{}/session.json'", dir.display()))?;
    let manifest: lumabooth::SessionManifest =
        serde_json::from_reader(BufReader::new(f)).with_context(|| "parse session.json")?;

    let mut shots = Vec::with_capacity(manifest.shots.len());
    for name in &manifest.shots {
        shots.push(load_slot_image(&dir.join(name))?);
    }
    let mut groups = Vec::with_capacity(manifest.preroll_frames.len());
    for (i, count) in manifest.preroll_frames.iter().enumerate() {
        let mut frames = Vec::with_capacity(*count);
        for j in 0..*count {
            frames.push(load_slot_image(
                &dir.join(format!("preroll_{i}")).join(format!("frame_{j:02}.png")),
            )?);
        }
        groups.push(PrerollGroup::from_raw(frames, lumabooth::PREROLL_MAX_KEPT));
    }
    let countdown = Countdown::try_from(manifest.countdown_seconds)?;
    Ok(Session::reassemble(
        countdown,
        manifest.filter,
        manifest.live,
        shots,
        groups,
    )?)
}
