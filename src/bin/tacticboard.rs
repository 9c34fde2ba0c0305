use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tacticboard::model::defaults::default_frame;
use tacticboard::render::court::encode_png;
use tacticboard::timeline::interp::sample_export;
use tacticboard::{
    Board, BoardConfig, CancelToken, CourtRasterizer, DirStore, FfmpegEncoder, Fps, Mode,
    PlaybackScheduler, Renderer as _, SystemClock, TacticLibrary, TacticState, TickOutcome,
    Timeline, codec, export, share,
};

#[derive(Parser, Debug)]
#[command(name = "tacticboard", version, about = "Animate futsal tactics")]
struct Cli {
    /// JSON file overriding timing and export settings.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a fresh tactic (default roster, no frames).
    New {
        #[arg(long, default_value = "full")]
        mode: Mode,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print the share/storage string for a tactic.
    Encode {
        #[arg(long = "in")]
        in_path: PathBuf,
    },
    /// Decode a share/storage string.
    Decode {
        #[arg(long)]
        data: String,
        /// Write the tactic here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print a share link for a tactic.
    Share {
        #[arg(long = "in")]
        in_path: PathBuf,
        #[arg(long)]
        base: String,
    },
    /// Restore the tactic carried by a share link.
    Open {
        #[arg(long)]
        url: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the timeline segments as JSON.
    Timeline {
        #[arg(long = "in")]
        in_path: PathBuf,
    },
    /// Rasterize the state at a point in time as a PNG.
    Frame {
        #[arg(long = "in")]
        in_path: PathBuf,
        /// Seconds from the start of the timeline.
        #[arg(long, default_value_t = 0.0)]
        time: f64,
        #[arg(long)]
        out: PathBuf,
    },
    /// Play the tactic in real time, one JSON line per tick.
    Preview {
        #[arg(long = "in")]
        in_path: PathBuf,
        /// Ticks per second.
        #[arg(long, default_value_t = 30)]
        hz: u32,
    },
    /// Render an MP4 video (requires `ffmpeg` on PATH).
    Export {
        #[arg(long = "in")]
        in_path: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Overrides the configured frame rate.
        #[arg(long)]
        fps: Option<u32>,
    },
    /// Save a tactic into a library directory.
    Save {
        #[arg(long = "in")]
        in_path: PathBuf,
        #[arg(long)]
        name: String,
        #[arg(long)]
        dir: PathBuf,
    },
    /// List saved tactics, most recent first.
    List {
        #[arg(long)]
        dir: PathBuf,
    },
    /// Load a saved tactic.
    Load {
        #[arg(long)]
        id: String,
        #[arg(long)]
        dir: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Delete a saved tactic.
    Delete {
        #[arg(long)]
        id: String,
        #[arg(long)]
        dir: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => BoardConfig::from_path(path)?,
        None => BoardConfig::default(),
    };

    match cli.cmd {
        Command::New { mode, out } => {
            TacticState::empty(mode).write_path(&out)?;
            eprintln!("wrote {}", out.display());
            Ok(())
        }
        Command::Encode { in_path } => {
            let state = TacticState::from_path(&in_path)?;
            println!("{}", codec::encode(&state)?);
            Ok(())
        }
        Command::Decode { data, out } => emit_state(&codec::decode(&data)?, out.as_deref()),
        Command::Share { in_path, base } => {
            let state = TacticState::from_path(&in_path)?;
            println!("{}", share::share_url(&base, &state)?);
            Ok(())
        }
        Command::Open { url, out } => emit_state(&share::restore_from_url(&url)?, out.as_deref()),
        Command::Timeline { in_path } => cmd_timeline(&in_path, &config),
        Command::Frame {
            in_path,
            time,
            out,
        } => cmd_frame(&in_path, time, &out, &config),
        Command::Preview { in_path, hz } => cmd_preview(&in_path, hz, &config),
        Command::Export { in_path, out, fps } => cmd_export(&in_path, &out, fps, &config),
        Command::Save {
            in_path,
            name,
            dir,
        } => {
            let state = TacticState::from_path(&in_path)?;
            let mut lib = TacticLibrary::new(DirStore::open(dir)?);
            let rec = lib.save(&name, &state)?;
            println!("{}", rec.id);
            Ok(())
        }
        Command::List { dir } => {
            let lib = TacticLibrary::new(DirStore::open(dir)?);
            for rec in lib.list()? {
                println!("{}\t{}\t{}", rec.id, rec.date.to_rfc3339(), rec.name);
            }
            Ok(())
        }
        Command::Load { id, dir, out } => {
            let lib = TacticLibrary::new(DirStore::open(dir)?);
            lib.load(&id)?.write_path(&out)?;
            eprintln!("wrote {}", out.display());
            Ok(())
        }
        Command::Delete { id, dir } => {
            let mut lib = TacticLibrary::new(DirStore::open(dir)?);
            lib.delete(&id)?;
            Ok(())
        }
    }
}

fn emit_state(state: &TacticState, out: Option<&Path>) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            state.write_path(path)?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(state)?),
    }
    Ok(())
}

fn cmd_timeline(in_path: &Path, config: &BoardConfig) -> anyhow::Result<()> {
    let state = TacticState::from_path(in_path)?;
    let timeline = Timeline::build(&state.frames, &config.timing);
    let doc = serde_json::json!({
        "total": timeline.total(),
        "segments": timeline.segments(),
    });
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

fn cmd_frame(in_path: &Path, time: f64, out: &Path, config: &BoardConfig) -> anyhow::Result<()> {
    let state = TacticState::from_path(in_path)?;
    let timeline = Timeline::build(&state.frames, &config.timing);
    let shown = match sample_export(&state.frames, &timeline, time) {
        Some(sample) => sample.state,
        None => state
            .frames
            .first()
            .cloned()
            .unwrap_or_else(|| default_frame(state.mode)),
    };

    let mut renderer = CourtRasterizer::new(config.export.pixel_ratio)?;
    let img = renderer.render(&shown, state.mode)?;
    tacticboard::encode::ffmpeg::ensure_parent_dir(out)?;
    std::fs::write(out, encode_png(&img)?)
        .with_context(|| format!("write png '{}'", out.display()))?;
    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_preview(in_path: &Path, hz: u32, config: &BoardConfig) -> anyhow::Result<()> {
    if hz == 0 {
        anyhow::bail!("--hz must be > 0");
    }
    let mut board = Board::from_state(TacticState::from_path(in_path)?);
    let mut sched = PlaybackScheduler::new(SystemClock::new(), config.timing);
    if !sched.play(&mut board)? {
        anyhow::bail!("preview needs at least two frames");
    }

    let mut stdout = std::io::stdout().lock();
    let mut write_err = None;
    let interval = Duration::from_secs_f64(1.0 / f64::from(hz));
    let cancel = CancelToken::new();
    sched.run_realtime(&mut board, interval, &cancel, |board, outcome| {
        let (index, progress) = match outcome {
            TickOutcome::Continued {
                from_index,
                progress,
            } => (from_index, progress),
            TickOutcome::Finished => (board.current_index(), 1.0),
            TickOutcome::Idle => return,
        };
        let line = serde_json::json!({
            "index": index,
            "progress": progress,
            "finished": outcome == TickOutcome::Finished,
            "state": board.live(),
        });
        if let Err(e) = writeln!(stdout, "{line}") {
            write_err = Some(e);
            cancel.cancel();
        }
    });
    if let Some(e) = write_err {
        return Err(e).context("write preview output");
    }
    Ok(())
}

fn cmd_export(
    in_path: &Path,
    out: &Path,
    fps: Option<u32>,
    config: &BoardConfig,
) -> anyhow::Result<()> {
    let mut opts = config.export_options();
    if let Some(fps) = fps {
        opts.fps = Fps::integer(fps)?;
    }

    let mut board = Board::from_state(TacticState::from_path(in_path)?);
    let mut renderer = CourtRasterizer::new(config.export.pixel_ratio)?;
    let mut encoder = FfmpegEncoder::new();
    let mut last_logged = None;
    let artifact = export::run(
        &mut board,
        &mut renderer,
        &mut encoder,
        &opts,
        |pct| {
            let decile = pct / 10;
            if last_logged != Some(decile) {
                last_logged = Some(decile);
                tracing::info!(progress = pct, "exporting");
            }
        },
        &CancelToken::new(),
    )?;

    tacticboard::encode::ffmpeg::ensure_parent_dir(out)?;
    std::fs::write(out, &artifact.bytes)
        .with_context(|| format!("write video '{}'", out.display()))?;
    eprintln!("wrote {} ({} frames)", out.display(), artifact.frame_count);
    Ok(())
}
