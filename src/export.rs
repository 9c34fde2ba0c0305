use crate::board::{Board, DriverMode};
use crate::encode::sink::{Encoder, FRAME_PATTERN, frame_file_name};
use crate::foundation::cancel::CancelToken;
use crate::foundation::core::Fps;
use crate::foundation::error::{TacticError, TacticResult};
use crate::render::court::Renderer;
use crate::timeline::builder::{Timeline, TimingConfig};
use crate::timeline::interp::sample_export;

/// Export settings.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportOptions {
    pub fps: Fps,
    pub timing: TimingConfig,
    /// Name of the encoded asset inside the encoder.
    pub output_name: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            fps: Fps::default(),
            timing: TimingConfig::default(),
            output_name: "out.mp4".to_owned(),
        }
    }
}

/// The encoded video returned by a successful export.
#[derive(Clone, Debug)]
pub struct ExportArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
    /// Number of stills handed to the encoder.
    pub frame_count: u64,
}

/// Render every frame step of the tactic's timeline and encode them into one video.
///
/// The board is claimed for the whole run (preempting playback), shows each sampled state
/// while it is rasterized, and is handed back idle on frame 0 whether the export succeeds or
/// not. `progress` receives whole percentages, non-decreasing, ending at 100.
#[tracing::instrument(skip_all, fields(frames = board.frames().len(), fps = %opts.fps.to_ffmpeg_arg()))]
pub fn run(
    board: &mut Board,
    renderer: &mut dyn Renderer,
    encoder: &mut dyn Encoder,
    opts: &ExportOptions,
    mut progress: impl FnMut(u8),
    cancel: &CancelToken,
) -> TacticResult<ExportArtifact> {
    if board.frames().len() < 2 {
        return Err(TacticError::validation("export needs at least two frames"));
    }
    opts.timing.validate()?;
    board.claim(DriverMode::Exporting)?;

    let result = render_and_encode(board, renderer, encoder, opts, &mut progress, cancel);

    board.show_frame(0);
    board.release();

    match result {
        Ok(artifact) => {
            tracing::info!(
                frames = artifact.frame_count,
                bytes = artifact.bytes.len(),
                "export finished"
            );
            Ok(artifact)
        }
        Err(e) => {
            tracing::error!(error = %e, "export failed");
            match e {
                TacticError::Export(_) => Err(e),
                other => Err(TacticError::export(other.to_string())),
            }
        }
    }
}

fn render_and_encode(
    board: &mut Board,
    renderer: &mut dyn Renderer,
    encoder: &mut dyn Encoder,
    opts: &ExportOptions,
    progress: &mut dyn FnMut(u8),
    cancel: &CancelToken,
) -> TacticResult<ExportArtifact> {
    encoder.load()?;

    let timeline = Timeline::build(board.frames(), &opts.timing);
    let last_step = opts.fps.secs_to_steps_ceil(timeline.total());
    tracing::debug!(total_secs = timeline.total(), steps = last_step + 1, "export timeline built");

    let mut written = Vec::new();
    let outcome = render_steps(
        board,
        renderer,
        encoder,
        opts,
        &timeline,
        last_step,
        progress,
        cancel,
        &mut written,
    )
    .and_then(|()| {
        encoder.encode(opts.fps, FRAME_PATTERN, &opts.output_name)?;
        encoder.read_file(&opts.output_name)
    });

    cleanup(encoder, &written, outcome.is_ok().then_some(opts.output_name.as_str()));

    let bytes = outcome?;
    Ok(ExportArtifact {
        file_name: opts.output_name.clone(),
        bytes,
        frame_count: written.len() as u64,
    })
}

// Steps `0..=last_step`, in order; `written` collects the still names handed to the encoder.
#[allow(clippy::too_many_arguments)]
fn render_steps(
    board: &mut Board,
    renderer: &mut dyn Renderer,
    encoder: &mut dyn Encoder,
    opts: &ExportOptions,
    timeline: &Timeline,
    last_step: u64,
    progress: &mut dyn FnMut(u8),
    cancel: &CancelToken,
    written: &mut Vec<String>,
) -> TacticResult<()> {
    for i in 0..=last_step {
        if cancel.is_cancelled() {
            return Err(TacticError::export("export cancelled"));
        }
        let t = opts.fps.step_to_secs(i);
        let sample = sample_export(board.frames(), timeline, t)
            .ok_or_else(|| TacticError::export(format!("no timeline segment at {t:.3}s")))?;
        board.publish(sample.state, sample.segment.from_index);
        progress(step_percent(i, last_step));

        let png = renderer.rasterize(board.live(), board.mode())?;
        let name = frame_file_name(i);
        encoder.write_file(&name, &png)?;
        written.push(name);
    }
    Ok(())
}

/// `round(step / last_step * 100)`; a single-step export reports 100.
pub fn step_percent(step: u64, last_step: u64) -> u8 {
    if last_step == 0 {
        return 100;
    }
    let pct = (step as f64 / last_step as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

// Failures are logged, never fatal.
fn cleanup(encoder: &mut dyn Encoder, written: &[String], output_name: Option<&str>) {
    for name in written.iter().map(String::as_str).chain(output_name) {
        if let Err(e) = encoder.delete_file(name) {
            tracing::warn!(file = name, error = %e, "export cleanup failed");
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/export.rs"]
mod tests;
