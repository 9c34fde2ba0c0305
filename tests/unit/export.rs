use super::*;
use crate::encode::sink::MemoryEncoder;
use crate::foundation::core::Point;
use crate::model::tactic::{DisplayState, Mode};

#[derive(Default)]
struct RecordingRenderer {
    balls: Vec<f64>,
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, _state: &DisplayState, _mode: Mode) -> TacticResult<image::RgbaImage> {
        unreachable!("rasterize is overridden")
    }

    fn rasterize(&mut self, state: &DisplayState, _mode: Mode) -> TacticResult<Vec<u8>> {
        self.balls.push(state.ball.x);
        Ok(b"png".to_vec())
    }
}

struct FailingRenderer {
    fail_at: usize,
    calls: usize,
    error: fn() -> TacticError,
}

impl FailingRenderer {
    fn at(fail_at: usize, error: fn() -> TacticError) -> Self {
        Self {
            fail_at,
            calls: 0,
            error,
        }
    }
}

impl Renderer for FailingRenderer {
    fn render(&mut self, _state: &DisplayState, _mode: Mode) -> TacticResult<image::RgbaImage> {
        unreachable!("rasterize is overridden")
    }

    fn rasterize(&mut self, _state: &DisplayState, _mode: Mode) -> TacticResult<Vec<u8>> {
        let call = self.calls;
        self.calls += 1;
        if call == self.fail_at {
            return Err((self.error)());
        }
        Ok(b"png".to_vec())
    }
}

fn two_frame_board() -> Board {
    let mut b = Board::new(Mode::Full);
    b.move_ball(Point::new(0.0, 50.0)).unwrap();
    b.add_frame().unwrap();
    b.add_frame().unwrap();
    b.move_ball(Point::new(100.0, 50.0)).unwrap();
    b
}

fn opts(fps: u32) -> ExportOptions {
    ExportOptions {
        fps: Fps::integer(fps).unwrap(),
        ..ExportOptions::default()
    }
}

#[test]
fn step_percent_is_rounded_and_ends_at_100() {
    assert_eq!(step_percent(0, 45), 0);
    assert_eq!(step_percent(1, 45), 2);
    assert_eq!(step_percent(45, 45), 100);
    assert_eq!(step_percent(0, 0), 100);
}

#[test]
fn exports_every_step_in_order() {
    let mut board = two_frame_board();
    let mut renderer = RecordingRenderer::default();
    let mut encoder = MemoryEncoder::new();
    let mut seen = Vec::new();

    let artifact = run(
        &mut board,
        &mut renderer,
        &mut encoder,
        &opts(10),
        |p| seen.push(p),
        &CancelToken::new(),
    )
    .unwrap();

    // 1.25s move + 0.25s pause at 10 fps: steps 0..=15.
    assert_eq!(artifact.frame_count, 16);
    assert_eq!(artifact.file_name, "out.mp4");
    assert_eq!(artifact.bytes, b"fps=10 frames=16\n");
    let expected: Vec<String> = (0..16).map(frame_file_name).collect();
    assert_eq!(encoder.written(), expected.as_slice());

    assert_eq!(seen.len(), 16);
    assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(seen.last(), Some(&100));

    assert_eq!(renderer.balls.first(), Some(&0.0));
    assert!((renderer.balls[5] - 40.0).abs() < 1e-9);
    assert_eq!(renderer.balls.last(), Some(&100.0));

    assert_eq!(board.driver(), DriverMode::Idle);
    assert_eq!(board.current_index(), 0);
    assert_eq!(board.live().ball, Point::new(0.0, 50.0));
}

#[test]
fn cleans_up_stills_and_output() {
    let mut board = two_frame_board();
    let mut encoder = MemoryEncoder::new();
    run(
        &mut board,
        &mut RecordingRenderer::default(),
        &mut encoder,
        &opts(10),
        |_| {},
        &CancelToken::new(),
    )
    .unwrap();
    assert_eq!(encoder.file_names().count(), 0);
    assert_eq!(encoder.deleted().last().map(String::as_str), Some("out.mp4"));
}

#[test]
fn cleanup_failures_are_not_fatal() {
    let mut board = two_frame_board();
    let mut encoder = MemoryEncoder::new().failing_delete();
    let artifact = run(
        &mut board,
        &mut RecordingRenderer::default(),
        &mut encoder,
        &opts(10),
        |_| {},
        &CancelToken::new(),
    )
    .unwrap();
    assert_eq!(artifact.frame_count, 16);
}

#[test]
fn needs_two_frames() {
    let mut board = Board::new(Mode::Full);
    board.add_frame().unwrap();
    let err = run(
        &mut board,
        &mut RecordingRenderer::default(),
        &mut MemoryEncoder::new(),
        &ExportOptions::default(),
        |_| {},
        &CancelToken::new(),
    )
    .unwrap_err();
    assert!(matches!(err, TacticError::Validation(_)));
    assert_eq!(board.driver(), DriverMode::Idle);
}

#[test]
fn encoder_failure_resets_board() {
    let mut board = two_frame_board();
    board.select_frame(1).unwrap();
    let err = run(
        &mut board,
        &mut RecordingRenderer::default(),
        &mut MemoryEncoder::new().failing_encode(),
        &opts(10),
        |_| {},
        &CancelToken::new(),
    )
    .unwrap_err();
    assert!(matches!(err, TacticError::Export(_)));
    assert_eq!(board.driver(), DriverMode::Idle);
    assert_eq!(board.current_index(), 0);
    assert_eq!(board.live(), &board.frames()[0]);
}

#[test]
fn load_failure_reports_export_error() {
    let mut board = two_frame_board();
    let err = run(
        &mut board,
        &mut RecordingRenderer::default(),
        &mut MemoryEncoder::new().failing_load(),
        &opts(10),
        |_| {},
        &CancelToken::new(),
    )
    .unwrap_err();
    assert!(matches!(err, TacticError::Export(_)));
    assert_eq!(board.driver(), DriverMode::Idle);
}

#[test]
fn cancellation_stops_between_steps() {
    let mut board = two_frame_board();
    let cancel = CancelToken::new();
    let mut encoder = MemoryEncoder::new();
    let err = run(
        &mut board,
        &mut RecordingRenderer::default(),
        &mut encoder,
        &opts(10),
        |p| {
            if p >= 20 {
                cancel.cancel();
            }
        },
        &cancel,
    )
    .unwrap_err();
    assert!(err.to_string().contains("cancelled"));
    // Step 3 (20%) still completes; step 4 is never started.
    assert_eq!(encoder.written().len(), 4);
    assert_eq!(board.driver(), DriverMode::Idle);
}

#[test]
fn export_preempts_playback() {
    let mut board = two_frame_board();
    board.claim(DriverMode::Playing).unwrap();
    run(
        &mut board,
        &mut RecordingRenderer::default(),
        &mut MemoryEncoder::new(),
        &opts(10),
        |_| {},
        &CancelToken::new(),
    )
    .unwrap();
    assert_eq!(board.driver(), DriverMode::Idle);
}

#[test]
fn render_failure_stops_export_and_resets_board() {
    let mut board = two_frame_board();
    board.select_frame(1).unwrap();
    let mut renderer = FailingRenderer::at(3, || TacticError::export("raster backend lost"));
    let mut encoder = MemoryEncoder::new();
    let err = run(
        &mut board,
        &mut renderer,
        &mut encoder,
        &opts(10),
        |_| {},
        &CancelToken::new(),
    )
    .unwrap_err();

    assert!(matches!(err, TacticError::Export(_)), "{err}");
    assert_eq!(renderer.calls, 4);
    let expected: Vec<String> = (0..3).map(frame_file_name).collect();
    assert_eq!(encoder.written(), expected.as_slice());
    assert_eq!(encoder.deleted(), expected.as_slice());
    assert_eq!(encoder.file_names().count(), 0);
    assert_eq!(board.driver(), DriverMode::Idle);
    assert_eq!(board.current_index(), 0);
    assert_eq!(board.live(), &board.frames()[0]);
}

#[test]
fn non_export_render_errors_surface_as_export_errors() {
    let mut board = two_frame_board();
    let mut encoder = MemoryEncoder::new();
    let err = run(
        &mut board,
        &mut FailingRenderer::at(0, || TacticError::validation("bad raster size")),
        &mut encoder,
        &opts(10),
        |_| {},
        &CancelToken::new(),
    )
    .unwrap_err();

    assert!(matches!(err, TacticError::Export(_)), "{err}");
    assert!(err.to_string().contains("bad raster size"));
    assert!(encoder.written().is_empty());
    assert_eq!(board.driver(), DriverMode::Idle);
}
