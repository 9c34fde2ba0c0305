use super::*;
use crate::foundation::core::Point;
use crate::model::tactic::{Annotation, Mode};
use crate::playback::clock::ManualClock;

fn board_with_two_frames() -> Board {
    let mut b = Board::new(Mode::Full);
    b.move_ball(Point::new(20.0, 40.0)).unwrap();
    b.add_frame().unwrap();
    b.add_frame().unwrap();
    b.move_ball(Point::new(60.0, 80.0)).unwrap();
    b
}

fn scheduler() -> (ManualClock, PlaybackScheduler<ManualClock>) {
    let clock = ManualClock::new();
    let sched = PlaybackScheduler::new(clock.clone(), TimingConfig::default());
    (clock, sched)
}

#[test]
fn play_requires_two_frames() {
    let (_clock, mut sched) = scheduler();
    let mut b = Board::new(Mode::Full);
    assert!(!sched.play(&mut b).unwrap());
    b.add_frame().unwrap();
    assert!(!sched.play(&mut b).unwrap());
    assert_eq!(sched.state(), PlaybackState::Idle);
    assert_eq!(b.driver(), DriverMode::Idle);
}

#[test]
fn tick_publishes_interpolated_state_and_departing_index() {
    let (clock, mut sched) = scheduler();
    let mut b = board_with_two_frames();
    assert!(sched.play(&mut b).unwrap());
    assert_eq!(b.driver(), DriverMode::Playing);

    clock.advance_secs(0.625);
    match sched.tick(&mut b) {
        TickOutcome::Continued {
            from_index,
            progress,
        } => {
            assert_eq!(from_index, 0);
            assert!((progress - 0.5).abs() < 1e-9);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!((b.live().ball.x - 40.0).abs() < 1e-9);
    assert!((b.live().ball.y - 60.0).abs() < 1e-9);
    assert_eq!(b.current_index(), 0);
    // Driver writes never leak into the stored frames.
    assert_eq!(b.frames()[0].ball, Point::new(20.0, 40.0));
}

#[test]
fn natural_completion_snaps_to_last_frame() {
    let (clock, mut sched) = scheduler();
    let mut b = board_with_two_frames();
    sched.play(&mut b).unwrap();
    assert_eq!(sched.total_secs(), Some(1.5));

    clock.advance_secs(1.5);
    assert_eq!(sched.tick(&mut b), TickOutcome::Finished);
    assert_eq!(b.live(), &b.frames()[1]);
    assert_eq!(b.current_index(), 1);
    assert_eq!(b.driver(), DriverMode::Idle);
    assert_eq!(sched.state(), PlaybackState::Idle);
    assert_eq!(sched.tick(&mut b), TickOutcome::Idle);
}

#[test]
fn stop_cancels_ticks_without_snapping_back() {
    let (clock, mut sched) = scheduler();
    let mut b = board_with_two_frames();
    sched.play(&mut b).unwrap();
    clock.advance_secs(0.3125);
    sched.tick(&mut b);
    let mid = b.live().clone();

    sched.stop(&mut b);
    assert_eq!(b.driver(), DriverMode::Idle);
    clock.advance_secs(0.5);
    assert_eq!(sched.tick(&mut b), TickOutcome::Idle);
    assert_eq!(b.live(), &mid);
    assert!(mid.ball.x > 20.0 && mid.ball.x < 60.0);
}

#[test]
fn export_claim_preempts_running_playback() {
    let (clock, mut sched) = scheduler();
    let mut b = board_with_two_frames();
    sched.play(&mut b).unwrap();
    b.claim(DriverMode::Exporting).unwrap();

    clock.advance_secs(0.1);
    assert_eq!(sched.tick(&mut b), TickOutcome::Idle);
    assert_eq!(sched.state(), PlaybackState::Idle);
    // The scheduler must not hand the board back while export owns it.
    sched.stop(&mut b);
    assert_eq!(b.driver(), DriverMode::Exporting);
}

#[test]
fn destination_annotation_appears_in_pause_phase() {
    let (clock, mut sched) = scheduler();
    let mut b = board_with_two_frames();
    b.set_annotation(Annotation::memo("dst")).unwrap();
    sched.play(&mut b).unwrap();
    assert_eq!(sched.total_secs(), Some(2.0));

    clock.advance_secs(1.0);
    sched.tick(&mut b);
    assert!(b.live().annotation.is_none());

    clock.advance_secs(0.5);
    sched.tick(&mut b);
    assert_eq!(b.live().annotation.as_ref().unwrap().id, "dst");
}

#[test]
fn run_realtime_honours_cancellation() {
    let (_clock, mut sched) = scheduler();
    let mut b = board_with_two_frames();
    sched.play(&mut b).unwrap();
    let cancel = CancelToken::new();
    cancel.cancel();
    let mut ticks = 0;
    let outcome = sched.run_realtime(&mut b, Duration::ZERO, &cancel, |_, _| ticks += 1);
    assert_eq!(outcome, TickOutcome::Idle);
    assert_eq!(ticks, 0);
    assert_eq!(b.driver(), DriverMode::Idle);
}

#[test]
fn run_realtime_reaches_the_end() {
    let (clock, mut sched) = scheduler();
    let mut b = board_with_two_frames();
    sched.play(&mut b).unwrap();
    let mut seen = Vec::new();
    let outcome = sched.run_realtime(
        &mut b,
        Duration::ZERO,
        &CancelToken::new(),
        |_, o| {
            seen.push(o);
            clock.advance_secs(0.5);
        },
    );
    assert_eq!(outcome, TickOutcome::Finished);
    assert_eq!(seen.last(), Some(&TickOutcome::Finished));
    assert_eq!(seen.len(), 4);
}
