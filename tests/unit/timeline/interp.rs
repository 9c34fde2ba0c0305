use super::*;
use crate::model::defaults::default_frame;
use crate::model::tactic::{Mode, Position};
use crate::timeline::builder::TimingConfig;

fn moved(frame: &Frame, dx: f64, dy: f64) -> Frame {
    let mut f = frame.clone();
    for p in &mut f.players {
        p.x += dx;
        p.y += dy;
    }
    f.ball = Position::new(f.ball.x + dx, f.ball.y + dy);
    f
}

#[test]
fn progress_zero_and_one_reproduce_endpoints() {
    let from = default_frame(Mode::Full);
    let to = moved(&from, 10.0, -5.0);

    let at0 = interpolate(&from, &to, 0.0);
    let at1 = interpolate(&from, &to, 1.0);
    for p in &from.players {
        assert_eq!(at0.player(&p.id).unwrap().pos(), p.pos());
        assert_eq!(
            at1.player(&p.id).unwrap().pos(),
            to.player(&p.id).unwrap().pos()
        );
    }
    assert_eq!(at0.ball, from.ball);
    assert_eq!(at1.ball, to.ball);
}

#[test]
fn missing_destination_player_stays_put() {
    let from = default_frame(Mode::Full);
    let mut to = moved(&from, 10.0, 10.0);
    to.players.retain(|p| p.id != "home-2");

    let mid = interpolate(&from, &to, 0.5);
    assert_eq!(mid.players.len(), from.players.len());
    assert_eq!(
        mid.player("home-2").unwrap().pos(),
        from.player("home-2").unwrap().pos()
    );
}

#[test]
fn progress_is_clamped() {
    let from = default_frame(Mode::Full);
    let to = moved(&from, 10.0, 0.0);
    assert_eq!(interpolate(&from, &to, 2.0).ball, to.ball);
    assert_eq!(interpolate(&from, &to, -1.0).ball, from.ball);
}

#[test]
fn midpoint_scenario_at_0_625_seconds() {
    let mut from = default_frame(Mode::Full);
    from.ball = Position::new(20.0, 40.0);
    let mut to = from.clone();
    to.ball = Position::new(60.0, 80.0);
    let frames = vec![from, to];
    let tl = Timeline::build(&frames, &TimingConfig::default());
    assert_eq!(tl.total(), 1.5);

    let s = sample_playback(&frames, &tl, 0.625).unwrap();
    assert!((s.progress - 0.5).abs() < 1e-9);
    assert!((s.state.ball.x - 40.0).abs() < 1e-9);
    assert!((s.state.ball.y - 60.0).abs() < 1e-9);
}

#[test]
fn pause_phase_pins_progress_to_one() {
    let frames = vec![default_frame(Mode::Full), default_frame(Mode::Half)];
    let tl = Timeline::build(&frames, &TimingConfig::default());
    let s = sample_playback(&frames, &tl, 1.3).unwrap();
    assert_eq!(s.progress, 1.0);
    assert_eq!(s.state.ball, frames[1].ball);
}

#[test]
fn annotation_swaps_at_end_of_move_in_both_samplers() {
    let mut from = default_frame(Mode::Full);
    from.annotation = Some(Annotation::memo("src"));
    let mut to = from.clone();
    to.annotation = Some(Annotation::memo("dst"));
    let frames = vec![from, to];
    let tl = Timeline::build(&frames, &TimingConfig::default());

    for t in [0.0, 0.6, 1.2, 1.25, 1.5, 1.9] {
        let p = sample_playback(&frames, &tl, t).unwrap();
        let e = sample_export(&frames, &tl, t).unwrap();
        assert_eq!(p.state.annotation, e.state.annotation, "t={t}");
        let expected = if t >= 1.25 { "dst" } else { "src" };
        assert_eq!(p.state.annotation.as_ref().unwrap().id, expected, "t={t}");
    }
}

#[test]
fn export_sampling_holds_final_state_past_the_end() {
    let from = default_frame(Mode::Full);
    let to = moved(&from, 5.0, 5.0);
    let frames = vec![from, to.clone()];
    let tl = Timeline::build(&frames, &TimingConfig::default());

    assert!(sample_playback(&frames, &tl, tl.total()).is_none());
    let end = sample_export(&frames, &tl, tl.total() + 0.01).unwrap();
    assert_eq!(end.progress, 1.0);
    assert_eq!(end.state.ball, to.ball);
}
