use crate::foundation::core::{Point, clamp_unit};
use crate::model::tactic::{Annotation, DisplayState, Frame, Player};
use crate::timeline::builder::{Segment, Timeline};

/// Interpolation contract for tweenable values.
pub trait Lerp: Sized {
    /// Interpolate from `a` to `b` with normalized factor `t` in `[0, 1]`.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Point {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Point::new(
            <f64 as Lerp>::lerp(&a.x, &b.x, t),
            <f64 as Lerp>::lerp(&a.y, &b.y, t),
        )
    }
}

impl Lerp for Player {
    // Identity, label, role and team come from `a`; only the position moves.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a.at(<Point as Lerp>::lerp(&a.pos(), &b.pos(), t))
    }
}

/// Progress through a segment's move phase.
///
/// `clamp(segment_elapsed / move_duration, 0, 1)` while moving, exactly `1` during the pause.
pub fn segment_progress(segment: &Segment, segment_elapsed: f64) -> f64 {
    if segment_elapsed >= segment.move_duration {
        return 1.0;
    }
    clamp_unit(segment_elapsed / segment.move_duration)
}

/// Annotation shown at `progress` within a segment.
///
/// The source note stays up while players move; the destination note snaps in once the move
/// completes (`progress == 1`, the start of the pause). Playback and export share this rule.
pub fn annotation_at<'a>(from: &'a Frame, to: &'a Frame, progress: f64) -> Option<&'a Annotation> {
    if progress >= 1.0 {
        to.annotation.as_ref()
    } else {
        from.annotation.as_ref()
    }
}

/// Blend two frames.
///
/// Every player of `from` is matched by id in `to`; a player missing from `to` stays where it
/// is. Players only present in `to` are not shown. The ball is blended the same way.
pub fn interpolate(from: &Frame, to: &Frame, progress: f64) -> DisplayState {
    let t = clamp_unit(progress);
    let targets = to.players_by_id();
    let players = from
        .players
        .iter()
        .map(|p| {
            let dest = targets.get(p.id.as_str()).copied().unwrap_or(p);
            <Player as Lerp>::lerp(p, dest, t)
        })
        .collect();

    DisplayState {
        players,
        ball: <Point as Lerp>::lerp(&from.ball, &to.ball, t),
        annotation: annotation_at(from, to, t).cloned(),
    }
}

/// One resolved point on the timeline.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    /// Segment the time falls into.
    pub segment: Segment,
    /// Move-phase progress in `[0, 1]`.
    pub progress: f64,
    /// Interpolated display state.
    pub state: DisplayState,
}

/// Sample the segment that contains `segment.start + segment_elapsed`.
///
/// Returns `None` when the segment refers to frames that do not exist.
pub fn sample_segment(frames: &[Frame], segment: &Segment, segment_elapsed: f64) -> Option<Sample> {
    let from = frames.get(segment.from_index)?;
    let to = frames.get(segment.to_index)?;
    let progress = segment_progress(segment, segment_elapsed);
    Some(Sample {
        segment: *segment,
        progress,
        state: interpolate(from, to, progress),
    })
}

/// Real-time sampling: `None` once `elapsed` reaches the end of the timeline.
pub fn sample_playback(frames: &[Frame], timeline: &Timeline, elapsed: f64) -> Option<Sample> {
    let segment = timeline.lookup(elapsed)?;
    sample_segment(frames, segment, elapsed - segment.start)
}

/// Frame-stepped sampling: time at or past the end holds the final segment's last state.
pub fn sample_export(frames: &[Frame], timeline: &Timeline, t: f64) -> Option<Sample> {
    let segment = timeline.lookup_clamped(t)?;
    sample_segment(frames, segment, (t - segment.start).max(0.0))
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/interp.rs"]
mod tests;
