use crate::foundation::error::{TacticError, TacticResult};
use crate::model::tactic::Frame;

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Timing constants shared by playback and export, in seconds.
pub struct TimingConfig {
    /// Length of the move phase of every segment.
    pub move_secs: f64,
    /// Pause after every move.
    pub base_pause_secs: f64,
    /// Extra pause when the destination frame carries an annotation.
    pub annotation_bonus_secs: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            move_secs: 1.25,
            base_pause_secs: 0.25,
            annotation_bonus_secs: 0.5,
        }
    }
}

impl TimingConfig {
    pub fn validate(&self) -> TacticResult<()> {
        if !self.move_secs.is_finite() || self.move_secs <= 0.0 {
            return Err(TacticError::validation(
                "timing move_secs must be finite and > 0",
            ));
        }
        for (name, v) in [
            ("base_pause_secs", self.base_pause_secs),
            ("annotation_bonus_secs", self.annotation_bonus_secs),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(TacticError::validation(format!(
                    "timing {name} must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }

    /// Pause that follows the move into `to`.
    pub fn pause_before(&self, to: &Frame) -> f64 {
        if to.annotation.is_some() {
            self.base_pause_secs + self.annotation_bonus_secs
        } else {
            self.base_pause_secs
        }
    }
}

/// Timing interval between two consecutive frames: a move phase followed by a pause phase.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Segment {
    pub start: f64,
    pub move_duration: f64,
    pub pause_duration: f64,
    pub total_duration: f64,
    pub from_index: usize,
    pub to_index: usize,
}

impl Segment {
    pub fn end(&self) -> f64 {
        self.start + self.total_duration
    }

    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t < self.end()
    }
}

/// Ordered segments derived from a frame sequence. Never persisted.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct Timeline {
    segments: Vec<Segment>,
    total: f64,
}

impl Timeline {
    /// One segment per adjacent pair `(frames[i], frames[i + 1])`.
    pub fn build(frames: &[Frame], timing: &TimingConfig) -> Self {
        let mut segments = Vec::with_capacity(frames.len().saturating_sub(1));
        let mut total = 0.0;
        for (i, pair) in frames.windows(2).enumerate() {
            let pause = timing.pause_before(&pair[1]);
            let seg_total = timing.move_secs + pause;
            segments.push(Segment {
                start: total,
                move_duration: timing.move_secs,
                pause_duration: pause,
                total_duration: seg_total,
                from_index: i,
                to_index: i + 1,
            });
            total += seg_total;
        }
        Self { segments, total }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Sum of all segment durations, in seconds.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Segment active at `elapsed`; `None` once playback has finished (or before it starts).
    pub fn lookup(&self, elapsed: f64) -> Option<&Segment> {
        if elapsed.is_nan() || elapsed < 0.0 || elapsed >= self.total {
            return None;
        }
        self.segments.iter().find(|s| s.contains(elapsed))
    }

    /// Like [`Timeline::lookup`], but time at or past the end maps to the final segment so the
    /// exact end can still be rendered. Negative time maps to the first segment.
    pub fn lookup_clamped(&self, t: f64) -> Option<&Segment> {
        if t >= self.total {
            return self.segments.last();
        }
        if t.is_nan() || t < 0.0 {
            return self.segments.first();
        }
        self.segments
            .iter()
            .find(|s| s.contains(t))
            .or_else(|| self.segments.last())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/builder.rs"]
mod tests;
