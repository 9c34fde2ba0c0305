use std::time::Duration;

use crate::board::{Board, DriverMode};
use crate::foundation::cancel::CancelToken;
use crate::foundation::error::TacticResult;
use crate::playback::clock::Clock;
use crate::timeline::builder::{Timeline, TimingConfig};
use crate::timeline::interp::sample_playback;

/// Scheduler state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing,
}

/// What a single redraw tick did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickOutcome {
    /// No tick was registered (never started, stopped, or preempted by export).
    Idle,
    /// An interpolated state was published; another tick is registered.
    Continued {
        /// Frame being departed from; also the board's current index.
        from_index: usize,
        /// Move-phase progress in `[0, 1]`.
        progress: f64,
    },
    /// The timeline ended; the board shows the last frame and is idle again.
    Finished,
}

struct Run {
    start: Duration,
    timeline: Timeline,
}

/// Real-time preview driver.
///
/// Each [`tick`](PlaybackScheduler::tick) reads the clock, resolves the active segment and
/// publishes the interpolated state into the board. The scheduler never sleeps on its own;
/// callers decide the redraw cadence (see [`PlaybackScheduler::run_realtime`]).
pub struct PlaybackScheduler<C: Clock> {
    clock: C,
    timing: TimingConfig,
    // `Some` while a tick is registered.
    run: Option<Run>,
}

impl<C: Clock> PlaybackScheduler<C> {
    pub fn new(clock: C, timing: TimingConfig) -> Self {
        Self {
            clock,
            timing,
            run: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        if self.run.is_some() {
            PlaybackState::Playing
        } else {
            PlaybackState::Idle
        }
    }

    /// Total length of the running timeline, in seconds.
    pub fn total_secs(&self) -> Option<f64> {
        self.run.as_ref().map(|r| r.timeline.total())
    }

    /// Start playback. Needs at least two frames; otherwise (or when already playing) this is a
    /// no-op returning `Ok(false)`. Fails if another driver owns the board.
    #[tracing::instrument(skip_all, fields(frames = board.frames().len()))]
    pub fn play(&mut self, board: &mut Board) -> TacticResult<bool> {
        if self.run.is_some() {
            return Ok(false);
        }
        if board.frames().len() < 2 {
            tracing::debug!("playback needs at least two frames");
            return Ok(false);
        }
        board.claim(DriverMode::Playing)?;
        let timeline = Timeline::build(board.frames(), &self.timing);
        tracing::info!(total_secs = timeline.total(), "playback started");
        self.run = Some(Run {
            start: self.clock.now(),
            timeline,
        });
        Ok(true)
    }

    /// Run one redraw tick.
    pub fn tick(&mut self, board: &mut Board) -> TickOutcome {
        let Some(run) = self.run.as_ref() else {
            return TickOutcome::Idle;
        };
        if board.driver() != DriverMode::Playing {
            tracing::debug!(driver = ?board.driver(), "playback preempted");
            self.run = None;
            return TickOutcome::Idle;
        }

        let elapsed = self.clock.now().saturating_sub(run.start).as_secs_f64();
        if elapsed >= run.timeline.total() {
            let last = board.frames().len().saturating_sub(1);
            board.show_frame(last);
            board.release();
            self.run = None;
            tracing::info!("playback finished");
            return TickOutcome::Finished;
        }

        match sample_playback(board.frames(), &run.timeline, elapsed) {
            Some(sample) => {
                let from_index = sample.segment.from_index;
                let progress = sample.progress;
                board.publish(sample.state, from_index);
                TickOutcome::Continued {
                    from_index,
                    progress,
                }
            }
            // Only reachable on a float boundary; keep the previous picture.
            None => TickOutcome::Continued {
                from_index: board.current_index(),
                progress: 1.0,
            },
        }
    }

    /// Cancel the registered tick. The live state stays where it last interpolated to.
    pub fn stop(&mut self, board: &mut Board) {
        if self.run.take().is_some() && board.driver() == DriverMode::Playing {
            board.release();
            tracing::info!("playback stopped");
        }
    }

    /// Drive ticks every `interval` until playback ends, is preempted, or `cancel` fires.
    ///
    /// `on_tick` observes the board after every tick that published a state.
    pub fn run_realtime(
        &mut self,
        board: &mut Board,
        interval: Duration,
        cancel: &CancelToken,
        mut on_tick: impl FnMut(&Board, TickOutcome),
    ) -> TickOutcome {
        loop {
            if cancel.is_cancelled() {
                self.stop(board);
                return TickOutcome::Idle;
            }
            let outcome = self.tick(board);
            on_tick(board, outcome);
            match outcome {
                TickOutcome::Continued { .. } => std::thread::sleep(interval),
                done => return done,
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/scheduler.rs"]
mod tests;
