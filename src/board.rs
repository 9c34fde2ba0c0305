use crate::foundation::core::Point;
use crate::foundation::error::{TacticError, TacticResult};
use crate::model::court::CourtGeometry;
use crate::model::defaults::default_frame;
use crate::model::tactic::{Annotation, DisplayState, Frame, Mode, TacticState};
use crate::timeline::store::{DeleteOutcome, FrameStore};

/// Which driver currently owns the live display state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverMode {
    /// Manual editing.
    #[default]
    Idle,
    /// Real-time playback.
    Playing,
    /// Offline video export.
    Exporting,
}

/// Gate for actions that discard the frame sequence.
pub trait ConfirmDestructive {
    /// Return `true` to proceed with the action described by `prompt`.
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> ConfirmDestructive for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Confirmation policy that always proceeds (non-interactive callers).
#[derive(Clone, Copy, Debug, Default)]
pub struct AssumeYes;

impl ConfirmDestructive for AssumeYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// An editing session: the court mode, the frame sequence and the live display state.
///
/// The board is the single owner of the live state. Writers other than manual edits must
/// [`claim`](Board::claim) it first; manual edits are rejected while a driver holds it.
#[derive(Clone, Debug)]
pub struct Board {
    mode: Mode,
    store: FrameStore,
    live: DisplayState,
    driver: DriverMode,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(Mode::Full)
    }
}

impl Board {
    /// Fresh board for `mode` with the default rosters and no frames.
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            store: FrameStore::new(),
            live: default_frame(mode),
            driver: DriverMode::Idle,
        }
    }

    /// Board restored from a persisted or shared tactic.
    pub fn from_state(state: TacticState) -> Self {
        let mut board = Self::new(state.mode);
        board.load_state(state);
        board
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn geometry(&self) -> CourtGeometry {
        CourtGeometry::for_mode(self.mode)
    }

    pub fn store(&self) -> &FrameStore {
        &self.store
    }

    pub fn frames(&self) -> &[Frame] {
        self.store.frames()
    }

    pub fn current_index(&self) -> usize {
        self.store.current_index()
    }

    pub fn live(&self) -> &DisplayState {
        &self.live
    }

    pub fn driver(&self) -> DriverMode {
        self.driver
    }

    /// The persistable unit for this board.
    pub fn snapshot_state(&self) -> TacticState {
        TacticState {
            mode: self.mode,
            frames: self.store.frames().to_vec(),
        }
    }

    fn ensure_idle(&self, action: &str) -> TacticResult<()> {
        if self.driver != DriverMode::Idle {
            return Err(TacticError::validation(format!(
                "cannot {action} while the board is {:?}",
                self.driver
            )));
        }
        Ok(())
    }

    // Auto-sync: edits flow into the current frame. `update` drops no-op writes.
    fn sync_current(&mut self) -> bool {
        self.store.update(self.live.clone())
    }

    fn reset_positions(&mut self) {
        self.live = default_frame(self.mode);
        self.store.clear();
    }

    // ---- frame management ----

    /// Capture the live state as a new frame after the current one.
    #[tracing::instrument(skip(self), fields(frames = self.store.len()))]
    pub fn add_frame(&mut self) -> TacticResult<usize> {
        self.ensure_idle("add a frame")?;
        let idx = self.store.insert(self.live.clone());
        tracing::debug!(index = idx, "frame added");
        Ok(idx)
    }

    /// Delete the current frame. Deleting the last frame resets to the default roster.
    #[tracing::instrument(skip(self), fields(frames = self.store.len()))]
    pub fn delete_frame(&mut self) -> TacticResult<DeleteOutcome> {
        self.ensure_idle("delete a frame")?;
        let outcome = self.store.delete();
        match outcome {
            DeleteOutcome::Noop => {}
            DeleteOutcome::Removed => {
                if let Some(f) = self.store.current() {
                    self.live = f.clone();
                }
            }
            DeleteOutcome::Emptied => {
                tracing::debug!(mode = self.mode.as_str(), "last frame deleted; resetting roster");
                self.reset_positions();
            }
        }
        Ok(outcome)
    }

    /// Make `index` current and load it into the live state.
    pub fn select_frame(&mut self, index: usize) -> TacticResult<()> {
        self.ensure_idle("select a frame")?;
        self.live = self.store.select(index)?.clone();
        Ok(())
    }

    /// Explicitly write the live state into the current frame.
    ///
    /// Returns `false` when there is no frame or nothing changed.
    pub fn update_current_frame(&mut self) -> TacticResult<bool> {
        self.ensure_idle("update a frame")?;
        Ok(self.sync_current())
    }

    // ---- live editing ----

    /// Move a player to percent coordinates.
    pub fn move_player(&mut self, id: &str, to: Point) -> TacticResult<()> {
        self.ensure_idle("move a player")?;
        ensure_finite(to, "player position")?;
        let Some(p) = self.live.players.iter_mut().find(|p| p.id == id) else {
            return Err(TacticError::validation(format!("unknown player '{id}'")));
        };
        p.x = to.x;
        p.y = to.y;
        self.sync_current();
        Ok(())
    }

    /// Drop a player at stage pixel coordinates.
    ///
    /// Returns `Ok(false)` and leaves the player in place when the drop lands outside the stage.
    pub fn drop_player(&mut self, id: &str, stage: Point) -> TacticResult<bool> {
        match self.geometry().stage_to_percent(stage) {
            Some(p) => self.move_player(id, p).map(|()| true),
            None => {
                self.ensure_idle("move a player")?;
                Ok(false)
            }
        }
    }

    /// Move the ball to percent coordinates.
    pub fn move_ball(&mut self, to: Point) -> TacticResult<()> {
        self.ensure_idle("move the ball")?;
        ensure_finite(to, "ball position")?;
        self.live.ball = to;
        self.sync_current();
        Ok(())
    }

    /// Drop the ball at stage pixel coordinates; out-of-stage drops are ignored.
    pub fn drop_ball(&mut self, stage: Point) -> TacticResult<bool> {
        match self.geometry().stage_to_percent(stage) {
            Some(p) => self.move_ball(p).map(|()| true),
            None => {
                self.ensure_idle("move the ball")?;
                Ok(false)
            }
        }
    }

    /// Add the default note. No-op (returns `false`) when a note already exists.
    pub fn add_annotation(&mut self) -> TacticResult<bool> {
        self.ensure_idle("add an annotation")?;
        if self.live.annotation.is_some() {
            return Ok(false);
        }
        let id = chrono::Utc::now().timestamp_millis().to_string();
        self.live.annotation = Some(Annotation::memo(id));
        self.sync_current();
        Ok(true)
    }

    /// Replace the note (text, size and placement edits all come through here).
    pub fn set_annotation(&mut self, annotation: Annotation) -> TacticResult<()> {
        self.ensure_idle("edit the annotation")?;
        annotation.validate()?;
        self.live.annotation = Some(annotation);
        self.sync_current();
        Ok(())
    }

    pub fn remove_annotation(&mut self) -> TacticResult<()> {
        self.ensure_idle("remove the annotation")?;
        self.live.annotation = None;
        self.sync_current();
        Ok(())
    }

    // ---- destructive actions ----

    /// Switch court layout. Discarding existing frames requires confirmation.
    ///
    /// Returns `Ok(false)` when the user declined; nothing changes in that case.
    pub fn change_mode(&mut self, mode: Mode, confirm: &dyn ConfirmDestructive) -> TacticResult<bool> {
        self.ensure_idle("change mode")?;
        if !self.store.is_empty() && !confirm.confirm("Changing mode will clear all frames. Continue?")
        {
            return Ok(false);
        }
        self.mode = mode;
        self.reset_positions();
        tracing::info!(mode = mode.as_str(), "court mode changed");
        Ok(true)
    }

    /// Clear all frames and restore the default roster for the current mode.
    pub fn reset(&mut self, confirm: &dyn ConfirmDestructive) -> TacticResult<bool> {
        self.ensure_idle("reset")?;
        if !self.store.is_empty() && !confirm.confirm("Reset will clear all frames. Continue?") {
            return Ok(false);
        }
        self.reset_positions();
        Ok(true)
    }

    /// Load a tactic: mode and frames are replaced, frame 0 becomes live.
    pub fn restore(&mut self, state: TacticState) -> TacticResult<()> {
        self.ensure_idle("load a tactic")?;
        self.load_state(state);
        Ok(())
    }

    fn load_state(&mut self, state: TacticState) {
        self.mode = state.mode;
        if state.frames.is_empty() {
            self.reset_positions();
            return;
        }
        self.store.replace_all(state.frames);
        if let Some(first) = self.store.current() {
            self.live = first.clone();
        }
    }

    // ---- driver ownership ----

    /// Take ownership of the live state for a driver.
    ///
    /// Export preempts playback; every other transition requires an idle board.
    pub fn claim(&mut self, driver: DriverMode) -> TacticResult<()> {
        match (self.driver, driver) {
            (_, DriverMode::Idle) => Err(TacticError::validation("cannot claim the board as idle")),
            (DriverMode::Idle, d) => {
                self.driver = d;
                Ok(())
            }
            (DriverMode::Playing, DriverMode::Exporting) => {
                tracing::debug!("export preempts playback");
                self.driver = DriverMode::Exporting;
                Ok(())
            }
            (current, requested) => Err(TacticError::validation(format!(
                "board is {current:?}; cannot start {requested:?}"
            ))),
        }
    }

    /// Hand the live state back to manual editing.
    pub fn release(&mut self) {
        self.driver = DriverMode::Idle;
    }

    /// Driver write: replace the displayed state and the "current" index without syncing
    /// into the frame sequence.
    pub(crate) fn publish(&mut self, state: DisplayState, current_index: usize) {
        self.live = state;
        self.store.set_current_unchecked(current_index);
    }

    /// Snap the live state to frame `index` (used at playback end and export teardown).
    pub(crate) fn show_frame(&mut self, index: usize) {
        if let Some(f) = self.store.frames().get(index) {
            self.live = f.clone();
            self.store.set_current_unchecked(index);
        }
    }
}

fn ensure_finite(p: Point, what: &str) -> TacticResult<()> {
    if p.x.is_finite() && p.y.is_finite() {
        Ok(())
    } else {
        Err(TacticError::validation(format!("{what} must be finite")))
    }
}

#[cfg(test)]
#[path = "../tests/unit/board.rs"]
mod tests;
