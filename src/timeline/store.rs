use crate::foundation::error::{TacticError, TacticResult};
use crate::model::tactic::Frame;

/// Result of [`FrameStore::delete`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The store was already empty.
    Noop,
    /// A frame was removed and at least one frame remains.
    Removed,
    /// The last frame was removed; the board must reset to the default roster.
    Emptied,
}

/// Ordered keyframes plus the notion of a "current" frame.
///
/// Invariant: when non-empty, `current` is a valid index in `[0, len)`.
#[derive(Clone, Debug, Default)]
pub struct FrameStore {
    frames: Vec<Frame>,
    current: usize,
}

impl FrameStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding `frames` with the first one current.
    pub fn from_frames(frames: Vec<Frame>) -> Self {
        Self { frames, current: 0 }
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Current index; `0` for an empty store.
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> Option<&Frame> {
        self.frames.get(self.current)
    }

    pub fn last(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// Insert right after the current frame and make it current.
    ///
    /// Returns the index of the inserted frame.
    pub fn insert(&mut self, snapshot: Frame) -> usize {
        if self.frames.is_empty() {
            self.frames.push(snapshot);
            self.current = 0;
        } else {
            self.current += 1;
            self.frames.insert(self.current, snapshot);
        }
        self.current
    }

    /// Remove the current frame.
    pub fn delete(&mut self) -> DeleteOutcome {
        if self.frames.is_empty() {
            return DeleteOutcome::Noop;
        }
        self.frames.remove(self.current);
        if self.frames.is_empty() {
            self.current = 0;
            return DeleteOutcome::Emptied;
        }
        self.current = self.current.min(self.frames.len() - 1);
        DeleteOutcome::Removed
    }

    /// Replace the current frame.
    ///
    /// Returns `false` without writing when the store is empty or `snapshot` is structurally
    /// equal to the stored frame. Callers rely on this to stop edit/sync feedback loops.
    pub fn update(&mut self, snapshot: Frame) -> bool {
        let Some(slot) = self.frames.get_mut(self.current) else {
            return false;
        };
        if *slot == snapshot {
            return false;
        }
        *slot = snapshot;
        true
    }

    /// Make `index` current and return the frame to load into the live state.
    pub fn select(&mut self, index: usize) -> TacticResult<&Frame> {
        if index >= self.frames.len() {
            return Err(TacticError::validation(format!(
                "frame index {index} out of range (have {} frames)",
                self.frames.len()
            )));
        }
        self.current = index;
        Ok(&self.frames[index])
    }

    /// Move the current index without loading anything (used by the schedulers).
    pub(crate) fn set_current_unchecked(&mut self, index: usize) {
        if index < self.frames.len() {
            self.current = index;
        }
    }

    pub fn clear(&mut self) {
        self.frames.clear();
        self.current = 0;
    }

    /// Replace the whole sequence; the first frame becomes current.
    pub fn replace_all(&mut self, frames: Vec<Frame>) {
        self.frames = frames;
        self.current = 0;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/store.rs"]
mod tests;
