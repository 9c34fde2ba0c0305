//! Tactic data model: frames, players, annotations, defaults and court geometry.

/// Court and stage geometry.
pub mod court;
/// Default rosters and ball positions per mode.
pub mod defaults;
/// Persisted and displayed value types.
pub mod tactic;
