//! Frame sequence storage, timeline construction and interpolation.

/// Segment timing.
pub mod builder;
/// Tweening between frames.
pub mod interp;
/// Ordered frame sequence with a current-frame cursor.
pub mod store;
