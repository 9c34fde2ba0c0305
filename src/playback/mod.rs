//! Real-time playback.

/// Time sources.
pub mod clock;
/// Wall-clock driven preview scheduler.
pub mod scheduler;
