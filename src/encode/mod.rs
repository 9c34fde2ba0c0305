//! Encoder collaborators for video export.
//!
//! Encoders receive still images under sequential names, then multiplex them into one video.

/// `ffmpeg`-based encoder (MP4 output via system `ffmpeg`).
pub mod ffmpeg;
/// Encoder trait, naming contract and the in-memory encoder.
pub mod sink;
