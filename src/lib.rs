//! Tacticboard animates futsal tactics.
//!
//! A tactic is an ordered sequence of keyframes, each holding player tokens, a ball and an
//! optional note. The crate provides:
//!
//! - the [`Board`] editing session and its [`FrameStore`]
//! - timeline construction and linear interpolation between frames
//! - a real-time [`PlaybackScheduler`] and an offline [`export`] pipeline that rasterizes every
//!   frame step and hands the stills to an [`Encoder`]
//! - compact share links and a saved-tactic [`TacticLibrary`]
#![forbid(unsafe_code)]

mod foundation;

/// Editing session and live-state ownership.
pub mod board;
/// Share/storage string codec.
pub mod codec;
/// Export and playback settings files.
pub mod config;
/// Encoder collaborators.
pub mod encode;
/// Offline video export.
pub mod export;
/// Saved tactics.
pub mod library;
pub mod model;
pub mod playback;
/// Court rasterization.
pub mod render;
pub mod share;
pub mod timeline;

pub use crate::foundation::cancel::CancelToken;
pub use crate::foundation::core::{Fps, Point, Rect, clamp_unit};
pub use crate::foundation::error::{TacticError, TacticResult};

pub use crate::board::{AssumeYes, Board, ConfirmDestructive, DriverMode};
pub use crate::config::{BoardConfig, ExportSettings};
pub use crate::encode::ffmpeg::{FfmpegEncoder, is_ffmpeg_on_path};
pub use crate::encode::sink::{Encoder, MemoryEncoder};
pub use crate::export::{ExportArtifact, ExportOptions};
pub use crate::library::{DirStore, KeyValueStore, MemoryStore, SavedRecord, TacticLibrary};
pub use crate::model::court::CourtGeometry;
pub use crate::model::tactic::{
    Annotation, DisplayState, Frame, Mode, Player, Position, Role, SizeTag, TacticState, Team,
};
pub use crate::playback::clock::{Clock, ManualClock, SystemClock};
pub use crate::playback::scheduler::{PlaybackScheduler, PlaybackState, TickOutcome};
pub use crate::render::court::{CourtRasterizer, Renderer};
pub use crate::timeline::builder::{Segment, Timeline, TimingConfig};
pub use crate::timeline::store::{DeleteOutcome, FrameStore};
