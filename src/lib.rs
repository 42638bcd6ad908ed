//! reelkit composes short-form vertical videos from a table of content rows.
//!
//! Each row becomes one 9:16 reel: footage is picked from a folder, fitted to the canvas and
//! looped or cut to the row's duration; a brand-tinted gradient, optional logo and QR badges
//! and timed captions are layered on top; background music is attached; and the result is
//! handed to a [`RenderBackend`].
//!
//! - Load rows with [`load_table`] and default them with [`ContentRow::from_raw`]
//! - Schedule captions with [`schedule_row`]
//! - Pick and fit footage with [`select_footage`], [`fit_clip`], [`normalize_duration`]
//! - Assemble a [`Composition`] with [`build_composition`] and [`attach_music`]
//! - Or drive a whole table through a [`BatchRunner`]
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod audio;
pub(crate) mod batch;
/// Batch-wide configuration.
pub mod config;
pub(crate) mod content;
pub(crate) mod footage;
pub(crate) mod overlay;
pub(crate) mod publish;
pub(crate) mod render;
pub(crate) mod timeline;
pub(crate) mod timing;

pub use crate::foundation::core::{Canvas, Fps, Point, Rgb8};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::audio::mix::{AudioTrack, attach_music};
pub use crate::batch::{BatchReport, BatchRunner, RowArtifacts, RowReport, export_subtitles};
pub use crate::config::ReelConfig;
pub use crate::content::row::{ContentRow, RawRow};
pub use crate::content::table::{TABLE_COLUMNS, load_table, write_starter_table};
pub use crate::footage::fit::{FitGeometry, FittedClip, KenBurns, fit_clip};
pub use crate::footage::normalize::{BackgroundPlan, BackgroundSegment, normalize_duration};
pub use crate::footage::probe::{FfprobeProbe, MediaInfo, MediaProbe, is_ffprobe_on_path};
pub use crate::footage::selector::{
    ClipOrder, ClipPlan, ClipSource, FootageClip, FootageRequest, KeepOrder, ShuffleOrder,
    list_candidates, select_footage,
};
pub use crate::overlay::gradient::{GradientMask, gradient_alpha};
pub use crate::overlay::qr::render_qr;
pub use crate::publish::ArtifactPaths;
pub use crate::publish::caption::{caption_text, write_caption_file};
pub use crate::publish::hashtags::hashtags_for_title;
pub use crate::publish::subtitles::write_subtitles;
pub use crate::render::dry_run::DryRunBackend;
pub use crate::render::ffmpeg::{FfmpegBackend, is_ffmpeg_on_path};
pub use crate::render::plan::{FfmpegPlan, PlanInput, StagedAssets, compile_plan};
pub use crate::render::{RenderBackend, RenderOutput, ThumbnailRequest};
pub use crate::timeline::builder::build_composition;
pub use crate::timeline::composition::Composition;
pub use crate::timeline::layer::{Layer, LayerKind, Motion, Placement, TextLayer};
pub use crate::timing::allocator::{TimedUnit, allocate_block};
pub use crate::timing::schedule::{BlockRole, CaptionBlock, CaptionSchedule, schedule_row};
