//! Ripple turns still images into looping wave animations.
//!
//! The heart of the crate is a pure displacement kernel ([`displace`]) that warps a straight
//! RGBA8 buffer at a given phase. Around it:
//!
//! - [`WaveSettings`] / [`WaveParams`] resolve and scale the wave shape per image
//! - [`FrameSequencer`] samples one animation cycle, optionally in parallel
//! - [`FrameSink`] implementations turn frames into PNGs, a sprite sheet, or an `ffmpeg` preview
//! - [`animate_folder`] runs the whole batch with per-file idempotency and failure isolation
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Source decoding and SVG rasterization.
pub mod assets;
/// Frame sinks and sprite metadata.
pub mod encode;
/// Per-file and per-folder orchestration.
pub mod pipeline;
/// Wave parameters, kernel and sequencer.
pub mod wave;

pub use crate::foundation::core::{Canvas, Frame, FrameIndex, PixelBuffer};
pub use crate::foundation::error::{RippleError, RippleResult};

pub use crate::assets::decode::{TARGET_HEIGHT, load_source};
pub use crate::encode::ffmpeg::{PreviewOpts, PreviewSink, is_ffmpeg_on_path};
pub use crate::encode::meta::{FRAME_RATE, SpriteMeta};
pub use crate::encode::png::{PngSequenceSink, SpriteSheetSink, frame_file_name};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig, write_all};
pub use crate::pipeline::{
    AnimateOpts, BatchReport, FileOutcome, OutputPaths, animate_file, animate_folder,
};
pub use crate::wave::kernel::{ColumnProfile, displace, displace_buffer};
pub use crate::wave::params::{WaveParams, WaveSettings};
pub use crate::wave::sequence::{FRAME_COUNT, FrameSequencer, SequenceOpts};
