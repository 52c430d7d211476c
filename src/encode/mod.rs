//! Frame sinks.
//!
//! Sinks consume the frames of one cycle in index order and turn them into files.

/// `ffmpeg`-based animated preview.
pub mod ffmpeg;
/// Sprite sheet metadata.
pub mod meta;
/// PNG frame sequence and sprite sheet sinks.
pub mod png;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
