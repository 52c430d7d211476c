use crate::foundation::core::Frame;
use crate::foundation::error::{RippleError, RippleResult};

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Number of frames that will be pushed.
    pub frame_count: u32,
}

/// Sink contract for consuming frames of one animation cycle.
///
/// Ordering contract: `push_frame` receives indices `0, 1, .., frame_count - 1` in order.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> RippleResult<()>;
    /// Push the next frame; its index equals the number of frames pushed so far.
    fn push_frame(&mut self, frame: &Frame) -> RippleResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> RippleResult<()>;
}

/// Drive `sink` through a full `begin` / `push_frame` / `end` cycle over `frames`.
pub fn write_all(sink: &mut dyn FrameSink, frames: &[Frame]) -> RippleResult<()> {
    let first = frames
        .first()
        .ok_or_else(|| RippleError::validation("cannot write an empty frame sequence"))?;
    sink.begin(SinkConfig {
        width: first.pixels.width,
        height: first.pixels.height,
        frame_count: frames.len() as u32,
    })?;
    for frame in frames {
        sink.push_frame(frame)?;
    }
    sink.end()
}

/// Shared frame checks for sinks: size matches the config and indices are contiguous from 0.
#[derive(Debug, Default)]
pub(crate) struct FrameGuard {
    cfg: Option<SinkConfig>,
    pushed: u32,
}

impl FrameGuard {
    pub(crate) fn begin(&mut self, cfg: SinkConfig) -> RippleResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(RippleError::invalid_dimensions(
                "sink width/height must be non-zero",
            ));
        }
        if cfg.frame_count == 0 {
            return Err(RippleError::validation("sink frame_count must be non-zero"));
        }
        self.cfg = Some(cfg);
        self.pushed = 0;
        Ok(())
    }

    pub(crate) fn check(&mut self, frame: &Frame) -> RippleResult<SinkConfig> {
        let cfg = self
            .cfg
            .ok_or_else(|| RippleError::evaluation("sink not started"))?;
        // Indices must run 0, 1, 2, ... without gaps; sinks place frames by index.
        if frame.index.0 != self.pushed {
            return Err(RippleError::evaluation(format!(
                "sink received frame index {}, expected {}",
                frame.index.0, self.pushed
            )));
        }
        if frame.pixels.width != cfg.width || frame.pixels.height != cfg.height {
            return Err(RippleError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.pixels.width, frame.pixels.height, cfg.width, cfg.height
            )));
        }
        if self.pushed >= cfg.frame_count {
            return Err(RippleError::validation(format!(
                "sink configured for {} frames received more",
                cfg.frame_count
            )));
        }
        self.pushed += 1;
        Ok(cfg)
    }

    pub(crate) fn finish(&mut self) -> RippleResult<SinkConfig> {
        let cfg = self
            .cfg
            .take()
            .ok_or_else(|| RippleError::evaluation("sink not started"))?;
        if self.pushed != cfg.frame_count {
            return Err(RippleError::validation(format!(
                "sink expected {} frames, got {}",
                cfg.frame_count, self.pushed
            )));
        }
        Ok(cfg)
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<Frame>,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> RippleResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, frame: &Frame) -> RippleResult<()> {
        self.frames.push(frame.clone());
        Ok(())
    }

    fn end(&mut self) -> RippleResult<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
