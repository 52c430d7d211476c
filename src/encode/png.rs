use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::encode::sink::{FrameGuard, FrameSink, SinkConfig};
use crate::foundation::core::{Frame, FrameIndex};
use crate::foundation::error::{RippleError, RippleResult};

/// Deterministic file name for a single frame: `frame-007.png`.
pub fn frame_file_name(idx: FrameIndex) -> String {
    format!("frame-{:03}.png", idx.0)
}

/// Sink that writes every frame as its own PNG into a directory.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    guard: FrameGuard,
    written: Vec<PathBuf>,
}

impl PngSequenceSink {
    /// Write frames into `dir` (created on `begin`).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            guard: FrameGuard::default(),
            written: Vec::new(),
        }
    }

    /// Paths written so far, in frame order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> RippleResult<()> {
        self.guard.begin(cfg)?;
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create frame directory '{}'", self.dir.display()))?;
        self.written.clear();
        Ok(())
    }

    fn push_frame(&mut self, frame: &Frame) -> RippleResult<()> {
        let cfg = self.guard.check(frame)?;
        let path = self.dir.join(frame_file_name(frame.index));
        save_png(&path, &frame.pixels.data, cfg.width, cfg.height)?;
        self.written.push(path);
        Ok(())
    }

    fn end(&mut self) -> RippleResult<()> {
        self.guard.finish()?;
        Ok(())
    }
}

/// Sink that concatenates all frames left to right into one PNG sprite sheet.
///
/// The sheet is written to a temporary sibling and renamed into place on `end`, so the final
/// path only ever holds a complete image.
#[derive(Debug)]
pub struct SpriteSheetSink {
    out_path: PathBuf,
    guard: FrameGuard,
    sheet: Option<image::RgbaImage>,
}

impl SpriteSheetSink {
    /// Assemble the sheet into `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            guard: FrameGuard::default(),
            sheet: None,
        }
    }
}

impl FrameSink for SpriteSheetSink {
    fn begin(&mut self, cfg: SinkConfig) -> RippleResult<()> {
        self.guard.begin(cfg)?;
        let sheet_width = cfg.width.checked_mul(cfg.frame_count).ok_or_else(|| {
            RippleError::validation(format!(
                "sprite sheet too wide: {} frames of width {}",
                cfg.frame_count, cfg.width
            ))
        })?;
        self.sheet = Some(image::RgbaImage::new(sheet_width, cfg.height));
        Ok(())
    }

    fn push_frame(&mut self, frame: &Frame) -> RippleResult<()> {
        let cfg = self.guard.check(frame)?;
        let sheet = self
            .sheet
            .as_mut()
            .ok_or_else(|| RippleError::evaluation("sprite sheet sink not started"))?;
        let tile = image::ImageBuffer::<image::Rgba<u8>, &[u8]>::from_raw(
            cfg.width,
            cfg.height,
            frame.pixels.data.as_slice(),
        )
        .ok_or_else(|| RippleError::validation("frame.data size mismatch with width*height*4"))?;

        let x = i64::from(frame.index.0) * i64::from(cfg.width);
        image::imageops::replace(sheet, &tile, x, 0);
        Ok(())
    }

    fn end(&mut self) -> RippleResult<()> {
        self.guard.finish()?;
        let sheet = self
            .sheet
            .take()
            .ok_or_else(|| RippleError::evaluation("sprite sheet sink not started"))?;

        let tmp = tmp_sibling(&self.out_path);
        let mut tmp_guard = TempFileGuard(Some(tmp.clone()));
        save_png(&tmp, sheet.as_raw(), sheet.width(), sheet.height())?;
        std::fs::rename(&tmp, &self.out_path).with_context(|| {
            format!(
                "move sprite sheet '{}' into '{}'",
                tmp.display(),
                self.out_path.display()
            )
        })?;
        tmp_guard.0 = None;
        Ok(())
    }
}

/// Removes a half-written temporary file unless disarmed.
struct TempFileGuard(Option<PathBuf>);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn save_png(path: &Path, data: &[u8], width: u32, height: u32) -> RippleResult<()> {
    image::save_buffer_with_format(
        path,
        data,
        width,
        height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
