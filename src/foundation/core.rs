use crate::foundation::error::{RippleError, RippleResult};

/// 0-based frame index within one animation cycle.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u32);

/// Pixel dimensions of a source image or frame. Both sides are non-zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a validated canvas.
    pub fn new(width: u32, height: u32) -> RippleResult<Self> {
        if width == 0 || height == 0 {
            return Err(RippleError::invalid_dimensions(format!(
                "canvas must be non-empty, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Canvas of height `target_height` that keeps this canvas' aspect ratio.
    ///
    /// The width is rounded to the nearest pixel and never drops below 1.
    pub fn fit_height(self, target_height: u32) -> RippleResult<Self> {
        let aspect = f64::from(self.width) / f64::from(self.height);
        let width = (f64::from(target_height) * aspect).round().max(1.0) as u32;
        Self::new(width, target_height)
    }

    /// Number of bytes of a tightly packed RGBA8 buffer of this size.
    pub fn rgba_len(self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// Straight-alpha RGBA8 pixels, tightly packed, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 bytes, `width * height * 4` long.
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap `data` after checking it matches the declared dimensions.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> RippleResult<Self> {
        let canvas = Canvas::new(width, height)?;
        check_len(canvas, data.len())?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Buffer filled with a single RGBA color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> RippleResult<Self> {
        let canvas = Canvas::new(width, height)?;
        let data = rgba
            .iter()
            .copied()
            .cycle()
            .take(canvas.rgba_len())
            .collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Dimensions of this buffer.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Row stride in bytes.
    pub fn stride(&self) -> usize {
        self.width as usize * 4
    }

    /// RGBA value at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = y as usize * self.stride() + x as usize * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// One rendered animation frame.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Position within the cycle.
    pub index: FrameIndex,
    /// Phase value the kernel was sampled at.
    pub phase: f64,
    /// Warped pixels.
    pub pixels: PixelBuffer,
}

pub(crate) fn check_len(canvas: Canvas, actual: usize) -> RippleResult<()> {
    let expected = canvas.rgba_len();
    if expected != actual {
        return Err(RippleError::BufferSizeMismatch { expected, actual });
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
