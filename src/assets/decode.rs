use std::path::Path;

use crate::foundation::core::{Canvas, PixelBuffer};
use crate::foundation::error::{RippleError, RippleResult};
use crate::foundation::math::unpremultiply_rgba8_in_place;

/// Height every source is brought to before animating.
pub const TARGET_HEIGHT: u32 = 512;

/// Number of leading bytes inspected when sniffing for SVG content.
const SVG_SNIFF_LEN: usize = 200;

// Avoid pathological allocations from hostile SVG sizes.
const MAX_DIM: u32 = 16_384;

/// Load `path` and bring it to `target_height`, keeping its aspect ratio.
///
/// SVG sources are rasterized directly at the target height; raster sources are decoded and
/// resampled.
pub fn load_source(path: &Path, target_height: u32) -> RippleResult<PixelBuffer> {
    let bytes = std::fs::read(path)
        .map_err(|e| RippleError::decode(format!("read '{}': {e}", path.display())))?;

    let decoded = if is_svg(path, &bytes) {
        rasterize_svg(&bytes, target_height)?
    } else {
        decode_image(&bytes)?
    };
    resize_to_height(decoded, target_height)
}

/// `true` for `.svg` files or when `<svg` appears near the start of the data.
pub fn is_svg(path: &Path, bytes: &[u8]) -> bool {
    let by_ext = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
    if by_ext {
        return true;
    }
    let head = &bytes[..bytes.len().min(SVG_SNIFF_LEN)];
    head.windows(4).any(|w| w == b"<svg")
}

/// Decode a raster image into straight-alpha RGBA8.
pub fn decode_image(bytes: &[u8]) -> RippleResult<PixelBuffer> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| RippleError::decode(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    PixelBuffer::new(width, height, rgba.into_raw())
}

/// Parse an SVG document and rasterize it at `target_height`, keeping its aspect ratio.
pub fn rasterize_svg(bytes: &[u8], target_height: u32) -> RippleResult<PixelBuffer> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts)
        .map_err(|e| RippleError::decode(format!("parse svg tree: {e}")))?;

    let size = tree.size();
    let (w, h) = (size.width(), size.height());
    if !w.is_finite() || !h.is_finite() || w <= 0.0 || h <= 0.0 {
        return Err(RippleError::decode("svg has invalid width/height"));
    }
    let width = (f64::from(target_height) * f64::from(w) / f64::from(h))
        .round()
        .max(1.0);
    // Saturating cast; oversized widths fail the bound below.
    let canvas = Canvas::new(width as u32, target_height)?;
    if canvas.width > MAX_DIM || canvas.height > MAX_DIM {
        return Err(RippleError::decode(format!(
            "svg raster size too large: {}x{} (max {MAX_DIM}x{MAX_DIM})",
            canvas.width, canvas.height
        )));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(canvas.width, canvas.height)
        .ok_or_else(|| RippleError::decode("failed to allocate svg pixmap"))?;
    let sx = canvas.width as f32 / w;
    let sy = canvas.height as f32 / h;
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );

    let mut data = pixmap.take();
    unpremultiply_rgba8_in_place(&mut data);
    PixelBuffer::new(canvas.width, canvas.height, data)
}

/// Resample `src` to `target_height` with a triangle filter. Returns `src` as-is when the size
/// already matches.
pub fn resize_to_height(src: PixelBuffer, target_height: u32) -> RippleResult<PixelBuffer> {
    let target = src.canvas().fit_height(target_height)?;
    if target == src.canvas() {
        return Ok(src);
    }

    let img = image::RgbaImage::from_raw(src.width, src.height, src.data)
        .ok_or_else(|| RippleError::evaluation("source buffer does not fit its dimensions"))?;
    let resized = image::imageops::resize(
        &img,
        target.width,
        target.height,
        image::imageops::FilterType::Triangle,
    );
    PixelBuffer::new(target.width, target.height, resized.into_raw())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
