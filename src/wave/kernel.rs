//! The displacement kernel: one pure function from `(source, params, phase)` to a warped frame.
//!
//! The kernel works in two passes:
//!
//! 1. A per-column profile (`pct`, `offset`, `slope`) computed once per frame. The two
//!    superposed sinusoids and the left-to-right ramp only depend on `x`, so every row reuses it.
//! 2. A per-pixel pass that samples the *original* source with nearest-neighbour lookup and
//!    applies an achromatic shading delta.
//!
//! Tables are stored as `f32` and sample coordinates round half up; changing either shifts
//! output bytes.

use crate::foundation::core::{Canvas, PixelBuffer, check_len};
use crate::foundation::error::{RippleError, RippleResult};
use crate::foundation::math::{clamp_channel, round_half_up};
use crate::wave::params::WaveParams;

const PRIMARY_WEIGHT: f64 = 0.7;
const SECONDARY_WEIGHT: f64 = 0.3;
const SECONDARY_FREQ: f64 = 1.0 / 0.8;
/// Fraction of the vertical offset applied horizontally.
const HORIZONTAL_DAMPING: f64 = 0.3;
const VERTICAL_SHADE: f64 = 15.0;
const EDGE_SHADOW: f64 = 20.0;

/// Per-column wave profile for one phase.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnProfile {
    /// `x / width`, the left-to-right strength ramp.
    pub pct: Vec<f32>,
    /// Vertical displacement of the column.
    pub offset: Vec<f32>,
    /// Discrete horizontal derivative of `offset`; `slope[0] == offset[0]`.
    pub slope: Vec<f32>,
}

impl ColumnProfile {
    /// Compute the profile for `width` columns at `phase`.
    pub fn compute(width: u32, params: &WaveParams, phase: f64) -> Self {
        let w = width as usize;
        let theta = angular_phase(phase, params.period);
        let inv_w = 1.0 / f64::from(width);
        let inv_wl = 1.0 / params.wave_length;

        let mut pct = Vec::with_capacity(w);
        let mut offset = Vec::<f32>::with_capacity(w);
        let mut slope = Vec::with_capacity(w);
        for x in 0..w {
            let ramp = x as f64 * inv_w;
            let fx = x as f64 * inv_wl;
            let wave1 = (fx - theta).sin() * PRIMARY_WEIGHT;
            let wave2 = (fx * SECONDARY_FREQ - theta).sin() * SECONDARY_WEIGHT;
            let o = (wave1 + wave2) * params.amplitude * ramp;

            let s = match offset.last() {
                Some(&prev) => o - f64::from(prev),
                None => o,
            };
            pct.push(ramp as f32);
            offset.push(o as f32);
            slope.push(s as f32);
        }

        Self { pct, offset, slope }
    }
}

/// `2π · phase / period`, with `phase` reduced modulo `period` first.
fn angular_phase(phase: f64, period: f64) -> f64 {
    std::f64::consts::TAU * phase.rem_euclid(period) / period
}

/// Warp `source` (straight RGBA8, `width * height * 4` bytes) at `phase`.
///
/// Returns a freshly allocated buffer of the same size. Destination pixels whose source
/// coordinate falls outside the image are fully transparent black; all others copy the sampled
/// alpha unchanged and shift RGB by a shared shading delta.
pub fn displace(
    source: &[u8],
    width: u32,
    height: u32,
    params: &WaveParams,
    phase: f64,
) -> RippleResult<Vec<u8>> {
    let canvas = Canvas::new(width, height)?;
    check_len(canvas, source.len())?;
    params.validate()?;
    if !phase.is_finite() {
        return Err(RippleError::invalid_parameter(format!(
            "phase must be finite, got {phase}"
        )));
    }

    let profile = ColumnProfile::compute(width, params, phase);
    let w = width as usize;
    let h = f64::from(height);
    let half_h = h * 0.5;
    let squeeze_per_row = params.squeeze / h;

    let mut out = vec![0u8; canvas.rgba_len()];
    for (y, row) in out.chunks_exact_mut(w * 4).enumerate() {
        let yf = y as f64;
        let squeeze = (yf - half_h) * squeeze_per_row;
        let edge_shadow = (1.0 - (yf - half_h).abs() / half_h) * EDGE_SHADOW;

        for (x, dst) in row.chunks_exact_mut(4).enumerate() {
            let pct = f64::from(profile.pct[x]);
            let o = f64::from(profile.offset[x]);
            let pinch = squeeze * pct;

            let sx = round_half_up(x as f64 + o * HORIZONTAL_DAMPING);
            let sy = round_half_up(yf + o + pinch);
            if sx < 0.0 || sx >= f64::from(width) || sy < 0.0 || sy >= h {
                // Already zeroed: transparent black.
                continue;
            }

            let si = (sy as usize * w + sx as usize) * 4;
            let src = &source[si..si + 4];
            let delta = f64::from(profile.slope[x]) * params.shading
                - (o + pinch) * VERTICAL_SHADE
                - edge_shadow;

            dst[0] = clamp_channel(f64::from(src[0]) + delta);
            dst[1] = clamp_channel(f64::from(src[1]) + delta);
            dst[2] = clamp_channel(f64::from(src[2]) + delta);
            dst[3] = src[3];
        }
    }

    Ok(out)
}

/// [`displace`] over a [`PixelBuffer`].
pub fn displace_buffer(
    source: &PixelBuffer,
    params: &WaveParams,
    phase: f64,
) -> RippleResult<PixelBuffer> {
    let data = displace(&source.data, source.width, source.height, params, phase)?;
    Ok(PixelBuffer {
        width: source.width,
        height: source.height,
        data,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/wave/kernel.rs"]
mod tests;
