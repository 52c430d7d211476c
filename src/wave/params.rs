use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::Canvas;
use crate::foundation::error::{RippleError, RippleResult};

/// Side length of the square the wave shape is designed against.
pub const REFERENCE_SIZE: f64 = 500.0;

/// Default wave length in reference pixels.
pub const DEFAULT_WAVE_LENGTH: f64 = REFERENCE_SIZE / 8.0;
/// Default vertical amplitude in reference pixels.
pub const DEFAULT_AMPLITUDE: f64 = 15.0;
/// Default period in phase units.
pub const DEFAULT_PERIOD: f64 = 200.0;
/// Default shading strength applied to the column slope.
pub const DEFAULT_SHADING: f64 = 80.0;
/// Default vertical pinch in reference pixels.
pub const DEFAULT_SQUEEZE: f64 = 0.1;

/// User-facing wave overrides. Unset (or zero) fields take the defaults.
///
/// Values are expressed against a 500x500 reference image and are rescaled per canvas by
/// [`WaveParams::scaled`].
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WaveSettings {
    /// Horizontal distance between crests.
    #[serde(default)]
    pub wave_length: Option<f64>,
    /// Peak vertical displacement.
    #[serde(default)]
    pub amplitude: Option<f64>,
    /// Phase units per full cycle.
    #[serde(default)]
    pub period: Option<f64>,
    /// Strength of slope-based shading.
    #[serde(default)]
    pub shading: Option<f64>,
    /// Vertical pinch toward the centre line.
    #[serde(default)]
    pub squeeze: Option<f64>,
}

impl WaveSettings {
    /// Parse settings from JSON text.
    pub fn from_json_str(s: &str) -> RippleResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| RippleError::validation(format!("invalid wave settings json: {e}")))
    }

    /// Read and parse a JSON settings file.
    pub fn from_path(path: &Path) -> RippleResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read wave settings '{}'", path.display()))?;
        Self::from_json_str(&text)
    }
}

/// Wave coefficients scaled for one canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveParams {
    /// Scaled wave length (by width).
    pub wave_length: f64,
    /// Scaled amplitude (by height).
    pub amplitude: f64,
    /// Period in phase units, unscaled.
    pub period: f64,
    /// Shading strength, unscaled.
    pub shading: f64,
    /// Scaled squeeze (by height).
    pub squeeze: f64,
}

impl WaveParams {
    /// Resolve `settings` against the defaults and scale them to `canvas`.
    pub fn scaled(settings: &WaveSettings, canvas: Canvas) -> RippleResult<Self> {
        let canvas = Canvas::new(canvas.width, canvas.height)?;
        let sx = f64::from(canvas.width) / REFERENCE_SIZE;
        let sy = f64::from(canvas.height) / REFERENCE_SIZE;

        let params = Self {
            wave_length: or_default(settings.wave_length, DEFAULT_WAVE_LENGTH) * sx,
            amplitude: or_default(settings.amplitude, DEFAULT_AMPLITUDE) * sy,
            period: or_default(settings.period, DEFAULT_PERIOD),
            shading: or_default(settings.shading, DEFAULT_SHADING),
            squeeze: or_default(settings.squeeze, DEFAULT_SQUEEZE) * sy,
        };
        params.validate()?;
        Ok(params)
    }

    /// Default parameters scaled to `canvas`.
    pub fn for_canvas(canvas: Canvas) -> RippleResult<Self> {
        Self::scaled(&WaveSettings::default(), canvas)
    }

    /// Check every coefficient is finite and the divisors are non-zero.
    pub fn validate(&self) -> RippleResult<()> {
        let fields = [
            ("waveLength", self.wave_length),
            ("amplitude", self.amplitude),
            ("period", self.period),
            ("shading", self.shading),
            ("squeeze", self.squeeze),
        ];
        for (name, v) in fields {
            if !v.is_finite() {
                return Err(RippleError::invalid_parameter(format!(
                    "{name} must be finite, got {v}"
                )));
            }
        }
        if self.wave_length == 0.0 {
            return Err(RippleError::invalid_parameter("waveLength must be non-zero"));
        }
        if self.period == 0.0 {
            return Err(RippleError::invalid_parameter("period must be non-zero"));
        }
        Ok(())
    }
}

fn or_default(v: Option<f64>, default: f64) -> f64 {
    match v {
        Some(v) if v != 0.0 => v,
        _ => default,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/wave/params.rs"]
mod tests;
