use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{RippleError, RippleResult};

/// Frame rate reported to sprite consumers.
pub const FRAME_RATE: u32 = 30;

/// Sidecar describing a sprite sheet for the player that slices it.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpriteMeta {
    /// Relative URL of the sprite sheet.
    pub image_url: String,
    /// Relative URL of the preview loop, if one was produced.
    pub preview_url: Option<String>,
    /// Width of a single frame.
    pub width: u32,
    /// Height of a single frame.
    pub height: u32,
    /// Playback frame rate.
    pub frame_rate: u32,
    /// Number of frames in the sheet.
    pub frames: u32,
    /// Number of animation variants in the sheet.
    pub variants: u32,
}

impl SpriteMeta {
    /// Metadata for the `<stem>.sprite.png` sheet and optional `<stem>.webp` preview.
    pub fn for_stem(stem: &str, width: u32, height: u32, frames: u32, has_preview: bool) -> Self {
        Self {
            image_url: format!("./{stem}.sprite.png"),
            preview_url: has_preview.then(|| format!("./{stem}.webp")),
            width,
            height,
            frame_rate: FRAME_RATE,
            frames,
            variants: 1,
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json_pretty(&self) -> RippleResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| RippleError::evaluation(format!("serialize sprite metadata: {e}")))
    }

    /// Write pretty-printed JSON to `path`.
    pub fn write_to(&self, path: &Path) -> RippleResult<()> {
        let json = self.to_json_pretty()?;
        std::fs::write(path, json)
            .with_context(|| format!("write sprite metadata '{}'", path.display()))?;
        Ok(())
    }
}
