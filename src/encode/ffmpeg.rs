use std::io::{Read, Write as _};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};

use crate::encode::sink::{FrameGuard, FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, Frame};
use crate::foundation::error::{RippleError, RippleResult};

/// Height of the preview loop in pixels.
pub const PREVIEW_HEIGHT: u32 = 64;
/// Delay between preview frames in milliseconds.
pub const PREVIEW_DELAY_MS: u32 = 30;

/// Options for [`PreviewSink`].
#[derive(Clone, Debug)]
pub struct PreviewOpts {
    /// Output `.webp` path.
    pub out_path: PathBuf,
    /// Preview height; width follows the frame aspect ratio.
    pub height: u32,
    /// Delay between frames in milliseconds.
    pub delay_ms: u32,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
}

impl PreviewOpts {
    /// Default preview options writing to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            height: PREVIEW_HEIGHT,
            delay_ms: PREVIEW_DELAY_MS,
            overwrite: true,
        }
    }
}

/// Sink that spawns the system `ffmpeg` and streams raw RGBA frames into a looping, downscaled
/// animated WebP.
pub struct PreviewSink {
    opts: PreviewOpts,
    guard: FrameGuard,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,
}

impl PreviewSink {
    /// Create a new sink that streams into `ffmpeg`.
    pub fn new(opts: PreviewOpts) -> Self {
        Self {
            opts,
            guard: FrameGuard::default(),
            child: None,
            stdin: None,
            stderr_drain: None,
        }
    }
}

impl FrameSink for PreviewSink {
    fn begin(&mut self, cfg: SinkConfig) -> RippleResult<()> {
        self.guard.begin(cfg)?;
        if self.opts.delay_ms == 0 {
            return Err(RippleError::validation("preview delay_ms must be non-zero"));
        }
        let preview = Canvas::new(cfg.width, cfg.height)?.fit_height(self.opts.height)?;

        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(RippleError::validation(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(RippleError::external_tool(
                "ffmpeg is required for preview encoding, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.args(preview_args(&self.opts, cfg, preview));
        self.spawn(cmd)?;

        tracing::debug!(
            out = %self.opts.out_path.display(),
            width = preview.width,
            height = preview.height,
            "spawned ffmpeg preview encoder"
        );
        Ok(())
    }

    fn push_frame(&mut self, frame: &Frame) -> RippleResult<()> {
        self.guard.check(frame)?;
        let Some(stdin) = self.stdin.as_mut() else {
            return Err(RippleError::evaluation("preview sink is already finalized"));
        };
        if let Err(e) = stdin.write_all(&frame.pixels.data) {
            // The encoder usually died; its stderr says why.
            let detail = match self.reap() {
                Ok((status, stderr)) => format!("ffmpeg exited with status {status}: {stderr}"),
                Err(reap_err) => reap_err.to_string(),
            };
            return Err(RippleError::external_tool(format!(
                "failed to write frame to ffmpeg stdin: {e}; {detail}"
            )));
        }
        Ok(())
    }

    fn end(&mut self) -> RippleResult<()> {
        let counted = self.guard.finish();
        let (status, stderr) = self.reap()?;
        if !status.success() {
            return Err(RippleError::external_tool(format!(
                "ffmpeg exited with status {status}: {stderr}"
            )));
        }
        counted?;
        Ok(())
    }
}

impl PreviewSink {
    fn spawn(&mut self, mut cmd: Command) -> RippleResult<()> {
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| {
            RippleError::external_tool(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child.stdin.take().ok_or_else(|| {
            RippleError::external_tool("failed to open ffmpeg stdin (unexpected)")
        })?;
        let mut stderr = child.stderr.take().ok_or_else(|| {
            RippleError::external_tool("failed to open ffmpeg stderr (unexpected)")
        })?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        Ok(())
    }

    /// Close stdin, wait for the encoder and collect its stderr.
    fn reap(&mut self) -> RippleResult<(ExitStatus, String)> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| RippleError::evaluation("preview sink not started"))?;

        let status = child.wait().map_err(|e| {
            RippleError::external_tool(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| RippleError::evaluation("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| {
                    RippleError::external_tool(format!("ffmpeg stderr read failed: {e}"))
                })?,
            None => Vec::new(),
        };
        Ok((
            status,
            String::from_utf8_lossy(&stderr_bytes).trim().to_string(),
        ))
    }
}

impl Drop for PreviewSink {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// Full `ffmpeg` argument list for a preview of `cfg`-sized frames scaled to `preview`.
pub(crate) fn preview_args(opts: &PreviewOpts, cfg: SinkConfig, preview: Canvas) -> Vec<String> {
    let mut args: Vec<String> = Vec::new();
    args.push(if opts.overwrite { "-y" } else { "-n" }.to_string());
    args.extend(
        [
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
        ]
        .map(String::from),
    );
    args.push(format!("{}x{}", cfg.width, cfg.height));
    // For rawvideo input, `-r` before `-i` sets the input framerate.
    args.push("-r".to_string());
    args.push(format!("1000/{}", opts.delay_ms));
    args.extend(["-i", "pipe:0", "-an", "-vf"].map(String::from));
    args.push(format!(
        "scale={}:{}:flags=lanczos",
        preview.width, preview.height
    ));
    args.extend(
        [
            "-c:v",
            "libwebp",
            "-pix_fmt",
            "yuva420p",
            "-lossless",
            "0",
            "-quality",
            "75",
            "-loop",
            "0",
        ]
        .map(String::from),
    );
    args.push(opts.out_path.to_string_lossy().into_owned());
    args
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> RippleResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
