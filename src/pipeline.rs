use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context as _;

use crate::assets::decode::{TARGET_HEIGHT, load_source};
use crate::encode::ffmpeg::{PREVIEW_DELAY_MS, PREVIEW_HEIGHT, PreviewOpts, PreviewSink};
use crate::encode::meta::SpriteMeta;
use crate::encode::png::{PngSequenceSink, SpriteSheetSink};
use crate::encode::sink::write_all;
use crate::foundation::error::{RippleError, RippleResult};
use crate::wave::params::{WaveParams, WaveSettings};
use crate::wave::sequence::{FrameSequencer, SequenceOpts};

/// Options for turning one source image into a sprite animation.
#[derive(Clone, Debug)]
pub struct AnimateOpts {
    /// Height every source is brought to before animating.
    pub target_height: u32,
    /// Wave overrides applied on top of the defaults.
    pub wave: WaveSettings,
    /// Frame count and threading.
    pub sequence: SequenceOpts,
    /// Produce the `ffmpeg` preview loop.
    pub preview: bool,
    /// Preview height in pixels.
    pub preview_height: u32,
    /// Delay between preview frames in milliseconds.
    pub preview_delay_ms: u32,
    /// Also write each frame as `frame-NNN.png`.
    pub keep_frames: bool,
}

impl Default for AnimateOpts {
    fn default() -> Self {
        Self {
            target_height: TARGET_HEIGHT,
            wave: WaveSettings::default(),
            sequence: SequenceOpts::default(),
            preview: true,
            preview_height: PREVIEW_HEIGHT,
            preview_delay_ms: PREVIEW_DELAY_MS,
            keep_frames: false,
        }
    }
}

/// Files produced for one source, all inside `<output>/<stem>/`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputPaths {
    /// Per-source output directory.
    pub dir: PathBuf,
    /// `<stem>.sprite.png`; its presence marks the source as done.
    pub sprite: PathBuf,
    /// `<stem>.sprite.json`.
    pub meta: PathBuf,
    /// `<stem>.webp`.
    pub preview: PathBuf,
}

impl OutputPaths {
    /// Output layout for `stem` under `output_root`.
    pub fn new(output_root: &Path, stem: &str) -> Self {
        let dir = output_root.join(stem);
        Self {
            sprite: dir.join(format!("{stem}.sprite.png")),
            meta: dir.join(format!("{stem}.sprite.json")),
            preview: dir.join(format!("{stem}.webp")),
            dir,
        }
    }

    /// `true` when a previous run completed this source.
    pub fn is_complete(&self) -> bool {
        self.sprite.is_file()
    }
}

/// Result of processing a single source file.
#[derive(Clone, Debug, PartialEq)]
pub enum FileOutcome {
    /// Frames were rendered and written.
    Animated {
        /// Frame width.
        width: u32,
        /// Frame height.
        height: u32,
        /// Number of frames in the sheet.
        frames: u32,
    },
    /// Output already existed.
    Skipped,
}

/// Per-folder summary.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Sources animated in this run.
    pub animated: Vec<PathBuf>,
    /// Sources skipped because their output already existed.
    pub skipped: Vec<PathBuf>,
    /// Sources that failed, with the reason.
    pub failed: Vec<(PathBuf, RippleError)>,
}

impl BatchReport {
    /// `true` when no source failed.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Animate one source file into `<output_root>/<stem>/`.
///
/// Write order is frames, preview, metadata, then the sprite sheet last so an interrupted run
/// is retried next time.
#[tracing::instrument(skip(source, output_root, opts), fields(file = %source.display()))]
pub fn animate_file(
    source: &Path,
    output_root: &Path,
    opts: &AnimateOpts,
) -> RippleResult<FileOutcome> {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            RippleError::validation(format!("'{}' has no file stem", source.display()))
        })?;
    let paths = OutputPaths::new(output_root, &stem);
    if paths.is_complete() {
        tracing::info!("skipping, already processed");
        return Ok(FileOutcome::Skipped);
    }

    let started = Instant::now();
    tracing::info!("started");

    let src = load_source(source, opts.target_height)?;
    let params = WaveParams::scaled(&opts.wave, src.canvas())?;
    let frames = FrameSequencer::new(params, opts.sequence.clone())?.render(&src)?;

    std::fs::create_dir_all(&paths.dir)
        .with_context(|| format!("create output directory '{}'", paths.dir.display()))?;

    if opts.keep_frames {
        write_all(&mut PngSequenceSink::new(&paths.dir), &frames)?;
    }
    if opts.preview {
        let mut sink = PreviewSink::new(PreviewOpts {
            out_path: paths.preview.clone(),
            height: opts.preview_height,
            delay_ms: opts.preview_delay_ms,
            overwrite: true,
        });
        write_all(&mut sink, &frames)?;
    }

    let frame_count = frames.len() as u32;
    SpriteMeta::for_stem(&stem, src.width, src.height, frame_count, opts.preview)
        .write_to(&paths.meta)?;
    write_all(&mut SpriteSheetSink::new(&paths.sprite), &frames)?;

    tracing::info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        width = src.width,
        height = src.height,
        "animated"
    );
    Ok(FileOutcome::Animated {
        width: src.width,
        height: src.height,
        frames: frame_count,
    })
}

/// Animate every visible file in `input` into `output`.
///
/// A failing source is logged and recorded in the report; the remaining sources still run.
/// Only an unreadable input folder or uncreatable output folder fails the whole batch.
pub fn animate_folder(
    input: &Path,
    output: &Path,
    opts: &AnimateOpts,
) -> RippleResult<BatchReport> {
    let mut sources = Vec::new();
    let entries = std::fs::read_dir(input)
        .with_context(|| format!("read input folder '{}'", input.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("list input folder '{}'", input.display()))?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "ignoring non-file entry");
            continue;
        }
        sources.push(path);
    }
    sources.sort();

    std::fs::create_dir_all(output)
        .with_context(|| format!("create output folder '{}'", output.display()))?;

    let mut report = BatchReport::default();
    for source in sources {
        match animate_file(&source, output, opts) {
            Ok(FileOutcome::Animated { .. }) => report.animated.push(source),
            Ok(FileOutcome::Skipped) => report.skipped.push(source),
            Err(e) => {
                tracing::error!(file = %source.display(), error = %e, "failed");
                report.failed.push((source, e));
            }
        }
    }

    tracing::info!(
        animated = report.animated.len(),
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        "all done"
    );
    Ok(report)
}
