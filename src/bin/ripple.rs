use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "ripple",
    version,
    about = "Animate every image in a folder into a waving sprite sheet"
)]
struct Cli {
    /// Folder containing source images (raster formats or SVG).
    input: PathBuf,

    /// Folder receiving one `<name>/` directory per source.
    output: PathBuf,

    /// Frames per animation cycle.
    #[arg(long, default_value_t = ripple::FRAME_COUNT)]
    frames: u32,

    /// Height every source is resized to.
    #[arg(long, default_value_t = ripple::TARGET_HEIGHT)]
    height: u32,

    /// JSON file with wave settings (`waveLength`, `amplitude`, `period`, `shading`, `squeeze`).
    #[arg(long)]
    params: Option<PathBuf>,

    /// Wave length override (reference pixels, 500px basis).
    #[arg(long)]
    wave_length: Option<f64>,

    /// Amplitude override (reference pixels, 500px basis).
    #[arg(long)]
    amplitude: Option<f64>,

    /// Period override (phase units).
    #[arg(long)]
    period: Option<f64>,

    /// Shading strength override.
    #[arg(long)]
    shading: Option<f64>,

    /// Squeeze override (reference pixels, 500px basis).
    #[arg(long)]
    squeeze: Option<f64>,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,

    /// Render frames one at a time instead of on a worker pool.
    #[arg(long, default_value_t = false)]
    sequential: bool,

    /// Keep the individual `frame-NNN.png` files next to the sprite sheet.
    #[arg(long, default_value_t = false)]
    keep_frames: bool,

    /// Skip the animated WebP preview (no `ffmpeg` needed).
    #[arg(long, default_value_t = false)]
    no_preview: bool,

    /// Enable debug logging.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let opts = build_opts(&cli)?;
    let report = ripple::animate_folder(&cli.input, &cli.output, &opts)?;

    if !report.is_success() {
        for (path, err) in &report.failed {
            eprintln!("failed {}: {err}", path.display());
        }
        anyhow::bail!(
            "{} of {} files failed",
            report.failed.len(),
            report.failed.len() + report.animated.len() + report.skipped.len()
        );
    }
    Ok(())
}

fn build_opts(cli: &Cli) -> anyhow::Result<ripple::AnimateOpts> {
    let mut wave = match &cli.params {
        Some(path) => ripple::WaveSettings::from_path(path)
            .with_context(|| format!("load wave settings '{}'", path.display()))?,
        None => ripple::WaveSettings::default(),
    };
    let overrides = [
        (&mut wave.wave_length, cli.wave_length),
        (&mut wave.amplitude, cli.amplitude),
        (&mut wave.period, cli.period),
        (&mut wave.shading, cli.shading),
        (&mut wave.squeeze, cli.squeeze),
    ];
    for (slot, value) in overrides {
        if value.is_some() {
            *slot = value;
        }
    }

    Ok(ripple::AnimateOpts {
        target_height: cli.height,
        wave,
        sequence: ripple::SequenceOpts {
            frame_count: cli.frames,
            parallel: !cli.sequential,
            threads: cli.threads,
        },
        preview: !cli.no_preview,
        keep_frames: cli.keep_frames,
        ..ripple::AnimateOpts::default()
    })
}
