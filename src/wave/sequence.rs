use rayon::prelude::*;

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Frame, FrameIndex, PixelBuffer};
use crate::foundation::error::{RippleError, RippleResult};
use crate::wave::kernel::displace_buffer;
use crate::wave::params::WaveParams;

/// Frames per animation cycle.
pub const FRAME_COUNT: u32 = 30;

/// Phase units spanned by one full sequence.
pub const SEQUENCE_SPAN: f64 = 1000.0;

#[derive(Clone, Debug)]
/// Frame count and threading controls for [`FrameSequencer`].
pub struct SequenceOpts {
    /// Number of evenly spaced phase samples.
    pub frame_count: u32,
    /// Render frames on a rayon pool when `true`.
    pub parallel: bool,
    /// Optional explicit worker thread count (parallel mode only).
    pub threads: Option<usize>,
}

impl Default for SequenceOpts {
    fn default() -> Self {
        Self {
            frame_count: FRAME_COUNT,
            parallel: true,
            threads: None,
        }
    }
}

/// Samples the displacement kernel at `frame_count` phases of one cycle.
///
/// Each frame is computed from the original source; no frame ever reads another frame's output.
#[derive(Clone, Debug)]
pub struct FrameSequencer {
    params: WaveParams,
    opts: SequenceOpts,
}

impl FrameSequencer {
    /// Create a sequencer for `params`.
    pub fn new(params: WaveParams, opts: SequenceOpts) -> RippleResult<Self> {
        if opts.frame_count == 0 {
            return Err(RippleError::validation("frame_count must be >= 1"));
        }
        if let Some(n) = opts.threads
            && n == 0
        {
            return Err(RippleError::validation(
                "sequence threading 'threads' must be >= 1 when set",
            ));
        }
        params.validate()?;
        Ok(Self { params, opts })
    }

    /// Phase step between consecutive frames.
    pub fn frame_duration(&self) -> f64 {
        SEQUENCE_SPAN / f64::from(self.opts.frame_count)
    }

    /// Phase for every frame, in index order.
    pub fn phases(&self) -> Vec<f64> {
        let step = self.frame_duration();
        (0..self.opts.frame_count)
            .map(|i| f64::from(i) * step)
            .collect()
    }

    /// Render every frame of the cycle, ordered by index.
    #[tracing::instrument(skip(self, source), fields(width = source.width, height = source.height))]
    pub fn render(&self, source: &PixelBuffer) -> RippleResult<Vec<Frame>> {
        let phases = self.phases();
        let render_one = |(i, phase): (usize, &f64)| -> RippleResult<Frame> {
            Ok(Frame {
                index: FrameIndex(i as u32),
                phase: *phase,
                pixels: displace_buffer(source, &self.params, *phase)?,
            })
        };

        let frames = if self.opts.parallel {
            let pool = build_thread_pool(self.opts.threads)?;
            // Indexed collect keeps frame order regardless of completion order.
            pool.install(|| {
                phases
                    .par_iter()
                    .enumerate()
                    .map(render_one)
                    .collect::<RippleResult<Vec<_>>>()
            })?
        } else {
            phases
                .iter()
                .enumerate()
                .map(render_one)
                .collect::<RippleResult<Vec<_>>>()?
        };

        tracing::debug!(frames = frames.len(), "rendered sequence");
        Ok(frames)
    }

    /// Render the cycle and stream it into `sink` in index order.
    pub fn render_into(&self, source: &PixelBuffer, sink: &mut dyn FrameSink) -> RippleResult<()> {
        let frames = self.render(source)?;
        sink.begin(SinkConfig {
            width: source.width,
            height: source.height,
            frame_count: self.opts.frame_count,
        })?;
        for frame in &frames {
            sink.push_frame(frame)?;
        }
        sink.end()
    }
}

fn build_thread_pool(threads: Option<usize>) -> RippleResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| RippleError::evaluation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/wave/sequence.rs"]
mod tests;
