use super::*;
use crate::encode::sink::InMemorySink;
use crate::foundation::core::Canvas;

fn source() -> PixelBuffer {
    let (w, h) = (20u32, 12u32);
    let mut data = Vec::new();
    for y in 0..h {
        for x in 0..w {
            data.extend_from_slice(&[(x * 12) as u8, (y * 20) as u8, 90, 255]);
        }
    }
    PixelBuffer::new(w, h, data).unwrap()
}

fn sequencer(opts: SequenceOpts) -> FrameSequencer {
    let params = WaveParams::for_canvas(Canvas::new(20, 12).unwrap()).unwrap();
    FrameSequencer::new(params, opts).unwrap()
}

#[test]
fn phases_are_evenly_spaced_over_the_span() {
    let seq = sequencer(SequenceOpts {
        frame_count: 4,
        ..SequenceOpts::default()
    });
    assert_eq!(seq.frame_duration(), 250.0);
    assert_eq!(seq.phases(), vec![0.0, 250.0, 500.0, 750.0]);

    let seq = sequencer(SequenceOpts::default());
    let phases = seq.phases();
    assert_eq!(phases.len(), 30);
    assert_eq!(phases[3], 3.0 * (1000.0 / 30.0));
}

#[test]
fn parallel_matches_sequential_and_keeps_order() {
    let src = source();
    let par = sequencer(SequenceOpts {
        frame_count: 8,
        parallel: true,
        threads: Some(3),
    })
    .render(&src)
    .unwrap();
    let seq = sequencer(SequenceOpts {
        frame_count: 8,
        parallel: false,
        threads: None,
    })
    .render(&src)
    .unwrap();

    assert_eq!(par.len(), 8);
    for (i, (a, b)) in par.iter().zip(&seq).enumerate() {
        assert_eq!(a.index, FrameIndex(i as u32));
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.pixels, b.pixels);
    }
}

#[test]
fn frames_are_computed_from_the_original_source() {
    let src = source();
    let seq = sequencer(SequenceOpts {
        frame_count: 5,
        parallel: false,
        threads: None,
    });
    let params = WaveParams::for_canvas(src.canvas()).unwrap();
    for frame in seq.render(&src).unwrap() {
        let direct = displace_buffer(&src, &params, frame.phase).unwrap();
        assert_eq!(frame.pixels, direct, "frame {}", frame.index.0);
    }
}

#[test]
fn render_into_streams_every_frame() {
    let src = source();
    let seq = sequencer(SequenceOpts {
        frame_count: 3,
        ..SequenceOpts::default()
    });
    let mut sink = InMemorySink::new();
    seq.render_into(&src, &mut sink).unwrap();
    assert_eq!(sink.config().unwrap().frame_count, 3);
    assert_eq!(sink.frames().len(), 3);
}

#[test]
fn invalid_options_are_rejected() {
    let params = WaveParams::for_canvas(Canvas::new(4, 4).unwrap()).unwrap();
    let zero_frames = SequenceOpts {
        frame_count: 0,
        ..SequenceOpts::default()
    };
    assert!(matches!(
        FrameSequencer::new(params, zero_frames),
        Err(RippleError::Validation(_))
    ));
    let zero_threads = SequenceOpts {
        threads: Some(0),
        ..SequenceOpts::default()
    };
    assert!(matches!(
        FrameSequencer::new(params, zero_threads),
        Err(RippleError::Validation(_))
    ));
}
