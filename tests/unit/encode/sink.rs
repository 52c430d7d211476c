use super::*;
use crate::foundation::core::{FrameIndex, PixelBuffer};

fn frame(i: u32, w: u32, h: u32) -> Frame {
    Frame {
        index: FrameIndex(i),
        phase: f64::from(i),
        pixels: PixelBuffer::filled(w, h, [i as u8, 0, 0, 255]).unwrap(),
    }
}

#[test]
fn write_all_drives_full_cycle() {
    let frames: Vec<Frame> = (0..3).map(|i| frame(i, 2, 2)).collect();
    let mut sink = InMemorySink::new();
    write_all(&mut sink, &frames).unwrap();

    assert_eq!(
        sink.config(),
        Some(SinkConfig {
            width: 2,
            height: 2,
            frame_count: 3
        })
    );
    let idx: Vec<u32> = sink.frames().iter().map(|f| f.index.0).collect();
    assert_eq!(idx, vec![0, 1, 2]);
}

#[test]
fn write_all_rejects_empty_sequence() {
    let mut sink = InMemorySink::new();
    assert!(matches!(
        write_all(&mut sink, &[]),
        Err(RippleError::Validation(_))
    ));
}

#[test]
fn guard_enforces_order_size_and_count() {
    let cfg = SinkConfig {
        width: 2,
        height: 2,
        frame_count: 2,
    };

    let mut guard = FrameGuard::default();
    assert!(guard.check(&frame(0, 2, 2)).is_err());

    guard.begin(cfg).unwrap();
    guard.check(&frame(0, 2, 2)).unwrap();
    assert!(matches!(
        guard.check(&frame(0, 2, 2)),
        Err(RippleError::Evaluation(_))
    ));
    assert!(matches!(
        guard.check(&frame(1, 3, 2)),
        Err(RippleError::Validation(_))
    ));
    assert!(matches!(guard.finish(), Err(RippleError::Validation(_))));

    guard.begin(cfg).unwrap();
    guard.check(&frame(0, 2, 2)).unwrap();
    guard.check(&frame(1, 2, 2)).unwrap();
    assert!(guard.check(&frame(2, 2, 2)).is_err());
    assert_eq!(guard.finish().unwrap(), cfg);
}

#[test]
fn guard_rejects_gaps_and_late_starts() {
    let cfg = SinkConfig {
        width: 2,
        height: 2,
        frame_count: 4,
    };
    let mut guard = FrameGuard::default();

    guard.begin(cfg).unwrap();
    assert!(matches!(
        guard.check(&frame(1, 2, 2)),
        Err(RippleError::Evaluation(_))
    ));

    guard.begin(cfg).unwrap();
    guard.check(&frame(0, 2, 2)).unwrap();
    assert!(matches!(
        guard.check(&frame(2, 2, 2)),
        Err(RippleError::Evaluation(_))
    ));
    guard.check(&frame(1, 2, 2)).unwrap();
}

#[test]
fn guard_rejects_degenerate_config() {
    let mut guard = FrameGuard::default();
    assert!(matches!(
        guard.begin(SinkConfig {
            width: 0,
            height: 2,
            frame_count: 1
        }),
        Err(RippleError::InvalidDimensions(_))
    ));
    assert!(matches!(
        guard.begin(SinkConfig {
            width: 2,
            height: 2,
            frame_count: 0
        }),
        Err(RippleError::Validation(_))
    ));
}
