use super::*;
use crate::encode::sink::write_all;
use crate::foundation::core::{FrameIndex, PixelBuffer};

fn cfg() -> SinkConfig {
    SinkConfig {
        width: 128,
        height: 64,
        frame_count: 4,
    }
}

#[test]
fn args_scale_to_preview_and_loop_forever() {
    let opts = PreviewOpts::new("out/logo.webp");
    let preview = Canvas::new(128, 64).unwrap().fit_height(32).unwrap();
    let args = preview_args(&opts, cfg(), preview);

    let pos = |flag: &str| args.iter().position(|a| a == flag).unwrap();
    assert_eq!(args[0], "-y");
    assert_eq!(args[pos("-s") + 1], "128x64");
    assert_eq!(args[pos("-r") + 1], "1000/30");
    assert!(pos("-r") < pos("-i"));
    assert_eq!(args[pos("-vf") + 1], "scale=64:32:flags=lanczos");
    assert_eq!(args[pos("-loop") + 1], "0");
    assert_eq!(args[pos("-c:v") + 1], "libwebp");
    assert_eq!(args.last().map(String::as_str), Some("out/logo.webp"));
}

#[test]
fn no_overwrite_uses_dash_n() {
    let mut opts = PreviewOpts::new("x.webp");
    opts.overwrite = false;
    let args = preview_args(&opts, cfg(), Canvas::new(2, 1).unwrap());
    assert_eq!(args[0], "-n");
}

#[test]
fn zero_delay_is_rejected_before_spawning() {
    let mut opts = PreviewOpts::new("target/preview_zero_delay/x.webp");
    opts.delay_ms = 0;
    let mut sink = PreviewSink::new(opts);
    assert!(matches!(
        sink.begin(cfg()),
        Err(RippleError::Validation(_))
    ));
}

#[test]
fn push_before_begin_is_an_error() {
    let mut sink = PreviewSink::new(PreviewOpts::new("target/preview_unstarted/x.webp"));
    let frame = Frame {
        index: FrameIndex(0),
        phase: 0.0,
        pixels: PixelBuffer::filled(2, 2, [0; 4]).unwrap(),
    };
    assert!(sink.push_frame(&frame).is_err());
    assert!(sink.end().is_err());
}

#[test]
fn encodes_animated_webp_when_ffmpeg_is_available() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let out = PathBuf::from("target")
        .join("preview_encode")
        .join("loop.webp");
    let _ = std::fs::remove_file(&out);

    let frames: Vec<Frame> = (0..4u32)
        .map(|i| Frame {
            index: FrameIndex(i),
            phase: f64::from(i),
            pixels: PixelBuffer::filled(32, 16, [(i * 60) as u8, 100, 200, 255]).unwrap(),
        })
        .collect();

    let mut sink = PreviewSink::new(PreviewOpts {
        height: 8,
        ..PreviewOpts::new(&out)
    });
    match write_all(&mut sink, &frames) {
        Ok(()) => assert!(std::fs::metadata(&out).unwrap().len() > 0),
        // Some ffmpeg builds ship without libwebp.
        Err(RippleError::ExternalTool(msg)) => eprintln!("skipping: {msg}"),
        Err(e) => panic!("unexpected error: {e}"),
    }
}

#[cfg(unix)]
#[test]
fn early_encoder_exit_surfaces_stderr_and_reaps_child() {
    let cfg = SinkConfig {
        width: 256,
        height: 256,
        frame_count: 8,
    };
    let mut sink = PreviewSink::new(PreviewOpts::new("target/preview_early_exit/x.webp"));
    sink.guard.begin(cfg).unwrap();

    // Stands in for an ffmpeg build that rejects the encoder and quits before reading input.
    let mut cmd = Command::new("sh");
    cmd.args(["-c", "echo 'Unknown encoder libwebp' >&2; exit 1"]);
    sink.spawn(cmd).unwrap();

    let mut result = Ok(());
    for i in 0..cfg.frame_count {
        let frame = Frame {
            index: FrameIndex(i),
            phase: f64::from(i),
            pixels: PixelBuffer::filled(256, 256, [1, 2, 3, 255]).unwrap(),
        };
        result = sink.push_frame(&frame);
        if result.is_err() {
            break;
        }
    }
    if result.is_ok() {
        result = sink.end();
    }

    match result {
        Err(RippleError::ExternalTool(msg)) => {
            assert!(msg.contains("Unknown encoder libwebp"), "message: {msg}");
        }
        other => panic!("expected external tool error, got {other:?}"),
    }
    assert!(sink.child.is_none());
    assert!(sink.stdin.is_none());
}
