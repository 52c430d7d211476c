use super::*;
use crate::encode::sink::write_all;
use crate::foundation::core::PixelBuffer;

fn frames(n: u32, w: u32, h: u32) -> Vec<Frame> {
    (0..n)
        .map(|i| Frame {
            index: FrameIndex(i),
            phase: f64::from(i),
            pixels: PixelBuffer::filled(w, h, [(i * 40) as u8, 7, 9, 255 - i as u8]).unwrap(),
        })
        .collect()
}

fn scratch(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("png_sinks").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn frame_names_are_zero_padded() {
    assert_eq!(frame_file_name(FrameIndex(0)), "frame-000.png");
    assert_eq!(frame_file_name(FrameIndex(29)), "frame-029.png");
    assert_eq!(frame_file_name(FrameIndex(1234)), "frame-1234.png");
}

#[test]
fn png_sequence_writes_one_file_per_frame() {
    let dir = scratch("sequence");
    let mut sink = PngSequenceSink::new(dir.join("frames"));
    write_all(&mut sink, &frames(3, 4, 2)).unwrap();

    assert_eq!(sink.written().len(), 3);
    let img = image::open(dir.join("frames").join("frame-002.png"))
        .unwrap()
        .to_rgba8();
    assert_eq!(img.dimensions(), (4, 2));
    assert_eq!(img.get_pixel(3, 1).0, [80, 7, 9, 253]);
}

#[test]
fn sprite_sheet_concatenates_horizontally() {
    let dir = scratch("sheet");
    let out = dir.join("logo.sprite.png");
    let mut sink = SpriteSheetSink::new(&out);
    write_all(&mut sink, &frames(4, 3, 2)).unwrap();

    assert!(!dir.join("logo.sprite.png.tmp").exists());
    let sheet = image::open(&out).unwrap().to_rgba8();
    assert_eq!(sheet.dimensions(), (12, 2));
    for i in 0..4u32 {
        assert_eq!(
            sheet.get_pixel(i * 3 + 1, 1).0,
            [(i * 40) as u8, 7, 9, 255 - i as u8]
        );
    }
}

#[test]
fn sprite_sheet_is_not_written_on_short_sequence() {
    let dir = scratch("short");
    let out = dir.join("short.sprite.png");
    let mut sink = SpriteSheetSink::new(&out);
    sink.begin(SinkConfig {
        width: 2,
        height: 2,
        frame_count: 3,
    })
    .unwrap();
    sink.push_frame(&frames(1, 2, 2)[0]).unwrap();
    assert!(sink.end().is_err());
    assert!(!out.exists());
}

#[test]
fn sprite_sheet_rejects_gapped_indices() {
    let dir = scratch("gapped");
    let out = dir.join("gapped.sprite.png");
    let tile = |i: u32, rgba: [u8; 4]| Frame {
        index: FrameIndex(i),
        phase: f64::from(i),
        pixels: PixelBuffer::filled(2, 2, rgba).unwrap(),
    };
    let frames = [tile(0, [255, 0, 0, 255]), tile(5, [0, 255, 0, 255])];

    let mut sink = SpriteSheetSink::new(&out);
    assert!(matches!(
        write_all(&mut sink, &frames),
        Err(RippleError::Evaluation(_))
    ));
    assert!(!out.exists());
}

#[test]
fn failed_rename_leaves_no_temp_file() {
    let dir = scratch("rename_fails");
    // A directory at the destination makes the final rename fail.
    let out = dir.join("blocked.sprite.png");
    std::fs::create_dir_all(out.join("occupied")).unwrap();

    let mut sink = SpriteSheetSink::new(&out);
    assert!(write_all(&mut sink, &frames(2, 2, 2)).is_err());
    assert!(!tmp_sibling(&out).exists());
    assert!(out.is_dir());
}
