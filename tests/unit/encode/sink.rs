use super::*;

fn frame(v: u8) -> FrameRGBA {
    FrameRGBA {
        width: 2,
        height: 2,
        data: vec![v, v, v, 255].repeat(4),
        premultiplied: true,
    }
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("scribble_sink_{}_{name}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn in_memory_sink_captures_config_and_frames() {
    let mut sink = InMemorySink::new();
    let cfg = SinkConfig {
        width: 2,
        height: 2,
        fps: Fps { num: 30, den: 1 },
    };
    sink.begin(cfg.clone()).unwrap();
    sink.push_frame(FrameIndex(0), &frame(1)).unwrap();
    sink.push_frame(FrameIndex(1), &frame(2)).unwrap();
    sink.end().unwrap();

    assert_eq!(sink.config(), Some(&cfg));
    assert_eq!(sink.frames().len(), 2);
    assert_eq!(sink.frames()[1].0, FrameIndex(1));
    assert!(sink.is_ended());
}

#[test]
fn png_sequence_writes_numbered_files() {
    let dir = scratch_dir("numbered");
    let mut sink = PngSequenceSink::new(&dir);
    sink.begin(SinkConfig {
        width: 2,
        height: 2,
        fps: Fps { num: 10, den: 1 },
    })
    .unwrap();
    sink.push_frame(FrameIndex(0), &frame(10)).unwrap();
    sink.push_frame(FrameIndex(3), &frame(20)).unwrap();
    sink.end().unwrap();

    assert_eq!(
        sink.written(),
        &[dir.join("frame_00000.png"), dir.join("frame_00003.png")]
    );
    let img = image::open(dir.join("frame_00003.png")).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (2, 2));
    assert_eq!(img.get_pixel(1, 1).0, [20, 20, 20, 255]);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn png_sequence_rejects_out_of_order_frames() {
    let dir = scratch_dir("order");
    let mut sink = PngSequenceSink::new(&dir);
    sink.begin(SinkConfig {
        width: 2,
        height: 2,
        fps: Fps { num: 10, den: 1 },
    })
    .unwrap();
    sink.push_frame(FrameIndex(2), &frame(1)).unwrap();
    assert!(sink.push_frame(FrameIndex(2), &frame(1)).is_err());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn write_png_rejects_mismatched_buffers() {
    let bad = FrameRGBA {
        width: 3,
        height: 3,
        data: vec![0; 4],
        premultiplied: false,
    };
    let err = write_png(Path::new("unused.png"), &bad).unwrap_err();
    assert!(err.to_string().starts_with("render error:"));
}
