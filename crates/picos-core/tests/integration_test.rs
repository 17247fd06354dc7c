#[allow(dead_code)]
mod common;

use std::sync::Arc;

use picos_core::config::CaptureConfig;
use picos_core::engine::{run_capture, CancelToken, CaptureMonitor, CaptureOutcome, NoOpMonitor};
use picos_core::io::rawseq_writer::RawSeqWriter;
use picos_core::source::ReplaySource;
use tempfile::TempDir;

use common::build_header;

/// Build a recording of a dim scene with one hot bad pixel and bright
/// sensor edges, the artifacts the corrector exists for.
fn build_recording(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("scene.praw");
    let (w, h) = (32u32, 24u32);
    let header = build_header(w, h, 5);
    let mut writer = RawSeqWriter::create(&path, &header).unwrap();

    for frame_idx in 0..5u8 {
        let mut raw = vec![0u8; (w * h * 3) as usize];
        for row in 0..h as usize {
            for col in 0..w as usize {
                let on_border = row < 2 || col < 2 || row >= h as usize - 2 || col >= w as usize - 2;
                let value = if on_border { 255 } else { 40 + frame_idx };
                let idx = (row * w as usize + col) * 3;
                raw[idx] = value;
                raw[idx + 1] = value;
                raw[idx + 2] = value;
            }
        }
        // hot pixel; stored sensor-native, decode flips both axes
        let hot_row = h as usize - 1 - 10;
        let hot_col = w as usize - 1 - 10;
        let idx = (hot_row * w as usize + hot_col) * 3;
        raw[idx] = 255;
        raw[idx + 1] = 255;
        raw[idx + 2] = 255;
        writer.write_raw_frame(&raw).unwrap();
    }
    writer.finalize().unwrap();
    path
}

#[test]
fn test_capture_from_recording_end_to_end() {
    let dir = TempDir::new().unwrap();
    let recording = build_recording(&dir);

    let config = CaptureConfig {
        // longer than the recording: replay wraps around
        frame_count: 12,
        output: dir.path().join("decay_0ps"),
        trim: 2,
        trim_enabled: true,
        // decoded (10, 10) minus the 2 px trim
        bad_pixels: vec![(8, 8)],
        bad_pixel_correction_enabled: true,
        ..CaptureConfig::default()
    };

    let monitor: Arc<dyn CaptureMonitor> = Arc::new(NoOpMonitor);
    let outcome = run_capture(
        ReplaySource::new(&recording),
        &config,
        &CancelToken::new(),
        &monitor,
    )
    .unwrap();

    let (result, outputs) = match outcome {
        CaptureOutcome::Completed { result, outputs } => (result, outputs),
        other => panic!("expected Completed, got {other:?}"),
    };

    // 32x24 minus 2 px per edge
    assert_eq!((result.width, result.height), (28, 20));
    assert_eq!(result.frame_count, 12);

    // bright border trimmed away and the hot pixel in-painted: every mean
    // value sits in the dim 40..45 band
    assert!(result.mean_image.iter().all(|&v| v >= 40.0 && v < 45.0));

    let matrix = std::fs::read_to_string(&outputs.data).unwrap();
    assert_eq!(matrix.lines().count(), 20);
    assert_eq!(matrix.lines().next().unwrap().split(',').count(), 28);

    let sidecar = std::fs::read_to_string(&outputs.metadata).unwrap();
    assert!(sidecar.contains("frames = 12"));
    assert!(sidecar.contains("width = 28"));
    assert!(sidecar.contains("height = 20"));
    assert!(sidecar.contains("trim = 2"));
    assert!(outputs.display.as_ref().is_some_and(|p| p.exists()));
}
