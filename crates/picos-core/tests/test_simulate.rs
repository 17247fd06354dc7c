use std::time::Duration;

use picos_core::error::PicosError;
use picos_core::source::{FrameSource, SimulatedSource};

const TIMEOUT: Duration = Duration::from_millis(3000);

#[test]
fn test_repeated_runs_are_identical() {
    let mut a = SimulatedSource::new(16, 12);
    let mut b = SimulatedSource::new(16, 12);
    a.open().unwrap();
    b.open().unwrap();

    for _ in 0..5 {
        let fa = a.next_frame(TIMEOUT).unwrap();
        let fb = b.next_frame(TIMEOUT).unwrap();
        assert_eq!(fa.data, fb.data);
    }
}

#[test]
fn test_frames_have_the_requested_shape() {
    let mut source = SimulatedSource::new(16, 12);
    source.open().unwrap();
    let frame = source.next_frame(TIMEOUT).unwrap();
    assert_eq!(frame.data.dim(), (12, 16, 3));
}

#[test]
fn test_scene_is_a_centered_spot() {
    let mut source = SimulatedSource::new(17, 13);
    source.open().unwrap();
    let frame = source.next_frame(TIMEOUT).unwrap();
    // brightest at the center, falling off toward the corners
    assert!(frame.data[[6, 8, 0]] > frame.data[[0, 0, 0]]);
    assert!(frame.data[[6, 8, 0]] > frame.data[[12, 16, 0]]);
}

#[test]
fn test_double_open_is_device_busy() {
    let mut source = SimulatedSource::new(8, 8);
    source.open().unwrap();
    assert!(matches!(source.open().unwrap_err(), PicosError::DeviceBusy(_)));
}

#[test]
fn test_frame_before_open_is_device_not_found() {
    let mut source = SimulatedSource::new(8, 8);
    assert!(matches!(
        source.next_frame(TIMEOUT).unwrap_err(),
        PicosError::DeviceNotFound(_)
    ));
}

#[test]
fn test_reopen_restarts_the_sequence() {
    let mut source = SimulatedSource::new(8, 8);
    source.open().unwrap();
    let first = source.next_frame(TIMEOUT).unwrap();
    source.next_frame(TIMEOUT).unwrap();
    source.next_frame(TIMEOUT).unwrap();

    source.close().unwrap();
    source.open().unwrap();
    let restarted = source.next_frame(TIMEOUT).unwrap();
    assert_eq!(first.data, restarted.data);
}
