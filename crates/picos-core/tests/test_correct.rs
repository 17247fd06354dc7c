#[allow(dead_code)]
mod common;

use picos_core::config::CaptureConfig;
use picos_core::correct::correct;
use picos_core::error::PicosError;

use common::uniform_frame;

fn trim_config(trim: usize) -> CaptureConfig {
    CaptureConfig {
        trim,
        trim_enabled: true,
        ..CaptureConfig::default()
    }
}

#[test]
fn test_trim_shrinks_every_edge() {
    let frame = uniform_frame(100, 100, 50);
    let corrected = correct(&frame, &trim_config(5)).unwrap();
    assert_eq!(corrected.data.dim(), (90, 90, 3));
}

#[test]
fn test_trim_consuming_whole_frame_rejected() {
    let frame = uniform_frame(100, 100, 50);
    let err = correct(&frame, &trim_config(50)).unwrap_err();
    assert!(matches!(err, PicosError::InvalidConfiguration(_)));
}

#[test]
fn test_trim_disabled_passes_through() {
    let frame = uniform_frame(10, 12, 30);
    let config = CaptureConfig {
        trim: 4,
        trim_enabled: false,
        ..CaptureConfig::default()
    };
    let corrected = correct(&frame, &config).unwrap();
    assert_eq!(corrected.data.dim(), (10, 12, 3));
}

#[test]
fn test_bad_pixel_takes_upper_neighbor() {
    let mut frame = uniform_frame(20, 20, 0);
    for ch in 0..3 {
        frame.data[[10, 10, ch]] = 255;
        frame.data[[9, 10, ch]] = 0;
    }
    let config = CaptureConfig {
        bad_pixels: vec![(10, 10)],
        bad_pixel_correction_enabled: true,
        ..CaptureConfig::default()
    };
    let corrected = correct(&frame, &config).unwrap();
    assert_eq!(corrected.data[[10, 10, 0]], 0);
    assert_eq!(corrected.data[[10, 10, 1]], 0);
    assert_eq!(corrected.data[[10, 10, 2]], 0);
    // source frame untouched
    assert_eq!(frame.data[[10, 10, 0]], 255);
}

#[test]
fn test_bad_pixel_in_first_row_is_a_no_op() {
    let mut frame = uniform_frame(8, 8, 10);
    frame.data[[0, 3, 0]] = 200;
    let config = CaptureConfig {
        bad_pixels: vec![(0, 3)],
        bad_pixel_correction_enabled: true,
        ..CaptureConfig::default()
    };
    let corrected = correct(&frame, &config).unwrap();
    // row 0 clamps to itself: the value survives
    assert_eq!(corrected.data[[0, 3, 0]], 200);
}

#[test]
fn test_bad_pixel_outside_trimmed_frame_rejected() {
    let frame = uniform_frame(20, 20, 10);
    let config = CaptureConfig {
        trim: 5,
        trim_enabled: true,
        bad_pixels: vec![(12, 12)],
        bad_pixel_correction_enabled: true,
        ..CaptureConfig::default()
    };
    // 20 - 2*5 leaves a 10x10 frame; (12, 12) no longer exists
    let err = correct(&frame, &config).unwrap_err();
    assert!(matches!(err, PicosError::InvalidConfiguration(_)));
}

#[test]
fn test_bad_pixel_coordinates_are_in_trimmed_space() {
    let mut frame = uniform_frame(20, 20, 10);
    // after a 5 px trim, trimmed (2, 2) is raw (7, 7)
    for ch in 0..3 {
        frame.data[[7, 7, ch]] = 255;
        frame.data[[6, 7, ch]] = 40;
    }
    let config = CaptureConfig {
        trim: 5,
        trim_enabled: true,
        bad_pixels: vec![(2, 2)],
        bad_pixel_correction_enabled: true,
        ..CaptureConfig::default()
    };
    let corrected = correct(&frame, &config).unwrap();
    assert_eq!(corrected.data[[2, 2, 0]], 40);
}
