use std::path::PathBuf;

use picos_core::config::CaptureConfig;
use picos_core::error::PicosError;

#[test]
fn test_defaults() {
    let config = CaptureConfig::default();
    assert_eq!(config.frame_count, 100);
    assert_eq!(config.frame_timeout_ms, 3000);
    assert!(config.write_display_image);
    assert!(!config.trim_enabled);
    assert!(!config.bad_pixel_correction_enabled);
    assert!(!config.scale_to_full_range);
    assert_eq!(config.threshold, 0);
    config.validate().unwrap();
}

#[test]
fn test_toml_round_trip() {
    let config = CaptureConfig {
        frame_count: 250,
        output: PathBuf::from("runs/decay_a"),
        trim: 6,
        trim_enabled: true,
        bad_pixels: vec![(3, 7), (120, 44)],
        bad_pixel_correction_enabled: true,
        write_display_image: false,
        scale_to_full_range: true,
        threshold: 12,
        frame_timeout_ms: 1500,
    };
    let text = toml::to_string(&config).unwrap();
    let back: CaptureConfig = toml::from_str(&text).unwrap();

    assert_eq!(back.frame_count, 250);
    assert_eq!(back.output, PathBuf::from("runs/decay_a"));
    assert_eq!(back.trim, 6);
    assert!(back.trim_enabled);
    assert_eq!(back.bad_pixels, vec![(3, 7), (120, 44)]);
    assert!(!back.write_display_image);
    assert_eq!(back.threshold, 12);
    assert_eq!(back.frame_timeout_ms, 1500);
}

#[test]
fn test_sparse_toml_fills_defaults() {
    let back: CaptureConfig = toml::from_str(
        r#"
frame_count = 50
output = "out/run1"
"#,
    )
    .unwrap();
    assert_eq!(back.frame_count, 50);
    assert_eq!(back.trim, 0);
    assert!(back.write_display_image);
    assert_eq!(back.frame_timeout_ms, 3000);
}

#[test]
fn test_validate_rejects_zero_frames() {
    let config = CaptureConfig {
        frame_count: 0,
        ..CaptureConfig::default()
    };
    assert!(matches!(
        config.validate().unwrap_err(),
        PicosError::InvalidConfiguration(_)
    ));
}

#[test]
fn test_validate_rejects_zero_timeout() {
    let config = CaptureConfig {
        frame_timeout_ms: 0,
        ..CaptureConfig::default()
    };
    assert!(matches!(
        config.validate().unwrap_err(),
        PicosError::InvalidConfiguration(_)
    ));
}
