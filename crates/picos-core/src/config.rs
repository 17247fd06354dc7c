use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_FRAME_TIMEOUT_MS;
use crate::error::{PicosError, Result};

/// Immutable configuration for one capture or preview session.
///
/// Built once before a session starts; the engine never mutates it
/// mid-capture, so a running average can never observe a settings change.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Number of frames averaged into one result. In preview mode this is
    /// the length of the cyclic averaging window.
    pub frame_count: usize,

    /// Output stem; `.dat`, `.png` and `.txt` are appended.
    pub output: PathBuf,

    /// Border width removed from every frame edge when `trim_enabled`.
    #[serde(default)]
    pub trim: usize,

    #[serde(default)]
    pub trim_enabled: bool,

    /// Known unreliable sensor coordinates, as (row, col) in trimmed space.
    #[serde(default)]
    pub bad_pixels: Vec<(usize, usize)>,

    #[serde(default)]
    pub bad_pixel_correction_enabled: bool,

    /// Write the 8-bit display PNG next to the numeric matrix.
    #[serde(default = "default_true")]
    pub write_display_image: bool,

    /// Stretch the display image so the observed minimum maps to 0 and the
    /// maximum to 255, instead of the dimmer direct rendering.
    #[serde(default)]
    pub scale_to_full_range: bool,

    /// Zero out 16-bit output values at or below this level. 0 disables.
    #[serde(default)]
    pub threshold: u16,

    /// Bound on a single frame-ready wait. Exceeding it fails the session.
    #[serde(default = "default_frame_timeout_ms")]
    pub frame_timeout_ms: u64,
}

fn default_true() -> bool {
    true
}

fn default_frame_timeout_ms() -> u64 {
    DEFAULT_FRAME_TIMEOUT_MS
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            frame_count: 100,
            output: PathBuf::from("output"),
            trim: 0,
            trim_enabled: false,
            bad_pixels: Vec::new(),
            bad_pixel_correction_enabled: false,
            write_display_image: true,
            scale_to_full_range: false,
            threshold: 0,
            frame_timeout_ms: DEFAULT_FRAME_TIMEOUT_MS,
        }
    }
}

impl CaptureConfig {
    /// Reject configurations that can never produce a valid session.
    /// Frame-size dependent checks (trim vs. dimensions, bad-pixel bounds)
    /// happen on the first corrected frame.
    pub fn validate(&self) -> Result<()> {
        if self.frame_count == 0 {
            return Err(PicosError::InvalidConfiguration(
                "frame count must be at least 1".into(),
            ));
        }
        if self.frame_timeout_ms == 0 {
            return Err(PicosError::InvalidConfiguration(
                "frame timeout must be non-zero".into(),
            ));
        }
        Ok(())
    }
}
