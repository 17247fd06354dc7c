use ndarray::{Array2, Array3};
use std::path::PathBuf;

/// A single raw camera frame.
///
/// Pixel data is 8-bit, shape = (height, width, channel) with three color
/// channels. Frames delivered by a [`crate::source::FrameSource`] are
/// already rotated 180 degrees from the sensor-native orientation (the
/// intensifier optics invert the scene).
#[derive(Clone, Debug)]
pub struct RawFrame {
    pub data: Array3<u8>,
}

impl RawFrame {
    pub fn new(data: Array3<u8>) -> Self {
        Self { data }
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }
}

/// Finalized result of one completed capture session. Never mutated after
/// creation; the output writer only borrows it.
#[derive(Clone, Debug)]
pub struct CaptureResult {
    /// Per-pixel mean across all frames and the three color channels.
    pub mean_image: Array2<f64>,
    pub frame_count: usize,
    pub elapsed_seconds: f64,
    pub width: usize,
    pub height: usize,
    /// 8-bit rendering captured at completion, when the configuration asked
    /// for a display image.
    pub display_image: Option<Array3<u8>>,
}

/// Metadata about a recorded frame sequence.
#[derive(Clone, Debug)]
pub struct SequenceInfo {
    pub filename: PathBuf,
    pub total_frames: usize,
    pub width: u32,
    pub height: u32,
    /// Recording start, microseconds since the Unix epoch. 0 when unknown.
    pub recorded_at_us: u64,
}
