use ndarray::{Array2, Array3};

use crate::consts::DISPLAY_MAX;
use crate::error::{PicosError, Result};
use crate::frame::RawFrame;

/// Running elementwise sum of corrected frames.
///
/// Sums are widened to `u64` so tens of thousands of 8-bit frames cannot
/// overflow. The total is sized lazily from the first frame after a reset.
#[derive(Debug, Default)]
pub struct Accumulator {
    total: Option<Array3<u64>>,
    count: usize,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames summed since the last reset.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Drop the running sum and start a new accumulation window.
    pub fn reset(&mut self) {
        self.total = None;
        self.count = 0;
    }

    /// Add one corrected frame to the running sum.
    pub fn add(&mut self, frame: &RawFrame) -> Result<()> {
        let dims = frame.data.dim();
        match self.total {
            None => {
                self.total = Some(frame.data.mapv(u64::from));
            }
            Some(ref mut total) => {
                let have = total.dim();
                if have != dims {
                    return Err(PicosError::DimensionMismatch {
                        expected: (have.0, have.1),
                        actual: (dims.0, dims.1),
                    });
                }
                total.zip_mut_with(&frame.data, |t, &v| *t += u64::from(v));
            }
        }
        self.count += 1;
        Ok(())
    }

    /// Per-pixel, per-channel mean of the current window.
    pub fn current_mean(&self) -> Result<Array3<f64>> {
        if self.count == 0 {
            return Err(PicosError::EmptyAccumulator);
        }
        let total = self.total.as_ref().ok_or(PicosError::EmptyAccumulator)?;
        let n = self.count as f64;
        Ok(total.mapv(|v| v as f64 / n))
    }

    /// Mean across frames, then across the three color channels — the
    /// quantity persisted by the output writer.
    pub fn channel_mean(&self) -> Result<Array2<f64>> {
        let mean = self.current_mean()?;
        let (h, w, channels) = mean.dim();
        let mut out = Array2::<f64>::zeros((h, w));
        for row in 0..h {
            for col in 0..w {
                let mut acc = 0.0;
                for ch in 0..channels {
                    acc += mean[[row, col, ch]];
                }
                out[[row, col]] = acc / channels as f64;
            }
        }
        Ok(out)
    }

    /// Render the current window as an 8-bit image for live feedback.
    ///
    /// Scaling policy, in order:
    /// 1. full-range stretch: observed minimum maps to 0, maximum to 255;
    ///    a flat image (max == min) renders all-zero rather than dividing
    ///    by zero;
    /// 2. means above the 8-bit range are scaled by `255 / max`;
    /// 3. otherwise values are cast directly.
    pub fn display_image(&self, scale_to_full_range: bool) -> Result<Array3<u8>> {
        let mean = self.current_mean()?;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in mean.iter() {
            min = min.min(v);
            max = max.max(v);
        }

        let image = if scale_to_full_range {
            if max > min {
                let scale = DISPLAY_MAX / (max - min);
                mean.mapv(|v| ((v - min) * scale).round().clamp(0.0, DISPLAY_MAX) as u8)
            } else {
                Array3::<u8>::zeros(mean.dim())
            }
        } else if max > DISPLAY_MAX {
            let scale = DISPLAY_MAX / max;
            mean.mapv(|v| (v * scale).round().clamp(0.0, DISPLAY_MAX) as u8)
        } else {
            mean.mapv(|v| v.round().clamp(0.0, DISPLAY_MAX) as u8)
        };
        Ok(image)
    }
}
