use std::time::Duration;

use ndarray::Array3;

use crate::consts::FRAME_CHANNELS;
use crate::error::{PicosError, Result};
use crate::frame::RawFrame;

use super::FrameSource;

/// Deterministic synthetic camera: a radial intensity spot with per-frame
/// shimmer, for demos and captures without hardware.
pub struct SimulatedSource {
    width: usize,
    height: usize,
    frame_index: usize,
    open: bool,
}

impl SimulatedSource {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            frame_index: 0,
            open: false,
        }
    }
}

impl FrameSource for SimulatedSource {
    fn open(&mut self) -> Result<()> {
        if self.open {
            return Err(PicosError::DeviceBusy(
                "simulated source is already open".into(),
            ));
        }
        self.open = true;
        self.frame_index = 0;
        Ok(())
    }

    fn next_frame(&mut self, _timeout: Duration) -> Result<RawFrame> {
        if !self.open {
            return Err(PicosError::DeviceNotFound(
                "simulated source is not open".into(),
            ));
        }
        let (h, w) = (self.height, self.width);
        let cy = (h as f64 - 1.0) / 2.0;
        let cx = (w as f64 - 1.0) / 2.0;
        let falloff = (h.min(w) as f64 / 2.0).max(1.0);
        // deterministic per-frame shimmer instead of an RNG, so repeated
        // runs produce identical pixel values
        let shimmer = ((self.frame_index as f64 * 0.7).sin() * 10.0).round();

        let mut data = Array3::<u8>::zeros((h, w, FRAME_CHANNELS));
        for row in 0..h {
            for col in 0..w {
                let dy = row as f64 - cy;
                let dx = col as f64 - cx;
                let r = (dy * dy + dx * dx).sqrt();
                let base = (220.0 * (-r / falloff).exp() + shimmer).clamp(0.0, 255.0);
                for ch in 0..FRAME_CHANNELS {
                    data[[row, col, ch]] = (base * (1.0 - 0.1 * ch as f64)) as u8;
                }
            }
        }
        self.frame_index += 1;
        Ok(RawFrame::new(data))
    }

    fn close(&mut self) -> Result<()> {
        self.open = false;
        Ok(())
    }
}
