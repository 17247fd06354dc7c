use ndarray::s;

use crate::config::CaptureConfig;
use crate::error::{PicosError, Result};
use crate::frame::RawFrame;

/// Apply the configured trim border and bad-pixel in-painting to a raw
/// frame.
///
/// The input frame is never mutated; preview resets may feed the same frame
/// again.
pub fn correct(frame: &RawFrame, config: &CaptureConfig) -> Result<RawFrame> {
    let trimmed = if config.trim_enabled && config.trim > 0 {
        trim_border(frame, config.trim)?
    } else {
        frame.clone()
    };

    if !config.bad_pixel_correction_enabled || config.bad_pixels.is_empty() {
        return Ok(trimmed);
    }
    inpaint_bad_pixels(trimmed, &config.bad_pixels)
}

/// Remove `trim` pixels from every edge to exclude sensor edge artifacts.
fn trim_border(frame: &RawFrame, trim: usize) -> Result<RawFrame> {
    let (h, w, _) = frame.data.dim();
    if 2 * trim >= h || 2 * trim >= w {
        return Err(PicosError::InvalidConfiguration(format!(
            "trim of {trim} px leaves no pixels in a {w}x{h} frame"
        )));
    }
    let view = frame.data.slice(s![trim..h - trim, trim..w - trim, ..]);
    Ok(RawFrame::new(view.to_owned()))
}

/// Replace each listed pixel with its row neighbor at `(row - 1, col)`.
///
/// Row 0 has no upper neighbor; the lookup clamps to row 0 there, making
/// the correction a no-op for first-row coordinates. Coordinates outside
/// the corrected frame are a configuration error, not skipped.
fn inpaint_bad_pixels(
    mut frame: RawFrame,
    bad_pixels: &[(usize, usize)],
) -> Result<RawFrame> {
    let (h, w, channels) = frame.data.dim();
    for &(row, col) in bad_pixels {
        if row >= h || col >= w {
            return Err(PicosError::InvalidConfiguration(format!(
                "bad pixel ({row}, {col}) lies outside the {w}x{h} corrected frame"
            )));
        }
        let src_row = row.saturating_sub(1);
        for ch in 0..channels {
            frame.data[[row, col, ch]] = frame.data[[src_row, col, ch]];
        }
    }
    Ok(frame)
}
