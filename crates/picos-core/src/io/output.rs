use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use image::{ImageFormat, Rgb, RgbImage};
use ndarray::{Array2, Array3};
use tracing::{info, warn};

use crate::config::CaptureConfig;
use crate::consts::OUTPUT_MAX;
use crate::error::Result;
use crate::frame::CaptureResult;

/// Files produced for one completed capture.
#[derive(Clone, Debug)]
pub struct OutputPaths {
    pub data: PathBuf,
    pub display: Option<PathBuf>,
    pub metadata: PathBuf,
}

/// Persist a completed capture: the 16-bit numeric matrix, an optional
/// 8-bit display PNG, and a plain-text metadata sidecar.
///
/// The numeric matrix is the priority artifact: its failures escalate,
/// while a sidecar failure is logged and swallowed.
pub fn write_outputs(result: &CaptureResult, config: &CaptureConfig) -> Result<OutputPaths> {
    let scale_factor = compute_scale_factor(&result.mean_image);
    let matrix = quantize(&result.mean_image, scale_factor, config.threshold);

    let data_path = config.output.with_extension("dat");
    write_matrix(&matrix, &data_path)?;

    let display_path = match (config.write_display_image, &result.display_image) {
        (true, Some(display)) => {
            let path = config.output.with_extension("png");
            write_display_png(display, &path)?;
            Some(path)
        }
        _ => None,
    };

    let metadata_path = config.output.with_extension("txt");
    if let Err(err) = write_sidecar(&metadata_path, result, config, scale_factor) {
        warn!(
            path = %metadata_path.display(),
            %err,
            "metadata sidecar write failed"
        );
    }

    info!(
        output = %config.output.display(),
        frames = result.frame_count,
        scale_factor,
        "capture output saved"
    );
    Ok(OutputPaths {
        data: data_path,
        display: display_path,
        metadata: metadata_path,
    })
}

/// `max(1, mean.max() / 65535)`: guards against clipping while preserving
/// full precision when the dynamic range already fits in 16 bits.
pub fn compute_scale_factor(mean: &Array2<f64>) -> f64 {
    let max = mean.iter().copied().fold(0.0_f64, f64::max);
    (max / OUTPUT_MAX).max(1.0)
}

fn quantize(mean: &Array2<f64>, scale_factor: f64, threshold: u16) -> Array2<u16> {
    mean.mapv(|v| {
        let q = (v / scale_factor).round().clamp(0.0, OUTPUT_MAX) as u16;
        if q <= threshold {
            0
        } else {
            q
        }
    })
}

/// Comma-separated integer matrix, one line per image row.
fn write_matrix(matrix: &Array2<u16>, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut w = BufWriter::new(file);
    for row in matrix.rows() {
        let mut first = true;
        for v in row {
            if !first {
                write!(w, ",")?;
            }
            write!(w, "{v}")?;
            first = false;
        }
        writeln!(w)?;
    }
    w.flush()?;
    Ok(())
}

fn write_display_png(display: &Array3<u8>, path: &Path) -> Result<()> {
    let (h, w, _) = display.dim();
    let mut img = RgbImage::new(w as u32, h as u32);
    for row in 0..h {
        for col in 0..w {
            img.put_pixel(
                col as u32,
                row as u32,
                Rgb([
                    display[[row, col, 0]],
                    display[[row, col, 1]],
                    display[[row, col, 2]],
                ]),
            );
        }
    }
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

fn write_sidecar(
    path: &Path,
    result: &CaptureResult,
    config: &CaptureConfig,
    scale_factor: f64,
) -> Result<()> {
    let file = File::create(path)?;
    let mut w = BufWriter::new(file);
    writeln!(w, "frames = {}", result.frame_count)?;
    writeln!(w, "date = {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(w, "timeTaken = {:.2}", result.elapsed_seconds)?;
    writeln!(w, "width = {}", result.width)?;
    writeln!(w, "height = {}", result.height)?;
    writeln!(w, "scaleFactor = {}", scale_factor)?;
    writeln!(w, "trim = {}", if config.trim_enabled { config.trim } else { 0 })?;
    w.flush()?;
    Ok(())
}
