use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use picos_core::config::CaptureConfig;
use picos_core::engine::{run_capture, CancelToken, CaptureMonitor, CaptureOutcome};
use picos_core::source::{ReplaySource, SimulatedSource};
use tracing::debug;

use crate::summary::print_capture_summary;

use super::parse_sensor;

#[derive(Args)]
pub struct CaptureArgs {
    /// Recorded raw sequence file (omit with --simulate)
    pub file: Option<PathBuf>,

    /// Use the synthetic camera instead of a recording
    #[arg(long)]
    pub simulate: bool,

    /// Simulated sensor size as WIDTHxHEIGHT
    #[arg(long, default_value = "640x480")]
    pub sensor: String,

    /// Number of frames to average
    #[arg(short = 'n', long, default_value = "100")]
    pub frames: usize,

    /// Output stem (.dat/.png/.txt are appended)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Trim this many pixels from every frame edge
    #[arg(long)]
    pub trim: Option<usize>,

    /// Bad pixel to in-paint, as ROW,COL (repeatable)
    #[arg(long = "bad-pixel", value_parser = parse_coordinate)]
    pub bad_pixels: Vec<(usize, usize)>,

    /// Stretch the display image to the full 8-bit range
    #[arg(long)]
    pub full_range: bool,

    /// Skip the 8-bit display PNG
    #[arg(long)]
    pub no_display_image: bool,

    /// Zero output pixels at or below this 16-bit value
    #[arg(long, default_value = "0")]
    pub threshold: u16,

    /// Load a TOML capture configuration instead of the flags above
    #[arg(long)]
    pub config: Option<PathBuf>,
}

fn parse_coordinate(s: &str) -> std::result::Result<(usize, usize), String> {
    let (row, col) = s
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL, got '{s}'"))?;
    let row = row.trim().parse().map_err(|_| format!("bad row in '{s}'"))?;
    let col = col.trim().parse().map_err(|_| format!("bad column in '{s}'"))?;
    Ok((row, col))
}

struct ProgressMonitor {
    bar: ProgressBar,
}

impl CaptureMonitor for ProgressMonitor {
    fn frame_accumulated(&self, done: usize, _total: Option<usize>) {
        self.bar.set_position(done as u64);
    }
}

pub fn run(args: &CaptureArgs) -> Result<()> {
    let config = build_config(args)?;
    print_capture_summary(&config, &source_name(args));

    let bar = ProgressBar::new(config.frame_count as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("Averaging [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    let monitor: Arc<dyn CaptureMonitor> = Arc::new(ProgressMonitor { bar: bar.clone() });
    let cancel = CancelToken::new();

    let outcome = if args.simulate {
        let (width, height) = parse_sensor(&args.sensor)?;
        run_capture(SimulatedSource::new(width, height), &config, &cancel, &monitor)?
    } else {
        let file = args
            .file
            .clone()
            .context("a recording file is required unless --simulate is given")?;
        run_capture(ReplaySource::new(file), &config, &cancel, &monitor)?
    };
    bar.finish();

    match outcome {
        CaptureOutcome::Completed { result, outputs } => {
            println!(
                "Captured {} frames in {:.2}s",
                result.frame_count, result.elapsed_seconds
            );
            println!("Saved to {}", outputs.data.display());
            Ok(())
        }
        CaptureOutcome::Aborted { frames_accumulated } => {
            bail!("capture aborted after {frames_accumulated} frames; nothing written");
        }
    }
}

fn build_config(args: &CaptureArgs) -> Result<CaptureConfig> {
    if let Some(ref path) = args.config {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        debug!(path = %path.display(), "loaded capture configuration");
        return Ok(toml::from_str(&text)?);
    }

    let mut config = CaptureConfig {
        frame_count: args.frames,
        ..CaptureConfig::default()
    };
    config.output = match args.output {
        Some(ref path) => path.clone(),
        None => default_output_stem(args.frames),
    };
    if let Some(trim) = args.trim {
        config.trim = trim;
        config.trim_enabled = trim > 0;
    }
    if !args.bad_pixels.is_empty() {
        config.bad_pixels = args.bad_pixels.clone();
        config.bad_pixel_correction_enabled = true;
    }
    config.scale_to_full_range = args.full_range;
    config.write_display_image = !args.no_display_image;
    config.threshold = args.threshold;
    Ok(config)
}

fn default_output_stem(frames: usize) -> PathBuf {
    PathBuf::from(format!(
        "output_{}_{}",
        chrono::Local::now().format("%Y%m%d_%H%M%S"),
        frames
    ))
}

fn source_name(args: &CaptureArgs) -> String {
    if args.simulate {
        format!("simulated sensor ({})", args.sensor)
    } else {
        args.file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    }
}
