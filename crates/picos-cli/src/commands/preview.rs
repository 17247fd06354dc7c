use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use ndarray::Array3;
use picos_core::config::CaptureConfig;
use picos_core::engine::{CancelToken, CaptureMonitor};
use picos_core::preview::run_preview;
use picos_core::source::{ReplaySource, SimulatedSource};

use super::parse_sensor;

#[derive(Args)]
pub struct PreviewArgs {
    /// Recorded raw sequence file (omit with --simulate)
    pub file: Option<PathBuf>,

    /// Use the synthetic camera instead of a recording
    #[arg(long)]
    pub simulate: bool,

    /// Simulated sensor size as WIDTHxHEIGHT
    #[arg(long, default_value = "640x480")]
    pub sensor: String,

    /// Frames per averaging window
    #[arg(short = 'n', long, default_value = "25")]
    pub window: usize,

    /// Stop after this many completed windows
    #[arg(long, default_value = "10")]
    pub windows: usize,

    /// Stretch the display to the full 8-bit range
    #[arg(long)]
    pub full_range: bool,
}

/// Prints per-window statistics and cancels the session once the requested
/// number of windows has completed.
struct WindowMonitor {
    window: usize,
    max_windows: usize,
    completed: AtomicUsize,
    cancel: CancelToken,
}

impl CaptureMonitor for WindowMonitor {
    fn wants_display(&self) -> bool {
        true
    }

    fn display(&self, image: &Array3<u8>, frames_in_window: usize) {
        if frames_in_window < self.window {
            return;
        }
        let sum: u64 = image.iter().map(|&v| u64::from(v)).sum();
        let mean = sum as f64 / image.len() as f64;
        let done = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
        println!("window {done}: mean display level {mean:.1}");
        if done >= self.max_windows {
            self.cancel.cancel();
        }
    }
}

pub fn run(args: &PreviewArgs) -> Result<()> {
    let config = CaptureConfig {
        frame_count: args.window,
        output: PathBuf::from("preview"),
        scale_to_full_range: args.full_range,
        write_display_image: false,
        ..CaptureConfig::default()
    };

    let cancel = CancelToken::new();
    let monitor: Arc<dyn CaptureMonitor> = Arc::new(WindowMonitor {
        window: args.window,
        max_windows: args.windows,
        completed: AtomicUsize::new(0),
        cancel: cancel.clone(),
    });

    println!(
        "Previewing with a {}-frame window ({} windows)...",
        args.window, args.windows
    );

    if args.simulate {
        let (width, height) = parse_sensor(&args.sensor)?;
        run_preview(SimulatedSource::new(width, height), &config, &cancel, &monitor)?;
    } else {
        let file = args
            .file
            .clone()
            .context("a recording file is required unless --simulate is given")?;
        run_preview(ReplaySource::new(file), &config, &cancel, &monitor)?;
    }

    Ok(())
}
