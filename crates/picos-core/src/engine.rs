use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use ndarray::Array3;
use tracing::{info, warn};

use crate::accum::Accumulator;
use crate::config::CaptureConfig;
use crate::correct::correct;
use crate::error::Result;
use crate::frame::CaptureResult;
use crate::io::output::{write_outputs, OutputPaths};
use crate::source::FrameSource;

/// Session phase, reported to the monitor as the engine advances.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CapturePhase {
    Initializing,
    Capturing,
    Finalizing,
}

impl std::fmt::Display for CapturePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initializing => write!(f, "Opening frame source"),
            Self::Capturing => write!(f, "Capturing frames"),
            Self::Finalizing => write!(f, "Releasing frame source"),
        }
    }
}

/// Cooperative cancellation signal shared between a session and its caller.
///
/// Cancellation observed between frames is honored before the next frame is
/// requested; a frame already in flight completes or times out first.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Thread-safe session feedback.
///
/// All methods default to no-ops; `display` is only invoked when
/// `wants_display` returns true, so headless runs skip the render cost.
pub trait CaptureMonitor: Send + Sync {
    /// The engine moved to a new phase.
    fn phase_changed(&self, _phase: CapturePhase) {}

    /// One frame has been corrected and accumulated. `total` is the target
    /// frame count, or `None` for the unbounded preview loop.
    fn frame_accumulated(&self, _done: usize, _total: Option<usize>) {}

    fn wants_display(&self) -> bool {
        false
    }

    /// A fresh 8-bit rendering of the current accumulation window.
    fn display(&self, _image: &Array3<u8>, _frames_in_window: usize) {}
}

/// No-op monitor for headless sessions.
pub struct NoOpMonitor;
impl CaptureMonitor for NoOpMonitor {}

/// How a capture session ended. Failures are `Err` instead.
#[derive(Debug)]
pub enum CaptureOutcome {
    /// Full frame count reached; outputs were persisted exactly once.
    Completed {
        result: CaptureResult,
        outputs: OutputPaths,
    },
    /// Cancelled before the full count; partial results are discarded.
    Aborted { frames_accumulated: usize },
}

/// Run one capture session to completion, abort, or failure.
///
/// The frame source is owned for the whole session and released on every
/// exit path after a successful open, including errors raised mid-loop.
pub fn run_capture<S: FrameSource>(
    mut source: S,
    config: &CaptureConfig,
    cancel: &CancelToken,
    monitor: &Arc<dyn CaptureMonitor>,
) -> Result<CaptureOutcome> {
    config.validate()?;

    monitor.phase_changed(CapturePhase::Initializing);
    source.open()?;
    info!(
        frames = config.frame_count,
        output = %config.output.display(),
        "capture session started"
    );

    let looped = capture_loop(&mut source, config, cancel, monitor);

    monitor.phase_changed(CapturePhase::Finalizing);
    if let Err(err) = source.close() {
        warn!(%err, "frame source did not close cleanly");
    }

    match looped? {
        LoopExit::Finished {
            accum,
            elapsed_seconds,
        } => {
            let result = finalize(&accum, config, elapsed_seconds)?;
            let outputs = write_outputs(&result, config)?;
            info!(elapsed_seconds, "capture finished");
            Ok(CaptureOutcome::Completed { result, outputs })
        }
        LoopExit::Cancelled { frames_accumulated } => {
            info!(frames_accumulated, "capture aborted; nothing persisted");
            Ok(CaptureOutcome::Aborted { frames_accumulated })
        }
    }
}

enum LoopExit {
    Finished {
        accum: Accumulator,
        elapsed_seconds: f64,
    },
    Cancelled {
        frames_accumulated: usize,
    },
}

fn capture_loop<S: FrameSource>(
    source: &mut S,
    config: &CaptureConfig,
    cancel: &CancelToken,
    monitor: &Arc<dyn CaptureMonitor>,
) -> Result<LoopExit> {
    monitor.phase_changed(CapturePhase::Capturing);
    let timeout = Duration::from_millis(config.frame_timeout_ms);
    let started = Instant::now();
    let mut accum = Accumulator::new();

    while accum.count() < config.frame_count {
        if cancel.is_cancelled() {
            return Ok(LoopExit::Cancelled {
                frames_accumulated: accum.count(),
            });
        }
        let raw = source.next_frame(timeout)?;
        let corrected = correct(&raw, config)?;
        accum.add(&corrected)?;
        monitor.frame_accumulated(accum.count(), Some(config.frame_count));
        if monitor.wants_display() {
            let image = accum.display_image(config.scale_to_full_range)?;
            monitor.display(&image, accum.count());
        }
    }

    Ok(LoopExit::Finished {
        accum,
        elapsed_seconds: started.elapsed().as_secs_f64(),
    })
}

fn finalize(
    accum: &Accumulator,
    config: &CaptureConfig,
    elapsed_seconds: f64,
) -> Result<CaptureResult> {
    let mean_image = accum.channel_mean()?;
    let (height, width) = mean_image.dim();
    let display_image = if config.write_display_image {
        Some(accum.display_image(config.scale_to_full_range)?)
    } else {
        None
    };
    Ok(CaptureResult {
        mean_image,
        frame_count: accum.count(),
        elapsed_seconds,
        width,
        height,
        display_image,
    })
}
