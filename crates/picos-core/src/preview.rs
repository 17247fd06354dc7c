use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::accum::Accumulator;
use crate::config::CaptureConfig;
use crate::correct::correct;
use crate::engine::{CancelToken, CaptureMonitor, CapturePhase};
use crate::error::Result;
use crate::source::FrameSource;

/// Unbounded live-averaging loop.
///
/// Every `frame_count` frames the accumulator restarts, so the display
/// tracks changing scene conditions instead of converging to a stale
/// long-run average. A window length of 1 degenerates to showing each
/// corrected frame. Runs until the token is cancelled; never persists.
pub fn run_preview<S: FrameSource>(
    mut source: S,
    config: &CaptureConfig,
    cancel: &CancelToken,
    monitor: &Arc<dyn CaptureMonitor>,
) -> Result<()> {
    config.validate()?;

    monitor.phase_changed(CapturePhase::Initializing);
    source.open()?;
    info!(window = config.frame_count, "preview session started");

    let looped = preview_loop(&mut source, config, cancel, monitor);

    monitor.phase_changed(CapturePhase::Finalizing);
    if let Err(err) = source.close() {
        warn!(%err, "frame source did not close cleanly");
    }
    looped
}

fn preview_loop<S: FrameSource>(
    source: &mut S,
    config: &CaptureConfig,
    cancel: &CancelToken,
    monitor: &Arc<dyn CaptureMonitor>,
) -> Result<()> {
    monitor.phase_changed(CapturePhase::Capturing);
    let timeout = Duration::from_millis(config.frame_timeout_ms);
    let mut accum = Accumulator::new();

    loop {
        if cancel.is_cancelled() {
            info!("preview stopped");
            return Ok(());
        }
        let raw = source.next_frame(timeout)?;
        let corrected = correct(&raw, config)?;
        accum.add(&corrected)?;
        monitor.frame_accumulated(accum.count(), None);
        if monitor.wants_display() {
            let image = accum.display_image(config.scale_to_full_range)?;
            monitor.display(&image, accum.count());
        }
        if accum.count() >= config.frame_count {
            accum.reset();
        }
    }
}
