//! Measurement sequencing: single shots and delay sweeps.
//!
//! Each measurement resolves to one capture session at one gate delay; the
//! script language that drives these lives in the controlling application.

use std::sync::Arc;

use tracing::info;

use crate::config::CaptureConfig;
use crate::engine::{run_capture, CancelToken, CaptureMonitor, CaptureOutcome};
use crate::error::{PicosError, Result};
use crate::instrument::GateControl;
use crate::source::FrameSource;

/// Gate settings applied once before each measurement.
#[derive(Clone, Copy, Debug)]
pub struct GateSettings {
    pub exposure_time_s: f64,
    pub mcp_gain_v: u32,
}

/// Take one averaged image at a single gate delay.
///
/// `make_source` supplies a fresh frame source per invocation; the output
/// stem of `config` is replaced by `name`.
#[allow(clippy::too_many_arguments)]
pub fn run_single<G, S, F>(
    gate: &mut G,
    settings: &GateSettings,
    delay_s: f64,
    name: &str,
    make_source: &mut F,
    config: &CaptureConfig,
    cancel: &CancelToken,
    monitor: &Arc<dyn CaptureMonitor>,
) -> Result<CaptureOutcome>
where
    G: GateControl + ?Sized,
    S: FrameSource,
    F: FnMut() -> S,
{
    gate.set_exposure_time(settings.exposure_time_s)?;
    gate.set_mcp_gain(settings.mcp_gain_v)?;
    gate.set_exposure_delay(delay_s)?;

    let mut config = config.clone();
    config.output = config.output.with_file_name(name);
    info!(delay_s, name, frames = config.frame_count, "single measurement");
    run_capture(make_source(), &config, cancel, monitor)
}

/// Inclusive sweep of gate delays, one capture per step.
#[derive(Clone, Copy, Debug)]
pub struct DelaySeries {
    pub start_ns: f64,
    pub stop_ns: f64,
    pub step_ns: f64,
}

impl DelaySeries {
    pub fn validate(&self) -> Result<()> {
        if !self.start_ns.is_finite() || !self.stop_ns.is_finite() || !self.step_ns.is_finite() {
            return Err(PicosError::InvalidConfiguration(
                "sweep delays must be finite".into(),
            ));
        }
        if self.stop_ns < self.start_ns {
            return Err(PicosError::InvalidConfiguration(
                "sweep stop delay precedes start delay".into(),
            ));
        }
        if self.step_ns <= 0.0 {
            return Err(PicosError::InvalidConfiguration(
                "sweep step must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Delay values in nanoseconds, inclusive of `stop_ns`. A small
    /// tolerance keeps the last step from being lost to float accumulation.
    pub fn delays_ns(&self) -> Vec<f64> {
        let tolerance = self.step_ns * 1e-6;
        let mut delays = Vec::new();
        let mut d = self.start_ns;
        while d <= self.stop_ns + tolerance {
            delays.push(d);
            d += self.step_ns;
        }
        delays
    }
}

/// How a delay sweep ended.
#[derive(Debug)]
pub enum SweepOutcome {
    Completed { captures: usize },
    /// Cancelled between or during sub-captures; `captures` counts the
    /// fully persisted measurements.
    Aborted { captures: usize },
}

/// Run a delay sweep: exposure time and gain are set once, then one capture
/// per delay, persisted under the stem `<delay_ps>ps`.
pub fn run_series<G, S, F>(
    gate: &mut G,
    settings: &GateSettings,
    series: &DelaySeries,
    make_source: &mut F,
    config: &CaptureConfig,
    cancel: &CancelToken,
    monitor: &Arc<dyn CaptureMonitor>,
) -> Result<SweepOutcome>
where
    G: GateControl + ?Sized,
    S: FrameSource,
    F: FnMut() -> S,
{
    series.validate()?;
    gate.set_exposure_time(settings.exposure_time_s)?;
    gate.set_mcp_gain(settings.mcp_gain_v)?;

    let delays = series.delays_ns();
    info!(
        steps = delays.len(),
        start_ns = series.start_ns,
        stop_ns = series.stop_ns,
        "delay sweep started"
    );

    let mut captures = 0usize;
    for delay_ns in delays {
        if cancel.is_cancelled() {
            info!(captures, "delay sweep aborted between measurements");
            return Ok(SweepOutcome::Aborted { captures });
        }
        gate.set_exposure_delay(delay_ns * 1e-9)?;

        let delay_ps = (delay_ns * 1000.0).round() as i64;
        let mut step_config = config.clone();
        step_config.output = config.output.with_file_name(format!("{delay_ps}ps"));

        match run_capture(make_source(), &step_config, cancel, monitor)? {
            CaptureOutcome::Completed { .. } => captures += 1,
            CaptureOutcome::Aborted { .. } => {
                info!(captures, "delay sweep aborted mid-capture");
                return Ok(SweepOutcome::Aborted { captures });
            }
        }
    }

    Ok(SweepOutcome::Completed { captures })
}
