//! Instrument-control contract for the gating electronics.
//!
//! The serial protocol itself lives outside this crate; a session only
//! needs gate settings applied before capturing starts, and they are never
//! re-issued mid-session.

use crate::error::Result;

/// Gating and gain control of an intensified camera.
pub trait GateControl {
    /// Optical gate width, in seconds.
    fn set_exposure_time(&mut self, seconds: f64) -> Result<()>;

    /// Delay between trigger and gate opening, in seconds.
    fn set_exposure_delay(&mut self, seconds: f64) -> Result<()>;

    /// Microchannel-plate voltage, in volts.
    fn set_mcp_gain(&mut self, volts: u32) -> Result<()>;
}
