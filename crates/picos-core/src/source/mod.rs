mod replay;
mod simulate;

pub use replay::ReplaySource;
pub use simulate::SimulatedSource;

use std::time::Duration;

use crate::error::Result;
use crate::frame::RawFrame;

/// A device or recording that yields one raw frame per call once opened.
///
/// Implementations deliver frames rotated 180 degrees from the sensor-native
/// orientation and tolerate `close` after a failed session. Sources follow
/// single-writer discipline: only the engine driving a session calls into
/// one, and opening an already open source fails with `DeviceBusy`.
pub trait FrameSource {
    /// Acquire the device. Fails with `DeviceNotFound` or `DeviceBusy`.
    fn open(&mut self) -> Result<()>;

    /// Block until the next frame is ready or `timeout` elapses; a timeout
    /// surfaces as `FrameTimeout` and is fatal to the session.
    fn next_frame(&mut self, timeout: Duration) -> Result<RawFrame>;

    /// Release the device. Idempotent.
    fn close(&mut self) -> Result<()>;
}
