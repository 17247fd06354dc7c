use std::path::PathBuf;
use std::time::Duration;

use tracing::debug;

use crate::error::{PicosError, Result};
use crate::frame::RawFrame;
use crate::io::rawseq::RawSeqReader;

use super::FrameSource;

/// Replays a recorded raw sequence as if it were a live camera.
///
/// The recording wraps around, so captures longer than the file still run
/// to their full frame count. Used for offline reprocessing and tests.
pub struct ReplaySource {
    path: PathBuf,
    reader: Option<RawSeqReader>,
    cursor: usize,
}

impl ReplaySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            reader: None,
            cursor: 0,
        }
    }
}

impl FrameSource for ReplaySource {
    fn open(&mut self) -> Result<()> {
        if self.reader.is_some() {
            return Err(PicosError::DeviceBusy(format!(
                "{} is already open",
                self.path.display()
            )));
        }
        let reader = match RawSeqReader::open(&self.path) {
            Ok(reader) => reader,
            Err(PicosError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(PicosError::DeviceNotFound(self.path.display().to_string()));
            }
            Err(other) => return Err(other),
        };
        if reader.frame_count() == 0 {
            return Err(PicosError::InvalidSequenceFile(
                "recording holds no frames".into(),
            ));
        }
        debug!(
            path = %self.path.display(),
            frames = reader.frame_count(),
            "replay source opened"
        );
        self.reader = Some(reader);
        self.cursor = 0;
        Ok(())
    }

    fn next_frame(&mut self, _timeout: Duration) -> Result<RawFrame> {
        let reader = self.reader.as_ref().ok_or_else(|| {
            PicosError::DeviceNotFound("replay source is not open".into())
        })?;
        let frame = reader.read_frame(self.cursor % reader.frame_count())?;
        self.cursor += 1;
        Ok(frame)
    }

    fn close(&mut self) -> Result<()> {
        self.reader = None;
        Ok(())
    }
}
