use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use ndarray::Array3;

use picos_core::error::{PicosError, Result};
use picos_core::frame::RawFrame;
use picos_core::io::rawseq::{RawSeqHeader, RAWSEQ_VERSION};
use picos_core::io::rawseq_writer::RawSeqWriter;
use picos_core::source::FrameSource;

/// Frame with every pixel of every channel set to `value`.
pub fn uniform_frame(height: usize, width: usize, value: u8) -> RawFrame {
    RawFrame::new(Array3::from_elem((height, width, 3), value))
}

/// Header for a synthetic raw-sequence recording.
pub fn build_header(width: u32, height: u32, frame_count: u32) -> RawSeqHeader {
    RawSeqHeader {
        version: RAWSEQ_VERSION,
        width,
        height,
        frame_count,
        recorded_at_us: 0,
    }
}

/// Write a recording of uniform frames (one brightness value per frame) to
/// a temp file and return its handle.
pub fn write_test_recording(
    width: u32,
    height: u32,
    frame_values: &[u8],
) -> tempfile::NamedTempFile {
    let file = tempfile::NamedTempFile::new().expect("create temp file");
    let header = build_header(width, height, frame_values.len() as u32);
    let mut writer = RawSeqWriter::create(file.path(), &header).expect("create writer");
    let frame_bytes = (width * height * 3) as usize;
    for &value in frame_values {
        writer
            .write_raw_frame(&vec![value; frame_bytes])
            .expect("write frame");
    }
    writer.finalize().expect("finalize");
    file
}

/// Counts open/close calls made against a [`ScriptedSource`].
#[derive(Debug, Default)]
pub struct SourceProbe {
    pub opens: AtomicUsize,
    pub closes: AtomicUsize,
}

impl SourceProbe {
    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

pub enum Step {
    /// Yield a uniform frame of this brightness.
    Frame(u8),
    /// Report that the frame-ready wait exceeded its bound.
    Timeout,
}

/// Scripted stand-in for a camera.
///
/// Plays back `steps` in order; once exhausted it keeps yielding uniform
/// frames of `fill`, so captures of any length can run against it.
pub struct ScriptedSource {
    width: usize,
    height: usize,
    steps: Vec<Step>,
    cursor: usize,
    fill: u8,
    fail_open: bool,
    open: bool,
    pub probe: Arc<SourceProbe>,
}

impl ScriptedSource {
    pub fn uniform(width: usize, height: usize, fill: u8) -> Self {
        Self::with_steps(width, height, fill, Vec::new())
    }

    pub fn with_steps(width: usize, height: usize, fill: u8, steps: Vec<Step>) -> Self {
        Self {
            width,
            height,
            steps,
            cursor: 0,
            fill,
            fail_open: false,
            open: false,
            probe: Arc::new(SourceProbe::default()),
        }
    }

    /// Delivers `good_frames` frames, then times out.
    pub fn timeout_after(width: usize, height: usize, fill: u8, good_frames: usize) -> Self {
        let mut steps: Vec<Step> = (0..good_frames).map(|_| Step::Frame(fill)).collect();
        steps.push(Step::Timeout);
        Self::with_steps(width, height, fill, steps)
    }

    pub fn failing_open(width: usize, height: usize) -> Self {
        let mut source = Self::uniform(width, height, 0);
        source.fail_open = true;
        source
    }
}

impl FrameSource for ScriptedSource {
    fn open(&mut self) -> Result<()> {
        if self.fail_open {
            return Err(PicosError::DeviceNotFound("no scripted device".into()));
        }
        if self.open {
            return Err(PicosError::DeviceBusy("scripted source already open".into()));
        }
        self.open = true;
        self.probe.opens.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn next_frame(&mut self, timeout: Duration) -> Result<RawFrame> {
        let index = self.cursor;
        self.cursor += 1;
        match self.steps.get(index) {
            Some(Step::Frame(value)) => Ok(uniform_frame(self.height, self.width, *value)),
            Some(Step::Timeout) => Err(PicosError::FrameTimeout {
                frame_index: index,
                timeout_ms: timeout.as_millis() as u64,
            }),
            None => Ok(uniform_frame(self.height, self.width, self.fill)),
        }
    }

    fn close(&mut self) -> Result<()> {
        self.open = false;
        self.probe.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
