use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::consts::FRAME_CHANNELS;
use crate::error::Result;
use crate::frame::RawFrame;
use crate::io::rawseq::{RawSeqHeader, RAWSEQ_HEADER_SIZE, RAWSEQ_MAGIC};

/// Writes a raw-sequence file at the byte level.
pub struct RawSeqWriter {
    writer: BufWriter<File>,
    header: RawSeqHeader,
    frames_written: u32,
}

impl RawSeqWriter {
    /// Create a new raw-sequence file and write the header.
    pub fn create(path: &Path, header: &RawSeqHeader) -> Result<Self> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        write_header(&mut writer, header)?;
        Ok(Self {
            writer,
            header: header.clone(),
            frames_written: 0,
        })
    }

    /// Write one frame as stored bytes in sensor-native orientation.
    pub fn write_raw_frame(&mut self, data: &[u8]) -> Result<()> {
        debug_assert_eq!(data.len(), self.header.frame_byte_size());
        self.writer.write_all(data)?;
        self.frames_written += 1;
        Ok(())
    }

    /// Write a decoded frame, undoing the 180-degree decode rotation so the
    /// stored layout stays sensor-native.
    pub fn write_frame(&mut self, frame: &RawFrame) -> Result<()> {
        let (h, w, _) = frame.data.dim();
        let mut raw = vec![0u8; h * w * FRAME_CHANNELS];
        for row in 0..h {
            for col in 0..w {
                let idx = (row * w + col) * FRAME_CHANNELS;
                let (in_row, in_col) = (h - 1 - row, w - 1 - col);
                for ch in 0..FRAME_CHANNELS {
                    raw[idx + ch] = frame.data[[in_row, in_col, ch]];
                }
            }
        }
        self.write_raw_frame(&raw)
    }

    /// Write the optional timestamp trailer (one u64 per frame,
    /// little-endian).
    pub fn write_timestamps(&mut self, timestamps: &[u64]) -> Result<()> {
        for &ts in timestamps {
            self.writer.write_all(&ts.to_le_bytes())?;
        }
        Ok(())
    }

    /// Flush and finalize the file.
    pub fn finalize(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

fn write_header(w: &mut impl Write, header: &RawSeqHeader) -> Result<()> {
    w.write_all(RAWSEQ_MAGIC)?;
    w.write_all(&header.version.to_le_bytes())?;
    w.write_all(&header.width.to_le_bytes())?;
    w.write_all(&header.height.to_le_bytes())?;
    w.write_all(&header.frame_count.to_le_bytes())?;
    w.write_all(&header.recorded_at_us.to_le_bytes())?;

    debug_assert_eq!(8 + 4 + 4 + 4 + 4 + 8, RAWSEQ_HEADER_SIZE);
    Ok(())
}
