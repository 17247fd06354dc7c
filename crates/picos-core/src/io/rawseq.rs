use std::fs::File;
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use memmap2::Mmap;
use ndarray::Array3;

use crate::consts::FRAME_CHANNELS;
use crate::error::{PicosError, Result};
use crate::frame::{RawFrame, SequenceInfo};

pub const RAWSEQ_HEADER_SIZE: usize = 32;
pub const RAWSEQ_MAGIC: &[u8; 8] = b"PICOSRAW";
pub const RAWSEQ_VERSION: u32 = 1;

/// Raw-sequence file header (32 bytes).
///
/// Frames are stored as 8-bit RGB in sensor-native orientation; an optional
/// trailer of one `u64` per frame carries capture timestamps in
/// microseconds since the Unix epoch.
#[derive(Clone, Debug)]
pub struct RawSeqHeader {
    pub version: u32,
    pub width: u32,
    pub height: u32,
    pub frame_count: u32,
    pub recorded_at_us: u64,
}

impl RawSeqHeader {
    /// Total bytes per stored frame.
    pub fn frame_byte_size(&self) -> usize {
        (self.width as usize) * (self.height as usize) * FRAME_CHANNELS
    }
}

/// Memory-mapped reader for recorded frame sequences.
pub struct RawSeqReader {
    mmap: Mmap,
    pub header: RawSeqHeader,
}

impl RawSeqReader {
    /// Open a raw-sequence file and parse its header.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };

        if mmap.len() < RAWSEQ_HEADER_SIZE {
            return Err(PicosError::InvalidSequenceFile(
                "file too small for header".into(),
            ));
        }
        if &mmap[0..8] != RAWSEQ_MAGIC {
            return Err(PicosError::InvalidSequenceFile(
                "missing PICOSRAW magic".into(),
            ));
        }

        let header = parse_header(&mmap[..RAWSEQ_HEADER_SIZE])?;

        // checked arithmetic: a hostile frame count must not wrap the
        // expected size past the truncation check
        let expected = (header.frame_byte_size() as u64)
            .checked_mul(u64::from(header.frame_count))
            .and_then(|payload| payload.checked_add(RAWSEQ_HEADER_SIZE as u64))
            .ok_or_else(|| {
                PicosError::InvalidSequenceFile("frame payload size overflows".into())
            })?;
        if (mmap.len() as u64) < expected {
            return Err(PicosError::InvalidSequenceFile(format!(
                "file truncated: expected at least {} bytes, got {}",
                expected,
                mmap.len()
            )));
        }

        Ok(Self { mmap, header })
    }

    pub fn frame_count(&self) -> usize {
        self.header.frame_count as usize
    }

    /// Raw stored bytes for one frame (zero-copy from the mmap).
    pub fn frame_raw(&self, index: usize) -> Result<&[u8]> {
        let count = self.frame_count();
        if index >= count {
            return Err(PicosError::InvalidSequenceFile(format!(
                "frame index {index} out of range (total: {count})"
            )));
        }
        let offset = RAWSEQ_HEADER_SIZE + index * self.header.frame_byte_size();
        let end = offset + self.header.frame_byte_size();
        Ok(&self.mmap[offset..end])
    }

    /// Decode one frame.
    ///
    /// The intensifier optics present the scene upside down, so both axes
    /// are flipped on decode: the returned frame is rotated 180 degrees
    /// from the stored sensor-native layout.
    pub fn read_frame(&self, index: usize) -> Result<RawFrame> {
        let raw = self.frame_raw(index)?;
        let h = self.header.height as usize;
        let w = self.header.width as usize;

        let mut data = Array3::<u8>::zeros((h, w, FRAME_CHANNELS));
        for row in 0..h {
            for col in 0..w {
                let idx = (row * w + col) * FRAME_CHANNELS;
                let (out_row, out_col) = (h - 1 - row, w - 1 - col);
                for ch in 0..FRAME_CHANNELS {
                    data[[out_row, out_col, ch]] = raw[idx + ch];
                }
            }
        }
        Ok(RawFrame::new(data))
    }

    /// Per-frame timestamp from the optional trailer.
    pub fn read_timestamp(&self, index: usize) -> Option<u64> {
        let trailer_offset =
            RAWSEQ_HEADER_SIZE + self.header.frame_byte_size() * self.frame_count();
        let ts_offset = trailer_offset + index * 8;
        if ts_offset + 8 <= self.mmap.len() {
            let bytes = &self.mmap[ts_offset..ts_offset + 8];
            Some(u64::from_le_bytes(bytes.try_into().ok()?))
        } else {
            None
        }
    }

    /// Build SequenceInfo from the header.
    pub fn info(&self, path: &Path) -> SequenceInfo {
        SequenceInfo {
            filename: path.to_path_buf(),
            total_frames: self.frame_count(),
            width: self.header.width,
            height: self.header.height,
            recorded_at_us: self.header.recorded_at_us,
        }
    }

    /// Iterator over all frames.
    pub fn frames(&self) -> impl Iterator<Item = Result<RawFrame>> + '_ {
        (0..self.frame_count()).map(move |i| self.read_frame(i))
    }
}

fn parse_header(buf: &[u8]) -> Result<RawSeqHeader> {
    let mut cursor = std::io::Cursor::new(&buf[8..]); // skip magic

    let version = cursor.read_u32::<LittleEndian>()?;
    let width = cursor.read_u32::<LittleEndian>()?;
    let height = cursor.read_u32::<LittleEndian>()?;
    let frame_count = cursor.read_u32::<LittleEndian>()?;
    let recorded_at_us = cursor.read_u64::<LittleEndian>()?;

    if version != RAWSEQ_VERSION {
        return Err(PicosError::InvalidSequenceFile(format!(
            "unsupported version {version}"
        )));
    }
    if width == 0 || height == 0 {
        return Err(PicosError::InvalidSequenceFile(format!(
            "invalid dimensions {width}x{height}"
        )));
    }
    // reject dimensions whose frame byte size cannot be represented,
    // before any size arithmetic trusts them
    if u64::from(width)
        .checked_mul(u64::from(height))
        .and_then(|pixels| pixels.checked_mul(FRAME_CHANNELS as u64))
        .is_none()
    {
        return Err(PicosError::InvalidSequenceFile(format!(
            "implausible dimensions {width}x{height}"
        )));
    }

    Ok(RawSeqHeader {
        version,
        width,
        height,
        frame_count,
        recorded_at_us,
    })
}
