use thiserror::Error;

#[derive(Error, Debug)]
pub enum PicosError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    Image(#[from] image::ImageError),

    #[error("No capture device found: {0}")]
    DeviceNotFound(String),

    #[error("Capture device busy: {0}")]
    DeviceBusy(String),

    #[error("Frame {frame_index} not ready within {timeout_ms} ms")]
    FrameTimeout { frame_index: usize, timeout_ms: u64 },

    #[error("Frame dimensions {actual:?} do not match accumulator dimensions {expected:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Accumulator holds no frames")]
    EmptyAccumulator,

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid sequence file: {0}")]
    InvalidSequenceFile(String),

    #[error("Instrument error: {0}")]
    Instrument(String),
}

pub type Result<T> = std::result::Result<T, PicosError>;
