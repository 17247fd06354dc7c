/// Number of color channels in a raw camera frame (R, G, B).
pub const FRAME_CHANNELS: usize = 3;

/// Default bound on a single frame-ready wait, in milliseconds.
/// Exceeding it fails the whole session; frames are never silently dropped.
pub const DEFAULT_FRAME_TIMEOUT_MS: u64 = 3_000;

/// Maximum value of the 8-bit display range.
pub const DISPLAY_MAX: f64 = 255.0;

/// Maximum value of the 16-bit persisted output range.
pub const OUTPUT_MAX: f64 = 65_535.0;
