pub const MAGIC: &[u8; 4] = b"CGAU";
pub const MAGIC_RANGE: std::ops::Range<usize> = 0..4;

/// Byte offset of the measurement triple.
///
/// Observed on a single firmware payload shape; earlier decoders scanned for a
/// plausible triple instead of trusting a fixed position.
pub const SENSOR_OFFSET: usize = 13;
pub const SENSOR_BLOCK_LEN: usize = 6;

pub const TEMPERATURE_RANGE: std::ops::Range<usize> = 0..2;
pub const HUMIDITY_RANGE: std::ops::Range<usize> = 2..4;
pub const CARBON_DIOXIDE_RANGE: std::ops::Range<usize> = 4..6;
