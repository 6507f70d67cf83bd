use serde::{Deserialize, Serialize};

use super::error::CgauError;
use super::layout;
use super::reader::CgauReader;

/// Raw measurement codes read from a CGAU frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Byte offset the triple was read from.
    pub offset: usize,
    pub temp_raw: u16,
    pub hum_raw: u16,
    pub co2_raw: u16,
}

/// Check the `CGAU` magic at the start of the payload.
pub fn validate_header(payload: &[u8]) -> Result<(), CgauError> {
    let reader = CgauReader::new(payload);
    let header = reader.read_header();
    if header != layout::MAGIC {
        return Err(CgauError::UnrecognizedHeader {
            header: header.to_vec(),
        });
    }
    Ok(())
}

/// Read the temperature/humidity/CO2 triple at `offset`.
///
/// No range checks are applied; whatever sits at the offset is returned.
pub fn extract_reading(payload: &[u8], offset: usize) -> Result<SensorReading, CgauError> {
    let reader = CgauReader::new(payload);
    let block = reader.sensor_block(offset)?;

    let temp_raw = block.read_u16_le(layout::TEMPERATURE_RANGE.clone())?;
    let hum_raw = block.read_u16_le(layout::HUMIDITY_RANGE.clone())?;
    let co2_raw = block.read_u16_le(layout::CARBON_DIOXIDE_RANGE.clone())?;

    Ok(SensorReading {
        offset,
        temp_raw,
        hum_raw,
        co2_raw,
    })
}

/// Validate and extract at the fixed [`layout::SENSOR_OFFSET`].
pub fn parse_frame(payload: &[u8]) -> Result<SensorReading, CgauError> {
    if payload.is_empty() {
        return Err(CgauError::EmptyInput);
    }
    validate_header(payload)?;
    extract_reading(payload, layout::SENSOR_OFFSET)
}
