use super::error::CgauError;
use super::layout;

pub struct CgauReader<'a> {
    payload: &'a [u8],
}

impl<'a> CgauReader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self { payload }
    }

    pub fn require_len(&self, needed: usize) -> Result<(), CgauError> {
        if self.payload.len() < needed {
            return Err(CgauError::TruncatedFrame {
                needed,
                actual: self.payload.len(),
            });
        }
        Ok(())
    }

    pub fn read_slice(&self, range: std::ops::Range<usize>) -> Result<&'a [u8], CgauError> {
        self.payload
            .get(range.clone())
            .ok_or(CgauError::TruncatedFrame {
                needed: range.end,
                actual: self.payload.len(),
            })
    }

    pub fn read_u16_le(&self, range: std::ops::Range<usize>) -> Result<u16, CgauError> {
        let bytes = self.read_slice(range)?;
        if bytes.len() != 2 {
            return Err(CgauError::TruncatedFrame {
                needed: 2,
                actual: bytes.len(),
            });
        }
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Header bytes as present on the wire, truncated when the payload is
    /// shorter than the magic.
    pub fn read_header(&self) -> &'a [u8] {
        let end = layout::MAGIC_RANGE.end.min(self.payload.len());
        &self.payload[..end]
    }

    /// Reader over the measurement block starting at `offset`.
    pub fn sensor_block(&self, offset: usize) -> Result<CgauReader<'a>, CgauError> {
        let needed = offset
            .checked_add(layout::SENSOR_BLOCK_LEN)
            .ok_or(CgauError::TruncatedFrame {
                needed: usize::MAX,
                actual: self.payload.len(),
            })?;
        self.require_len(needed)?;
        let block = self.read_slice(offset..needed)?;
        Ok(CgauReader::new(block))
    }
}
