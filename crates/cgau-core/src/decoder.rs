use std::fmt;
use std::sync::Arc;

use crate::diagnostics::{DiagnosticSink, Diagnostics, dump_frame};
use crate::normalize::NormalizedReading;
use crate::protocols::cgau::error::CgauError;
use crate::protocols::cgau::{SensorReading, parse_frame};
use crate::{DecodedResult, SensorValue, keys};

/// Raw codes together with their normalized values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodedFrame {
    pub reading: SensorReading,
    pub normalized: NormalizedReading,
}

/// Stateless CGAU decoder.
///
/// Holds only configuration (debug flag and diagnostic sink), so a single
/// instance can be shared across threads.
///
/// # Examples
/// ```
/// use cgau_core::{FrameDecoder, SensorValue};
///
/// let mut frame = b"CGAU".to_vec();
/// frame.resize(13, 0);
/// frame.extend_from_slice(&250u16.to_le_bytes());
/// frame.extend_from_slice(&550u16.to_le_bytes());
/// frame.extend_from_slice(&800u16.to_le_bytes());
///
/// let result = FrameDecoder::new().decode(Some(frame.as_slice()));
/// assert_eq!(result.sensor["humidity"], SensorValue::Integer(55));
/// ```
#[derive(Clone, Default)]
pub struct FrameDecoder {
    debug: bool,
    sink: Option<Arc<dyn DiagnosticSink>>,
}

impl fmt::Debug for FrameDecoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameDecoder")
            .field("debug", &self.debug)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dump every non-empty frame to the diagnostic channel before decoding.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    fn diagnostics(&self) -> Diagnostics<'_> {
        Diagnostics::new(self.sink.as_deref())
    }

    /// Decode a frame, reporting why it was rejected.
    pub fn try_decode(&self, payload: &[u8]) -> Result<DecodedFrame, CgauError> {
        if payload.is_empty() {
            return Err(CgauError::EmptyInput);
        }
        if self.debug {
            let diagnostics = self.diagnostics();
            for line in dump_frame(payload).lines() {
                diagnostics.log(&line);
            }
        }
        let reading = parse_frame(payload)?;
        Ok(DecodedFrame {
            reading,
            normalized: NormalizedReading::from_raw(&reading),
        })
    }

    /// Decode a frame into the canonical result shape.
    ///
    /// Never fails: empty, unrecognized or truncated frames yield
    /// [`DecodedResult::empty`], and the reason goes to the diagnostic channel.
    pub fn decode(&self, payload: Option<&[u8]>) -> DecodedResult {
        let payload = match payload {
            Some(payload) if !payload.is_empty() => payload,
            _ => return DecodedResult::empty(),
        };
        match self.try_decode(payload) {
            Ok(frame) => assemble(&frame),
            Err(err) => {
                self.diagnostics().log(&format!("Rejected frame: {err}"));
                DecodedResult::empty()
            }
        }
    }
}

/// Decode with default settings (no dump, stderr diagnostics).
pub fn decode_frame(payload: &[u8]) -> DecodedResult {
    FrameDecoder::new().decode(Some(payload))
}

fn assemble(frame: &DecodedFrame) -> DecodedResult {
    let DecodedFrame {
        reading,
        normalized,
    } = frame;
    let mut result = DecodedResult::empty();
    let entries = [
        (keys::TEMPERATURE, SensorValue::Float(normalized.temperature)),
        (keys::TEMPERATURE_RAW, reading.temp_raw.into()),
        (keys::HUMIDITY, normalized.humidity.into()),
        (keys::HUMIDITY_RAW, reading.hum_raw.into()),
        (keys::CARBON_DIOXIDE, normalized.carbon_dioxide.into()),
        (keys::CARBON_DIOXIDE_RAW, reading.co2_raw.into()),
        (keys::SENSOR_OFFSET_BYTES, (reading.offset as u64).into()),
    ];
    for (key, value) in entries {
        result.sensor.insert(key.to_string(), value);
    }
    result
}
