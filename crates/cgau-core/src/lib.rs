//! CGAU core library for environmental-sensor telemetry frames.
//!
//! Frames arrive as opaque payloads from a publish/subscribe transport. The
//! pipeline is strictly one-way: header validation, an optional diagnostic
//! dump, extraction of the fixed-offset measurement triple, unit
//! normalization and result assembly. Decoding is synchronous and holds no
//! state between calls.
//!
//! Invariants:
//! - Decoding never fails: malformed input yields [`DecodedResult::empty`]
//!   and the reason is written to the diagnostic channel.
//! - Diagnostics are observational and never change the decoded values.
//! - The measurement triple is read at [`SENSOR_OFFSET`] without range checks.
//!
//! # Examples
//! ```
//! use cgau_core::{SensorValue, decode_frame};
//!
//! let mut frame = b"CGAU".to_vec();
//! frame.resize(13, 0);
//! for word in [233u16, 459, 612] {
//!     frame.extend_from_slice(&word.to_le_bytes());
//! }
//!
//! let result = decode_frame(&frame);
//! assert_eq!(result.sensor["temperature"], SensorValue::Float(23.3));
//! assert_eq!(result.sensor["humidity"], SensorValue::Integer(45));
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

mod decoder;
pub mod diagnostics;
mod normalize;
mod protocols;
mod report;
mod topic;

pub use decoder::{DecodedFrame, FrameDecoder, decode_frame};
pub use normalize::{NormalizedReading, humidity_percent, temperature_celsius};
pub use protocols::cgau::error::CgauError;
pub use protocols::cgau::layout::{MAGIC, SENSOR_OFFSET};
pub use protocols::cgau::{SensorReading, extract_reading, parse_frame, validate_header};
pub use report::{
    DEFAULT_GENERATED_AT, DecodeReport, InputInfo, REPORT_VERSION, ToolInfo, make_report,
};
pub use topic::device_address;

/// Names of the entries in [`DecodedResult::sensor`].
pub mod keys {
    pub const TEMPERATURE: &str = "temperature";
    pub const TEMPERATURE_RAW: &str = "temperature_raw";
    pub const HUMIDITY: &str = "humidity";
    pub const HUMIDITY_RAW: &str = "humidity_raw";
    pub const CARBON_DIOXIDE: &str = "carbon_dioxide";
    pub const CARBON_DIOXIDE_RAW: &str = "carbon_dioxide_raw";
    pub const SENSOR_OFFSET_BYTES: &str = "sensor_offset_bytes";
}

/// Single value in a sensor mapping.
///
/// Serialized untagged, so JSON carries a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SensorValue {
    Integer(u64),
    Float(f64),
}

impl From<u16> for SensorValue {
    fn from(value: u16) -> Self {
        SensorValue::Integer(u64::from(value))
    }
}

impl From<u64> for SensorValue {
    fn from(value: u64) -> Self {
        SensorValue::Integer(value)
    }
}

impl From<f64> for SensorValue {
    fn from(value: f64) -> Self {
        SensorValue::Float(value)
    }
}

/// Outcome of decoding one frame.
///
/// The empty shape (no sensor entries, no timestamp) is how every failure is
/// represented.
///
/// # Examples
/// ```
/// use cgau_core::DecodedResult;
///
/// let result = DecodedResult::empty();
/// assert!(result.is_empty());
/// assert!(result.timestamp.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecodedResult {
    /// Reading name to value, in stable key order.
    pub sensor: BTreeMap<String, SensorValue>,
    /// Reserved; always empty.
    pub device_info: BTreeMap<String, String>,
    /// Reserved; always empty.
    pub historical_data: Vec<BTreeMap<String, SensorValue>>,
    /// RFC3339 receipt time, set by the caller.
    pub timestamp: Option<String>,
}

impl DecodedResult {
    /// Canonical empty result.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when no reading was decoded.
    pub fn is_empty(&self) -> bool {
        self.sensor.is_empty()
    }

    /// Record the receipt time. Left unset if it cannot be formatted.
    pub fn stamp(&mut self, received_at: OffsetDateTime) {
        self.timestamp = received_at.format(&Rfc3339).ok();
    }

    pub fn get(&self, key: &str) -> Option<SensorValue> {
        self.sensor.get(key).copied()
    }
}
