//! Conversion of raw CGAU codes into engineering units.

use serde::{Deserialize, Serialize};

use crate::protocols::cgau::SensorReading;

/// Scale applied to temperature and humidity codes (tenths of a unit).
const TENTHS: u16 = 10;

/// Measurements in engineering units.
///
/// # Examples
/// ```
/// use cgau_core::{NormalizedReading, SensorReading};
///
/// let reading = SensorReading { offset: 13, temp_raw: 233, hum_raw: 459, co2_raw: 612 };
/// let normalized = NormalizedReading::from_raw(&reading);
/// assert_eq!(normalized.temperature, 23.3);
/// assert_eq!(normalized.humidity, 45);
/// assert_eq!(normalized.carbon_dioxide, 612);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedReading {
    /// Degrees Celsius, one decimal place.
    pub temperature: f64,
    /// Relative humidity in whole percent (truncated).
    pub humidity: u16,
    /// Parts per million.
    pub carbon_dioxide: u16,
}

impl NormalizedReading {
    pub fn from_raw(reading: &SensorReading) -> Self {
        Self {
            temperature: temperature_celsius(reading.temp_raw),
            humidity: humidity_percent(reading.hum_raw),
            carbon_dioxide: reading.co2_raw,
        }
    }
}

pub fn temperature_celsius(raw: u16) -> f64 {
    round_one_decimal(f64::from(raw) / f64::from(TENTHS))
}

/// Truncates toward zero: 459 -> 45.
pub fn humidity_percent(raw: u16) -> u16 {
    raw / TENTHS
}

/// Half away from zero, matching `f64::round`.
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
