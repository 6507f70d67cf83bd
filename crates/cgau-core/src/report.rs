use serde::{Deserialize, Serialize};

use crate::DecodedResult;

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when no receipt time is available.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Decoded frame wrapped with provenance metadata.
///
/// # Examples
/// ```
/// use cgau_core::{DecodedResult, make_report};
///
/// let report = make_report("payload.bin", 19, DecodedResult::empty());
/// assert_eq!(report.report_version, cgau_core::REPORT_VERSION);
/// assert!(report.device.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodeReport {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// RFC3339 timestamp of frame receipt.
    pub generated_at: String,
    /// Where the payload came from.
    pub input: InputInfo,
    /// Device address taken from the topic, when one was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    /// Decoder output.
    pub result: DecodedResult,
}

/// Tool metadata embedded in reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name (e.g., "cgau").
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

/// Payload metadata embedded in reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputInfo {
    /// File path, or `hex` for inline payloads.
    pub source: String,
    /// Payload size in bytes.
    pub bytes: u64,
}

/// Build a report; `generated_at` follows the result timestamp when set.
pub fn make_report(source: &str, bytes: u64, result: DecodedResult) -> DecodeReport {
    DecodeReport {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "cgau".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: result
            .timestamp
            .clone()
            .unwrap_or_else(|| DEFAULT_GENERATED_AT.to_string()),
        input: InputInfo {
            source: source.to_string(),
            bytes,
        },
        device: None,
        result,
    }
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;

    use super::*;

    #[test]
    fn report_omits_device_when_none() {
        let report = make_report("payload.bin", 4, DecodedResult::empty());
        let value = serde_json::to_value(&report).expect("report json");
        assert!(value.get("device").is_none());
        assert_eq!(value["generated_at"], DEFAULT_GENERATED_AT);
        assert_eq!(value["input"]["bytes"], 4);
    }

    #[test]
    fn generated_at_follows_receipt_time() {
        let mut result = DecodedResult::empty();
        result.stamp(OffsetDateTime::from_unix_timestamp(86_400).expect("timestamp"));
        let mut report = make_report("hex", 0, result);
        report.device = Some("582D34AABBCC".to_string());
        assert_eq!(report.generated_at, "1970-01-02T00:00:00Z");
        let value = serde_json::to_value(&report).expect("report json");
        assert_eq!(value["device"], "582D34AABBCC");
    }
}
