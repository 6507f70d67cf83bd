use serde::{Deserialize, Serialize};

use super::readable;

const SECTION_DELIMITER: u8 = 0x00;
const UNKNOWN_FIRMWARE: &str = "unknown";
const BANNER_START: &str = "=== Payload Analysis ===";
const BANNER_END: &str = "========================";

/// Human-oriented breakdown of a frame.
///
/// # Examples
/// ```
/// use cgau_core::diagnostics::dump_frame;
///
/// let dump = dump_frame(b"CGAU\x001.5.1");
/// assert_eq!(dump.length, 10);
/// assert_eq!(dump.sections.len(), 2);
/// assert_eq!(dump.firmware, "1.5.1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameDump {
    /// Lowercase hex of the whole frame.
    pub hex: String,
    /// Frame length in bytes.
    pub length: usize,
    /// Escaped rendering of the whole frame.
    pub readable: String,
    /// NUL-delimited sections in frame order (empty sections kept).
    pub sections: Vec<SectionDump>,
    /// Best-effort firmware string found in a section, or `unknown`.
    pub firmware: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionDump {
    pub index: usize,
    pub hex: String,
    pub readable: String,
}

pub fn dump_frame(frame: &[u8]) -> FrameDump {
    let sections: Vec<&[u8]> = frame.split(|b| *b == SECTION_DELIMITER).collect();
    FrameDump {
        hex: hex::encode(frame),
        length: frame.len(),
        readable: readable(frame),
        firmware: firmware_version(&sections).unwrap_or_else(|| UNKNOWN_FIRMWARE.to_string()),
        sections: sections
            .iter()
            .enumerate()
            .map(|(index, section)| SectionDump {
                index,
                hex: hex::encode(section),
                readable: readable(section),
            })
            .collect(),
    }
}

/// First section that reads like a dotted version string (e.g. `1.5.1`).
pub fn firmware_version(sections: &[&[u8]]) -> Option<String> {
    sections.iter().find_map(|section| {
        let ascii: String = section
            .iter()
            .filter(|b| b.is_ascii())
            .map(|&b| char::from(b))
            .collect();
        let text = ascii.trim();
        let looks_like_version =
            text.contains('.') && text.chars().any(|c| c.is_ascii_digit());
        looks_like_version.then(|| text.to_string())
    })
}

impl FrameDump {
    /// Log lines, framed by a banner.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.sections.len() + 7);
        lines.push(BANNER_START.to_string());
        lines.push(format!("Payload: {}", self.readable));
        lines.push(format!("Hex: {}", self.hex));
        lines.push(format!("Length: {} bytes", self.length));
        lines.push(format!("Number of sections: {}", self.sections.len()));
        for section in &self.sections {
            lines.push(format!(
                "Section {:2}: {:20} | {}",
                section.index, section.hex, section.readable
            ));
        }
        lines.push(format!("Firmware: {}", self.firmware));
        lines.push(BANNER_END.to_string());
        lines
    }
}
