//! Observational diagnostics for inbound frames.
//!
//! Nothing here influences decoding. `dump` renders a frame for humans, and
//! `sink` carries text to wherever the caller wants it. A failing sink degrades
//! to plain stderr output and is never surfaced as an error.

mod dump;
pub(crate) mod sink;

pub use dump::{FrameDump, SectionDump, dump_frame, firmware_version};
pub use sink::{Diagnostics, DiagnosticSink, SinkError, StderrSink, TracingSink};

/// Render bytes with printable ASCII (32..=126) as-is and everything else as
/// `\xNN`.
///
/// # Examples
/// ```
/// use cgau_core::diagnostics::readable;
///
/// assert_eq!(readable(b"CGAU\x00\x7f"), "CGAU\\x00\\x7f");
/// ```
pub fn readable(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len());
    for &byte in data {
        if (32..=126).contains(&byte) {
            out.push(char::from(byte));
        } else {
            out.push_str(&format!("\\x{byte:02x}"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::readable;

    #[test]
    fn readable_boundaries() {
        assert_eq!(readable(&[31, 32, 126, 127]), "\\x1f ~\\x7f");
    }

    #[test]
    fn readable_empty() {
        assert_eq!(readable(&[]), "");
    }
}
