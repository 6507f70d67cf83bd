//! Device addressing carried in publish/subscribe topics.

const UNKNOWN_DEVICE: &str = "unknown";

/// Second `/`-separated segment of a topic such as `qingping/<addr>/up`.
///
/// # Examples
/// ```
/// use cgau_core::device_address;
///
/// assert_eq!(device_address("qingping/582D34AABBCC/up"), "582D34AABBCC");
/// assert_eq!(device_address("qingping"), "unknown");
/// ```
pub fn device_address(topic: &str) -> &str {
    topic.split('/').nth(1).unwrap_or(UNKNOWN_DEVICE)
}

#[cfg(test)]
mod tests {
    use super::device_address;

    #[test]
    fn empty_segment_is_kept() {
        assert_eq!(device_address("qingping//up"), "");
    }

    #[test]
    fn two_segments() {
        assert_eq!(device_address("a/b"), "b");
    }
}
