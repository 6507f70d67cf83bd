use thiserror::Error;

/// Errors returned by CGAU frame validation and extraction.
///
/// # Examples
/// ```
/// use cgau_core::CgauError;
///
/// let err = CgauError::TruncatedFrame { needed: 19, actual: 15 };
/// assert!(err.to_string().contains("frame too short"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CgauError {
    #[error("empty payload")]
    EmptyInput,
    #[error("unrecognized header: {}", escape_header(.header))]
    UnrecognizedHeader { header: Vec<u8> },
    #[error("frame too short: need {needed} bytes, got {actual}")]
    TruncatedFrame { needed: usize, actual: usize },
}

fn escape_header(header: &[u8]) -> String {
    format!("b\"{}\"", crate::diagnostics::readable(header))
}
