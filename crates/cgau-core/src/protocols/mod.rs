//! Protocol decoding modules.
//!
//! Each protocol follows a layered structure:
//! - `layout`: byte offsets and ranges (source of truth)
//! - `reader`: safe byte access
//! - `parser`: domain-level decoding (no direct byte indexing)
//! - `error`: explicit, actionable errors
//!
//! Parsers are pure and contain no I/O.

pub mod cgau;
