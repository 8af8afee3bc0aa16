//! Compact local wall-clock timestamps
//!
//! Journey planners exchange local times as `YYYYMMDDTHHMMSS` with no offset.

use chrono::NaiveDateTime;

use crate::errors::DomainError;

/// `strftime` pattern of the compact local format
pub const COMPACT_LOCAL_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Parse a compact local timestamp such as `20251114T083000`
///
/// # Errors
///
/// Returns `DomainError::InvalidDateTime` when the input does not match the
/// compact format exactly.
pub fn parse_compact_local(value: &str) -> Result<NaiveDateTime, DomainError> {
    NaiveDateTime::parse_from_str(value.trim(), COMPACT_LOCAL_FORMAT)
        .map_err(|e| DomainError::InvalidDateTime(format!("{value}: {e}")))
}

/// Format a local timestamp in the compact format
#[must_use]
pub fn format_compact_local(value: &NaiveDateTime) -> String {
    value.format(COMPACT_LOCAL_FORMAT).to_string()
}
