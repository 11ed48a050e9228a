//! Field resolution over raw records.
//!
//! Each logical attribute has an ordered list of candidate keys per source.
//! The first candidate present with a non-null value wins; conflicting
//! candidates further down the list are ignored.

use serde_json::Value;

use crate::error::{SourceError, SourceResult};
use crate::raw_record::{RawRecord, scalar_text};

/// Returns the key and value of the first candidate present with a non-null value.
pub fn resolve<'a, 'k>(
    record: &'a RawRecord,
    candidates: &[&'k str],
) -> Option<(&'k str, &'a Value)> {
    candidates
        .iter()
        .find_map(|&key| record.get_present(key).map(|value| (key, value)))
}

/// Resolves a text attribute.
///
/// Scalars are rendered as text. A nested record or list under the winning
/// key cannot be read as text and is reported as [`SourceError`].
pub fn resolve_text(record: &RawRecord, candidates: &[&str]) -> SourceResult<Option<String>> {
    match resolve(record, candidates) {
        None => Ok(None),
        Some((key, value)) => scalar_text(value).map(Some).ok_or_else(|| {
            SourceError::invalid_field(key, "expected text, found a nested value")
        }),
    }
}

/// Resolves a text attribute, falling back to `default` when no candidate is present.
pub fn resolve_text_or(
    record: &RawRecord,
    candidates: &[&str],
    default: &str,
) -> SourceResult<String> {
    Ok(resolve_text(record, candidates)?.unwrap_or_else(|| default.to_string()))
}
