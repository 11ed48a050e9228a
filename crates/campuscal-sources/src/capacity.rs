//! Capacity estimation.
//!
//! Capacity comes from the strongest signal a record offers, in order:
//!
//! 1. A direct numeric field (alias set per source)
//! 2. A `capacity:` or `max:` marker in the description, case-insensitive,
//!    followed by an integer token
//! 3. An attendee list: twice the attendee count, at least 20
//! 4. The source's fixed default
//!
//! A signal that fails to parse falls through to the next one. Values are
//! never range-checked.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::raw_record::{RawRecord, scalar_text};
use crate::resolve::resolve;

/// Minimum capacity inferred from an attendee list.
pub const MIN_ATTENDEE_CAPACITY: i32 = 20;

static CAPACITY_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)capacity:\s*(\S+)").expect("Invalid capacity marker regex"));
static MAX_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)max:\s*(\S+)").expect("Invalid max marker regex"));

/// How a source's records express capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityRules {
    /// Direct numeric fields, in resolution order.
    pub fields: &'static [&'static str],
    /// Whether to scan the description for `capacity:` / `max:` markers.
    pub scan_description: bool,
    /// Keys holding a list of attendees.
    pub attendee_keys: &'static [&'static str],
    /// Capacity used when no signal is found.
    pub default: i32,
}

/// Which signal produced a capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacitySignal {
    Field,
    DescriptionMarker,
    Attendees,
    Default,
}

/// Estimates the capacity of a record.
pub fn estimate(record: &RawRecord, description: &str, rules: &CapacityRules) -> i32 {
    estimate_with_signal(record, description, rules).0
}

/// Estimates the capacity of a record and reports which signal was used.
pub fn estimate_with_signal(
    record: &RawRecord,
    description: &str,
    rules: &CapacityRules,
) -> (i32, CapacitySignal) {
    let estimate = from_field(record, rules.fields)
        .map(|c| (c, CapacitySignal::Field))
        .or_else(|| {
            rules
                .scan_description
                .then(|| from_description(description))
                .flatten()
                .map(|c| (c, CapacitySignal::DescriptionMarker))
        })
        .or_else(|| {
            from_attendees(record, rules.attendee_keys).map(|c| (c, CapacitySignal::Attendees))
        })
        .unwrap_or((rules.default, CapacitySignal::Default));

    trace!(capacity = estimate.0, signal = ?estimate.1, "Estimated capacity");
    estimate
}

fn from_field(record: &RawRecord, fields: &[&str]) -> Option<i32> {
    let (_, value) = resolve(record, fields)?;
    scalar_text(value)?.trim().parse().ok()
}

/// Extracts the integer following the first `capacity:` marker, or else the first `max:` marker.
pub fn from_description(description: &str) -> Option<i32> {
    [&*CAPACITY_MARKER, &*MAX_MARKER].into_iter().find_map(|marker| {
        marker
            .captures(description)
            .and_then(|caps| caps.get(1))
            .and_then(|token| token.as_str().parse().ok())
    })
}

fn from_attendees(record: &RawRecord, keys: &[&str]) -> Option<i32> {
    let count = keys.iter().find_map(|key| record.get_list(key))?.len();
    let count = i32::try_from(count).unwrap_or(i32::MAX);
    Some(count.saturating_mul(2).max(MIN_ATTENDEE_CAPACITY))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    const RULES: CapacityRules = CapacityRules {
        fields: &["max_attendees", "capacity", "limit"],
        scan_description: true,
        attendee_keys: &["attendees"],
        default: 30,
    };

    fn attendees(count: usize) -> Value {
        Value::Array(
            (0..count)
                .map(|i| json!({"email": format!("user{i}@university.edu")}))
                .collect(),
        )
    }

    #[test]
    fn direct_field() {
        let record = RawRecord::new().with("capacity", "200");
        assert_eq!(
            estimate_with_signal(&record, "", &RULES),
            (200, CapacitySignal::Field)
        );
    }

    #[test]
    fn numeric_field_value() {
        let record = RawRecord::new().with("limit", 150);
        assert_eq!(estimate(&record, "", &RULES), 150);
    }

    #[test]
    fn field_alias_order() {
        let record = RawRecord::new()
            .with("limit", "150")
            .with("max_attendees", "80");
        assert_eq!(estimate(&record, "", &RULES), 80);
    }

    #[test]
    fn unparseable_field_falls_through() {
        let record = RawRecord::new().with("capacity", "lots");
        assert_eq!(
            estimate_with_signal(&record, "Seats. Capacity: 45", &RULES),
            (45, CapacitySignal::DescriptionMarker)
        );
    }

    #[test]
    fn description_capacity_marker() {
        let record = RawRecord::new();
        assert_eq!(
            estimate(
                &record,
                "Graduate level course on distributed databases. Capacity: 45",
                &RULES
            ),
            45
        );
    }

    #[test]
    fn description_max_marker() {
        assert_eq!(
            from_description("Meet with representatives. Max: 500 students"),
            Some(500)
        );
        assert_eq!(from_description("MAX:12"), Some(12));
    }

    #[test]
    fn capacity_marker_checked_before_max() {
        assert_eq!(from_description("max: 10, capacity: 60"), Some(60));
    }

    #[test]
    fn bad_capacity_token_tries_max() {
        assert_eq!(from_description("capacity: many, max: 70"), Some(70));
        assert_eq!(from_description("capacity: many"), None);
        assert_eq!(from_description("capacity:"), None);
    }

    #[test]
    fn marker_wins_over_attendees() {
        let record = RawRecord::new().with("attendees", attendees(1));
        assert_eq!(estimate(&record, "Capacity: 45", &RULES), 45);
    }

    #[test]
    fn attendee_heuristic() {
        let record = RawRecord::new().with("attendees", attendees(20));
        assert_eq!(
            estimate_with_signal(&record, "No markers here", &RULES),
            (40, CapacitySignal::Attendees)
        );
    }

    #[test]
    fn attendee_heuristic_has_floor() {
        let record = RawRecord::new().with("attendees", attendees(3));
        assert_eq!(estimate(&record, "", &RULES), MIN_ATTENDEE_CAPACITY);

        let record = RawRecord::new().with("attendees", attendees(0));
        assert_eq!(estimate(&record, "", &RULES), MIN_ATTENDEE_CAPACITY);
    }

    #[test]
    fn markers_can_be_disabled() {
        let rules = CapacityRules {
            scan_description: false,
            ..RULES
        };
        assert_eq!(estimate(&RawRecord::new(), "Capacity: 45", &rules), 30);
    }

    #[test]
    fn default_when_no_signal() {
        assert_eq!(
            estimate_with_signal(&RawRecord::new(), "", &RULES),
            (30, CapacitySignal::Default)
        );
    }

    #[test]
    fn out_of_range_values_are_kept() {
        let record = RawRecord::new().with("capacity", "-5");
        assert_eq!(estimate(&record, "", &RULES), -5);

        let record = RawRecord::new().with("capacity", "0");
        assert_eq!(estimate(&record, "", &RULES), 0);
    }
}
