//! Date normalization.
//!
//! Sources express event dates in several shapes. [`DateNormalizer`] tries
//! them in a fixed priority and returns the first that parses:
//!
//! 1. A nested record's `date` sub-field, as an ISO calendar date (`YYYY-MM-DD`)
//! 2. A nested record's `dateTime` sub-field, truncated to its first ten
//!    characters and parsed as an ISO calendar date
//! 3. A flat date field, tried as `MM/DD/YYYY`, then as a ten character
//!    dash-separated date whose first segment decides the layout
//!    (four digits: `YYYY-MM-DD`, two digits: `DD-MM-YYYY`)
//!
//! When nothing parses the normalizer returns the day after its reference
//! date, which is today at the time of the call unless pinned. Callers
//! cannot tell a defaulted date from a parsed one.

use chrono::{Days, Local, NaiveDate};
use serde_json::{Map, Value};
use tracing::debug;

use crate::raw_record::{RawRecord, scalar_text};
use crate::resolve::resolve;

/// Where a source keeps its date information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRules {
    /// Keys holding a nested record with `date` / `dateTime` sub-fields.
    pub nested_keys: &'static [&'static str],
    /// Keys holding a flat date string, in resolution order.
    pub flat_keys: &'static [&'static str],
}

/// Where the reference day comes from.
#[derive(Debug, Clone, Copy)]
enum ReferenceDay {
    Fixed(NaiveDate),
    Clock(fn() -> NaiveDate),
}

/// Parses dates relative to a reference day.
///
/// Unless pinned, the reference day is read from the clock each time a
/// fallback is needed.
#[derive(Debug, Clone, Copy)]
pub struct DateNormalizer {
    reference: ReferenceDay,
}

impl Default for DateNormalizer {
    fn default() -> Self {
        Self::local()
    }
}

impl DateNormalizer {
    /// Creates a normalizer pinned to `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            reference: ReferenceDay::Fixed(today),
        }
    }

    /// Creates a normalizer that follows the local current date.
    pub fn local() -> Self {
        Self::with_clock(local_today)
    }

    /// Creates a normalizer that asks `clock` for the current date.
    pub fn with_clock(clock: fn() -> NaiveDate) -> Self {
        Self {
            reference: ReferenceDay::Clock(clock),
        }
    }

    /// The pinned date, or the clock's current date.
    pub fn reference_date(&self) -> NaiveDate {
        match self.reference {
            ReferenceDay::Fixed(today) => today,
            ReferenceDay::Clock(clock) => clock(),
        }
    }

    /// The fallback date: reference date plus one day.
    pub fn fallback(&self) -> NaiveDate {
        let today = self.reference_date();
        today.checked_add_days(Days::new(1)).unwrap_or(today)
    }

    /// Returns the record's date, or the fallback when no layout parses.
    pub fn normalize(&self, record: &RawRecord, rules: &DateRules) -> NaiveDate {
        match parse_record_date(record, rules) {
            Some(date) => date,
            None => {
                let fallback = self.fallback();
                debug!(%fallback, "No parseable date in record, using fallback");
                fallback
            }
        }
    }
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Tries every date shape in priority order without applying the fallback.
pub fn parse_record_date(record: &RawRecord, rules: &DateRules) -> Option<NaiveDate> {
    rules
        .nested_keys
        .iter()
        .filter_map(|key| record.get_record(key))
        .find_map(parse_nested_date)
        .or_else(|| {
            let (_, value) = resolve(record, rules.flat_keys)?;
            parse_flat_date(&scalar_text(value)?)
        })
}

/// Parses a nested `{ date | dateTime }` record.
pub fn parse_nested_date(nested: &Map<String, Value>) -> Option<NaiveDate> {
    let text = |key: &str| nested.get(key).and_then(scalar_text);

    text("date")
        .and_then(|date| parse_iso_date(&date))
        .or_else(|| {
            let date_time = text("dateTime")?;
            parse_iso_date(date_time.get(..10)?)
        })
}

/// Parses a flat date string in one of the legacy layouts.
pub fn parse_flat_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();

    if value.contains('/') {
        return parse_slash_date(value);
    }

    if value.contains('-') && value.len() == 10 {
        return parse_dash_date(value);
    }

    // Timestamps such as "2024-12-28T09:00:00Z" carry an ISO date prefix.
    value.get(..10).and_then(parse_iso_date)
}

/// Parses `YYYY-MM-DD` exactly.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

fn parse_slash_date(value: &str) -> Option<NaiveDate> {
    let [month, day, year] = split_three(value, '/')?;
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

fn parse_dash_date(value: &str) -> Option<NaiveDate> {
    let [first, second, third] = split_three(value, '-')?;
    match (first.len(), third.len()) {
        (4, _) => NaiveDate::from_ymd_opt(
            first.parse().ok()?,
            second.parse().ok()?,
            third.parse().ok()?,
        ),
        (2, 4) => NaiveDate::from_ymd_opt(
            third.parse().ok()?,
            second.parse().ok()?,
            first.parse().ok()?,
        ),
        _ => None,
    }
}

fn split_three(value: &str, separator: char) -> Option<[&str; 3]> {
    let mut parts = value.split(separator);
    let first = parts.next()?;
    let second = parts.next()?;
    let third = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some([first.trim(), second.trim(), third.trim()])
}
