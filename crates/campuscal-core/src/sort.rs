//! Pluggable event ordering.
//!
//! A [`SortStrategy`] takes a list of events and returns a new ordering. The
//! registry holds one active strategy and re-sorts its current contents on
//! every listing call.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::event::CanonicalEvent;

/// An ordering over canonical events.
pub trait SortStrategy: Send + Sync + fmt::Debug {
    /// Returns the identifier of this strategy (e.g., "date", "title").
    fn name(&self) -> &'static str;

    /// Returns the events in this strategy's order.
    fn sort(&self, events: Vec<Arc<CanonicalEvent>>) -> Vec<Arc<CanonicalEvent>>;
}

/// Sorts by calendar date, newest first.
#[derive(Debug, Clone, Copy, Default)]
pub struct SortByDate;

impl SortStrategy for SortByDate {
    fn name(&self) -> &'static str {
        "date"
    }

    fn sort(&self, mut events: Vec<Arc<CanonicalEvent>>) -> Vec<Arc<CanonicalEvent>> {
        events.sort_by(|a, b| b.date().cmp(&a.date()).then_with(|| by_id(a, b)));
        events
    }
}

/// Sorts by title, lexicographically descending.
#[derive(Debug, Clone, Copy, Default)]
pub struct SortByTitle;

impl SortStrategy for SortByTitle {
    fn name(&self) -> &'static str {
        "title"
    }

    fn sort(&self, mut events: Vec<Arc<CanonicalEvent>>) -> Vec<Arc<CanonicalEvent>> {
        events.sort_by(|a, b| b.title().cmp(a.title()).then_with(|| by_id(a, b)));
        events
    }
}

// Ties fall back to ascending id so listings are deterministic.
fn by_id(a: &CanonicalEvent, b: &CanonicalEvent) -> Ordering {
    a.id().cmp(b.id())
}

/// Named sort orders, used to pick a strategy from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Date,
    Title,
}

impl SortKey {
    /// Builds the strategy for this key.
    pub fn strategy(self) -> Box<dyn SortStrategy> {
        match self {
            Self::Date => Box::new(SortByDate),
            Self::Title => Box::new(SortByTitle),
        }
    }

    /// Parses a key from its name, ignoring case.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "date" => Some(Self::Date),
            "title" => Some(Self::Title),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventDraft, EventKind};
    use chrono::NaiveDate;

    fn event(id: &str, title: &str, y: i32, m: u32, d: u32) -> Arc<CanonicalEvent> {
        Arc::new(
            EventDraft::new(id, title, NaiveDate::from_ymd_opt(y, m, d).unwrap())
                .build(EventKind::Seminar),
        )
    }

    fn ids(events: &[Arc<CanonicalEvent>]) -> Vec<&str> {
        events.iter().map(|e| e.id()).collect()
    }

    #[test]
    fn date_descending() {
        let events = vec![
            event("A", "Alpha", 2024, 12, 15),
            event("B", "Beta", 2024, 12, 20),
            event("C", "Gamma", 2024, 12, 18),
        ];

        let sorted = SortByDate.sort(events);
        let dates: Vec<String> = sorted.iter().map(|e| e.date().to_string()).collect();
        assert_eq!(dates, ["2024-12-20", "2024-12-18", "2024-12-15"]);
    }

    #[test]
    fn title_descending() {
        let events = vec![
            event("A", "Alpha", 2024, 12, 15),
            event("B", "Gamma", 2024, 12, 20),
            event("C", "Beta", 2024, 12, 18),
        ];

        let sorted = SortByTitle.sort(events);
        assert_eq!(ids(&sorted), ["B", "C", "A"]);
    }

    #[test]
    fn ties_break_on_id() {
        let events = vec![
            event("Z", "Same", 2024, 12, 15),
            event("A", "Same", 2024, 12, 15),
        ];

        assert_eq!(ids(&SortByDate.sort(events.clone())), ["A", "Z"]);
        assert_eq!(ids(&SortByTitle.sort(events)), ["A", "Z"]);
    }

    #[test]
    fn empty_input() {
        assert!(SortByDate.sort(Vec::new()).is_empty());
    }

    #[test]
    fn sort_key_parsing_and_strategy() {
        assert_eq!(SortKey::parse("Date"), Some(SortKey::Date));
        assert_eq!(SortKey::parse(" title "), Some(SortKey::Title));
        assert_eq!(SortKey::parse("capacity"), None);
        assert_eq!(SortKey::default(), SortKey::Date);

        assert_eq!(SortKey::Date.strategy().name(), "date");
        assert_eq!(SortKey::Title.strategy().name(), "title");
    }
}
