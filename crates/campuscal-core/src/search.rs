//! Event search filters.
//!
//! Text filters are case-insensitive substring matches; a blank query
//! matches everything. Date bounds are inclusive and either end may be open.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::event::CanonicalEvent;

type Events = Vec<Arc<CanonicalEvent>>;

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn text_filter(events: Events, query: &str, field: fn(&CanonicalEvent) -> &str) -> Events {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return events;
    }
    events
        .into_iter()
        .filter(|event| contains_ci(field(event), &query))
        .collect()
}

pub fn by_title(events: Events, query: &str) -> Events {
    text_filter(events, query, CanonicalEvent::title)
}

pub fn by_location(events: Events, query: &str) -> Events {
    text_filter(events, query, CanonicalEvent::location)
}

pub fn by_description(events: Events, keyword: &str) -> Events {
    text_filter(events, keyword, CanonicalEvent::description)
}

pub fn on_date(events: Events, date: NaiveDate) -> Events {
    events.into_iter().filter(|e| e.date() == date).collect()
}

/// Keeps events dated within `[start, end]`. `None` leaves that side open.
pub fn in_date_range(events: Events, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Events {
    events
        .into_iter()
        .filter(|e| start.is_none_or(|s| e.date() >= s) && end.is_none_or(|end| e.date() <= end))
        .collect()
}

/// Keeps events whose capacity lies within `[min, max]`.
pub fn in_capacity_range(events: Events, min: i32, max: i32) -> Events {
    events
        .into_iter()
        .filter(|e| e.capacity() >= min && e.capacity() <= max)
        .collect()
}

/// Events on or after `today`.
pub fn upcoming(events: Events, today: NaiveDate) -> Events {
    in_date_range(events, Some(today), None)
}

/// Events strictly before `today`.
pub fn past(events: Events, today: NaiveDate) -> Events {
    events.into_iter().filter(|e| e.date() < today).collect()
}

/// A combination of filters applied in sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    pub title: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub min_capacity: Option<i32>,
    pub max_capacity: Option<i32>,
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_description(mut self, keyword: impl Into<String>) -> Self {
        self.description = Some(keyword.into());
        self
    }

    pub fn with_date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn with_capacity_range(mut self, min: Option<i32>, max: Option<i32>) -> Self {
        self.min_capacity = min;
        self.max_capacity = max;
        self
    }

    /// Applies every criterion that is set.
    pub fn apply(&self, mut events: Events) -> Events {
        if let Some(ref title) = self.title {
            events = by_title(events, title);
        }
        if let Some(ref location) = self.location {
            events = by_location(events, location);
        }
        if self.start_date.is_some() || self.end_date.is_some() {
            events = in_date_range(events, self.start_date, self.end_date);
        }
        if self.min_capacity.is_some() || self.max_capacity.is_some() {
            events = in_capacity_range(
                events,
                self.min_capacity.unwrap_or(i32::MIN),
                self.max_capacity.unwrap_or(i32::MAX),
            );
        }
        if let Some(ref keyword) = self.description {
            events = by_description(events, keyword);
        }
        events
    }
}
