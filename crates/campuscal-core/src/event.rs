//! Canonical event types.
//!
//! This module provides the event model every ingestion source converges on:
//! - [`EventKind`]: The three kinds of campus events (lecture, seminar, workshop)
//! - [`CanonicalEvent`]: An immutable, source-agnostic event
//! - [`EventDraft`]: The resolved fields an adapter hands to the factory
//!
//! Events are built once through [`create_event`] (or [`EventDraft::build`])
//! and never mutated afterwards. Description enhancements produce a new event
//! instead of changing an existing one, see [`crate::enhance`].

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The kind of a campus event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Lecture,
    Seminar,
    Workshop,
}

impl EventKind {
    /// All kinds, in declaration order.
    pub const ALL: [EventKind; 3] = [Self::Lecture, Self::Seminar, Self::Workshop];

    /// Returns a human-readable name for this kind.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Lecture => "Lecture",
            Self::Seminar => "Seminar",
            Self::Workshop => "Workshop",
        }
    }

    /// Returns the lowercase identifier used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lecture => "lecture",
            Self::Seminar => "seminar",
            Self::Workshop => "workshop",
        }
    }

    /// Parses a kind from its identifier, ignoring case and surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value))
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Resolved event fields, before a kind has been attached.
///
/// Adapters fill a draft from a raw record and pass it to the factory once the
/// classifier has picked a kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub location: String,
    pub capacity: i32,
}

impl EventDraft {
    /// Creates a draft with the given id, title and date.
    ///
    /// Description and location start empty and capacity starts at zero.
    pub fn new(id: impl Into<String>, title: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            date,
            location: String::new(),
            capacity: 0,
        }
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder method to set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Builder method to set the capacity.
    pub fn with_capacity(mut self, capacity: i32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Builds a [`CanonicalEvent`] of the given kind.
    pub fn build(self, kind: EventKind) -> CanonicalEvent {
        create_event(kind, self)
    }
}

/// Constructs a canonical event of the given kind from a draft.
pub fn create_event(kind: EventKind, draft: EventDraft) -> CanonicalEvent {
    CanonicalEvent {
        id: draft.id,
        title: draft.title,
        description: draft.description,
        date: draft.date,
        location: draft.location,
        capacity: draft.capacity,
        kind,
    }
}

/// A normalized campus event.
///
/// This is the canonical representation of an event after it has been
/// ingested from any source. Fields are private so an event cannot change
/// once built; capacity is informational and never checked against the
/// number of registrations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalEvent {
    id: String,
    title: String,
    description: String,
    date: NaiveDate,
    location: String,
    capacity: i32,
    kind: EventKind,
}

impl CanonicalEvent {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn capacity(&self) -> i32 {
        self.capacity
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Returns a copy of this event with a different description.
    ///
    /// Used by the enhancement pipeline; the original is left as-is.
    pub(crate) fn with_replaced_description(&self, description: String) -> Self {
        Self {
            description,
            ..self.clone()
        }
    }

    /// Renders the multi-line details block for this event.
    ///
    /// ```text
    /// Seminar Event ID: EXT_1
    /// Title: Guest Talk
    /// Description: ...
    /// Date: 2024-12-25
    /// Location: Main Auditorium
    /// Capacity: 200
    /// ```
    pub fn details(&self) -> String {
        format!(
            "{} Event ID: {}\nTitle: {}\nDescription: {}\nDate: {}\nLocation: {}\nCapacity: {}\n",
            self.kind.display_name(),
            self.id,
            self.title,
            self.description,
            self.date,
            self.location,
            self.capacity,
        )
    }
}
