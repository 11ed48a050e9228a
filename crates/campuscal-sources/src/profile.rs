//! Per-source field tables.
//!
//! A [`SourceProfile`] gathers everything that differs between source
//! families: candidate keys for each logical attribute, defaults, the id
//! prefix, date and capacity rules, and the classification table. The
//! normalization pipeline itself is shared.

use std::fmt;

use campuscal_core::EventKind;

use crate::capacity::CapacityRules;
use crate::classify::Classifier;
use crate::date::DateRules;

/// Default capacity for external calendar records.
pub const EXTERNAL_DEFAULT_CAPACITY: i32 = 30;
/// Default capacity for legacy calendar records.
pub const LEGACY_DEFAULT_CAPACITY: i32 = 50;

pub const EXTERNAL_ID_PREFIX: &str = "EXT_";
pub const LEGACY_ID_PREFIX: &str = "LEGACY_";

pub const UNTITLED: &str = "Untitled Event";
pub const NO_DESCRIPTION: &str = "No description available";

/// The family a source belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFamily {
    /// Modern calendar APIs: nested start records, attendee lists.
    External,
    /// Old campus systems: flat fields, explicit type hints.
    Legacy,
}

impl SourceFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::External => "external",
            Self::Legacy => "legacy",
        }
    }

    /// Whether a source of this family must be authenticated as well as connected.
    pub fn requires_authentication(&self) -> bool {
        matches!(self, Self::External)
    }
}

impl fmt::Display for SourceFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Candidate keys for a text attribute, and the value used when none is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextField {
    pub keys: &'static [&'static str],
    pub default: &'static str,
}

impl TextField {
    pub const fn new(keys: &'static [&'static str], default: &'static str) -> Self {
        Self { keys, default }
    }
}

/// How one source family lays out its records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceProfile {
    pub family: SourceFamily,
    pub id_keys: &'static [&'static str],
    pub id_prefix: String,
    pub title: TextField,
    pub description: TextField,
    pub location: TextField,
    pub dates: DateRules,
    pub capacity: CapacityRules,
    /// Keys holding an explicit kind hint. When one is present, only the hint is classified.
    pub type_hint_keys: &'static [&'static str],
    pub classifier: Classifier,
}

impl SourceProfile {
    /// The external calendar layout.
    pub fn external() -> Self {
        Self {
            family: SourceFamily::External,
            id_keys: &["id"],
            id_prefix: EXTERNAL_ID_PREFIX.to_string(),
            title: TextField::new(&["summary", "title", "name"], UNTITLED),
            description: TextField::new(&["description", "details", "notes"], NO_DESCRIPTION),
            location: TextField::new(&["location", "venue", "place"], "Online"),
            dates: DateRules {
                nested_keys: &["start"],
                flat_keys: &["date"],
            },
            capacity: CapacityRules {
                fields: &["capacity"],
                scan_description: true,
                attendee_keys: &["attendees"],
                default: EXTERNAL_DEFAULT_CAPACITY,
            },
            type_hint_keys: &[],
            classifier: Classifier::external(),
        }
    }

    /// The legacy calendar layout.
    pub fn legacy() -> Self {
        Self {
            family: SourceFamily::Legacy,
            id_keys: &["id", "event_id", "legacy_id"],
            id_prefix: LEGACY_ID_PREFIX.to_string(),
            title: TextField::new(&["event_name", "title", "name"], UNTITLED),
            description: TextField::new(&["desc", "description", "details"], NO_DESCRIPTION),
            location: TextField::new(&["venue", "location", "place", "room"], "TBD"),
            dates: DateRules {
                nested_keys: &[],
                flat_keys: &["event_date", "date", "scheduled_date"],
            },
            capacity: CapacityRules {
                fields: &["max_attendees", "capacity", "limit", "max_participants"],
                scan_description: false,
                attendee_keys: &[],
                default: LEGACY_DEFAULT_CAPACITY,
            },
            type_hint_keys: &["type", "category", "kind", "event_type"],
            classifier: Classifier::legacy(),
        }
    }

    /// Builder method to set the capacity used when a record has no signal.
    pub fn with_default_capacity(mut self, capacity: i32) -> Self {
        self.capacity.default = capacity;
        self
    }

    /// Builder method to set the prefix prepended to every id.
    pub fn with_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = prefix.into();
        self
    }

    /// Builder method to set the kind used when no keyword matches.
    pub fn with_default_kind(mut self, kind: EventKind) -> Self {
        self.classifier = self.classifier.with_default_kind(kind);
        self
    }
}
