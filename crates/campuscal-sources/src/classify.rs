//! Event classification.
//!
//! A [`Classifier`] is an ordered rule table mapping keyword sets to an
//! [`EventKind`]. Text is case-folded and scanned rule by rule; the first
//! rule with any keyword contained in the text wins. Each source family has
//! its own rule order and default kind, so ambiguous text can classify
//! differently depending on where it came from.

use campuscal_core::EventKind;

/// One row of a classification table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationRule {
    pub kind: EventKind,
    pub keywords: &'static [&'static str],
}

impl ClassificationRule {
    /// Returns true if any keyword occurs in the (already lowercased) text.
    pub fn matches(&self, folded: &str) -> bool {
        self.keywords.iter().any(|keyword| folded.contains(keyword))
    }
}

pub const LECTURE_KEYWORDS: &[&str] = &["lecture", "class", "course"];
pub const WORKSHOP_KEYWORDS: &[&str] = &["workshop", "training", "hands-on", "lab"];
pub const SEMINAR_KEYWORDS: &[&str] = &["seminar", "presentation", "meeting", "talk"];

const LECTURE: ClassificationRule = ClassificationRule {
    kind: EventKind::Lecture,
    keywords: LECTURE_KEYWORDS,
};
const WORKSHOP: ClassificationRule = ClassificationRule {
    kind: EventKind::Workshop,
    keywords: WORKSHOP_KEYWORDS,
};
const SEMINAR: ClassificationRule = ClassificationRule {
    kind: EventKind::Seminar,
    keywords: SEMINAR_KEYWORDS,
};

/// Rule order for external calendar records.
pub const EXTERNAL_RULES: &[ClassificationRule] = &[LECTURE, WORKSHOP, SEMINAR];

/// Rule order for legacy calendar records.
pub const LEGACY_RULES: &[ClassificationRule] = &[LECTURE, SEMINAR, WORKSHOP];

/// An ordered keyword rule table with a fallback kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classifier {
    rules: &'static [ClassificationRule],
    default_kind: EventKind,
}

impl Classifier {
    pub const fn new(rules: &'static [ClassificationRule], default_kind: EventKind) -> Self {
        Self {
            rules,
            default_kind,
        }
    }

    /// External calendars: lecture, workshop, seminar; defaults to seminar.
    pub const fn external() -> Self {
        Self::new(EXTERNAL_RULES, EventKind::Seminar)
    }

    /// Legacy calendars: lecture, seminar, workshop; defaults to lecture.
    pub const fn legacy() -> Self {
        Self::new(LEGACY_RULES, EventKind::Lecture)
    }

    /// Replaces the fallback kind.
    pub fn with_default_kind(mut self, kind: EventKind) -> Self {
        self.default_kind = kind;
        self
    }

    pub fn default_kind(&self) -> EventKind {
        self.default_kind
    }

    pub fn rules(&self) -> &'static [ClassificationRule] {
        self.rules
    }

    /// Classifies arbitrary text.
    pub fn classify_text(&self, text: &str) -> EventKind {
        let folded = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&folded))
            .map_or(self.default_kind, |rule| rule.kind)
    }

    /// Classifies an event from its title and description.
    pub fn classify(&self, title: &str, description: &str) -> EventKind {
        self.classify_text(&format!("{} {}", title, description))
    }
}
