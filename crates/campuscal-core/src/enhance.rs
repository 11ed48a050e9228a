//! Description enhancements.
//!
//! An [`Enhancement`] appends one line of extra information to an event's
//! description (streaming platform, recording availability). Enhancements
//! are applied in sequence with [`enhance`], which returns a new event and
//! leaves the base event untouched.

use serde::{Deserialize, Serialize};

use crate::event::CanonicalEvent;

/// A single description enhancement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Enhancement {
    /// The event is streamed online.
    Streaming {
        platform: String,
        url: Option<String>,
    },
    /// The event is recorded.
    Recording {
        available_after_event: bool,
        link: Option<String>,
    },
}

impl Enhancement {
    /// Creates a streaming enhancement.
    pub fn streaming(platform: impl Into<String>, url: Option<String>) -> Self {
        Self::Streaming {
            platform: platform.into(),
            url,
        }
    }

    /// Creates a recording enhancement.
    pub fn recording(available_after_event: bool, link: Option<String>) -> Self {
        Self::Recording {
            available_after_event,
            link,
        }
    }

    /// Returns the line this enhancement adds to a description.
    pub fn line(&self) -> String {
        match self {
            Self::Streaming { platform, url } => {
                format!("Streaming: {}{}", platform, link_suffix(url.as_deref()))
            }
            Self::Recording {
                available_after_event,
                link,
            } => {
                let availability = if *available_after_event {
                    "Available"
                } else {
                    "Not available"
                };
                format!("Recording: {}{}", availability, link_suffix(link.as_deref()))
            }
        }
    }

    /// Applies this enhancement to a description.
    pub fn apply(&self, description: &str) -> String {
        format!("{}\n{}", description, self.line())
    }
}

fn link_suffix(link: Option<&str>) -> String {
    match link {
        Some(link) if !link.is_empty() => format!(" ({})", link),
        _ => String::new(),
    }
}

/// Returns a copy of `event` with every enhancement applied to its description, in order.
pub fn enhance(event: &CanonicalEvent, enhancements: &[Enhancement]) -> CanonicalEvent {
    let description = enhancements
        .iter()
        .fold(event.description().to_string(), |acc, enhancement| {
            enhancement.apply(&acc)
        });
    event.with_replaced_description(description)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventDraft, EventKind};
    use chrono::NaiveDate;

    fn base_event() -> CanonicalEvent {
        EventDraft::new(
            "EVT-1",
            "Intro to Rust",
            NaiveDate::from_ymd_opt(2024, 12, 15).unwrap(),
        )
        .with_description("Ownership and borrowing")
        .with_location("Room 101")
        .with_capacity(40)
        .build(EventKind::Lecture)
    }

    #[test]
    fn streaming_line_with_url() {
        let enhancement = Enhancement::streaming("Zoom", Some("https://zoom.us/j/1".to_string()));
        assert_eq!(enhancement.line(), "Streaming: Zoom (https://zoom.us/j/1)");
    }

    #[test]
    fn streaming_line_ignores_empty_url() {
        let enhancement = Enhancement::streaming("Teams", Some(String::new()));
        assert_eq!(enhancement.line(), "Streaming: Teams");
    }

    #[test]
    fn recording_lines() {
        assert_eq!(
            Enhancement::recording(true, None).line(),
            "Recording: Available"
        );
        assert_eq!(
            Enhancement::recording(false, Some("https://media/1".to_string())).line(),
            "Recording: Not available (https://media/1)"
        );
    }

    #[test]
    fn applies_in_sequence_one_line_each() {
        let base = base_event();
        let enhanced = enhance(
            &base,
            &[
                Enhancement::streaming("Zoom", None),
                Enhancement::recording(true, None),
            ],
        );

        assert_eq!(
            enhanced.description(),
            "Ownership and borrowing\nStreaming: Zoom\nRecording: Available"
        );
        assert_eq!(enhanced.id(), base.id());
        assert_eq!(enhanced.kind(), EventKind::Lecture);
    }

    #[test]
    fn leaves_base_event_untouched() {
        let base = base_event();
        let _ = enhance(&base, &[Enhancement::recording(false, None)]);
        assert_eq!(base.description(), "Ownership and borrowing");
    }

    #[test]
    fn no_enhancements_is_identity() {
        let base = base_event();
        assert_eq!(enhance(&base, &[]), base);
    }
}
