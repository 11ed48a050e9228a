//! RawRecord to CanonicalEvent conversion pipeline.
//!
//! This module turns one heterogeneous [`RawRecord`] into one
//! [`CanonicalEvent`] using the tables of a [`SourceProfile`].
//!
//! The normalization process:
//! 1. Resolves the id and prepends the source prefix (or generates an id)
//! 2. Resolves title, description and location through their alias lists
//! 3. Normalizes the date, falling back to tomorrow
//! 4. Estimates the capacity
//! 5. Classifies the kind (from the type hint if the source has one)
//! 6. Builds the event through the factory

use campuscal_core::{CanonicalEvent, EventDraft, EventKind};
use chrono::NaiveDate;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::capacity;
use crate::date::DateNormalizer;
use crate::error::SourceResult;
use crate::profile::SourceProfile;
use crate::raw_record::RawRecord;
use crate::resolve::{resolve_text, resolve_text_or};

/// Normalizes records of one source family.
#[derive(Debug, Clone)]
pub struct RecordNormalizer {
    profile: SourceProfile,
    dates: DateNormalizer,
}

impl RecordNormalizer {
    /// Creates a normalizer whose date fallback follows the local current date.
    pub fn new(profile: SourceProfile) -> Self {
        Self {
            profile,
            dates: DateNormalizer::local(),
        }
    }

    /// Builder method to pin the reference date used for the date fallback.
    pub fn with_reference_date(mut self, today: NaiveDate) -> Self {
        self.dates = DateNormalizer::new(today);
        self
    }

    /// Builder method to replace the date normalizer.
    pub fn with_dates(mut self, dates: DateNormalizer) -> Self {
        self.dates = dates;
        self
    }

    pub fn profile(&self) -> &SourceProfile {
        &self.profile
    }

    /// Converts a single record.
    ///
    /// Missing attributes are defaulted. The only failure is a text attribute
    /// holding a nested record or list.
    pub fn normalize_record(&self, record: &RawRecord) -> SourceResult<CanonicalEvent> {
        let profile = &self.profile;

        let id = self.resolve_id(record)?;
        let title = resolve_text_or(record, profile.title.keys, profile.title.default)?;
        let description =
            resolve_text_or(record, profile.description.keys, profile.description.default)?;
        let location = resolve_text_or(record, profile.location.keys, profile.location.default)?;
        let date = self.dates.normalize(record, &profile.dates);
        let capacity = capacity::estimate(record, &description, &profile.capacity);
        let kind = self.classify(record, &title, &description)?;

        let event = EventDraft::new(id, title, date)
            .with_description(description)
            .with_location(location)
            .with_capacity(capacity)
            .build(kind);

        debug!(
            event_id = %event.id(),
            kind = %event.kind(),
            date = %event.date(),
            source = %profile.family,
            "Normalized record"
        );
        Ok(event)
    }

    /// Converts every record, skipping the ones that fail.
    pub fn normalize_records(&self, records: &[RawRecord]) -> Vec<CanonicalEvent> {
        records
            .iter()
            .filter_map(|record| match self.normalize_record(record) {
                Ok(event) => Some(event),
                Err(e) => {
                    warn!(source = %self.profile.family, error = %e, "Skipping record");
                    None
                }
            })
            .collect()
    }

    fn resolve_id(&self, record: &RawRecord) -> SourceResult<String> {
        let prefix = &self.profile.id_prefix;
        let id = match resolve_text(record, self.profile.id_keys)? {
            Some(id) if !id.trim().is_empty() => format!("{}{}", prefix, id),
            _ => {
                let generated = format!("{}{}", prefix, Uuid::new_v4().simple());
                debug!(event_id = %generated, "Record has no id, generated one");
                generated
            }
        };
        Ok(id)
    }

    fn classify(
        &self,
        record: &RawRecord,
        title: &str,
        description: &str,
    ) -> SourceResult<EventKind> {
        let classifier = &self.profile.classifier;
        Ok(match resolve_text(record, self.profile.type_hint_keys)? {
            Some(hint) => classifier.classify_text(&hint),
            None => classifier.classify(title, description),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceErrorCode;
    use serde_json::{Value, json};
    use std::sync::atomic::{AtomicU32, Ordering};

    fn reference_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 1).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn external() -> RecordNormalizer {
        RecordNormalizer::new(SourceProfile::external()).with_reference_date(reference_date())
    }

    fn legacy() -> RecordNormalizer {
        RecordNormalizer::new(SourceProfile::legacy()).with_reference_date(reference_date())
    }

    fn record(value: Value) -> RawRecord {
        RawRecord::from_json(value).unwrap()
    }

    mod external_records {
        use super::*;

        #[test]
        fn course_with_capacity_marker() {
            let event = external()
                .normalize_record(&record(json!({
                    "id": "ext_event_1",
                    "summary": "Advanced Database Systems",
                    "description": "Graduate level course on distributed databases and NoSQL systems. Capacity: 45",
                    "location": "Engineering Building Room 301",
                    "start": {
                        "dateTime": "2024-12-18T10:00:00-05:00",
                        "timeZone": "America/New_York"
                    },
                    "attendees": [{"email": "grad1@university.edu"}]
                })))
                .unwrap();

            assert_eq!(event.id(), "EXT_ext_event_1");
            assert_eq!(event.title(), "Advanced Database Systems");
            assert_eq!(event.location(), "Engineering Building Room 301");
            assert_eq!(event.date(), date(2024, 12, 18));
            assert_eq!(event.capacity(), 45);
            assert_eq!(event.kind(), EventKind::Lecture);
        }

        #[test]
        fn workshop_with_attendees() {
            let attendees: Vec<Value> = (1..=20)
                .map(|i| json!({"email": format!("researcher{i}@university.edu")}))
                .collect();
            let event = external()
                .normalize_record(&record(json!({
                    "id": "ext_event_2",
                    "summary": "Research Methods Workshop - Data Analysis",
                    "description": "Hands-on workshop for graduate students on statistical analysis methods",
                    "location": "Statistics Lab Building",
                    "start": {"date": "2024-12-22"},
                    "attendees": attendees
                })))
                .unwrap();

            assert_eq!(event.date(), date(2024, 12, 22));
            assert_eq!(event.capacity(), 40);
            assert_eq!(event.kind(), EventKind::Workshop);
        }

        #[test]
        fn alternate_keys_and_max_marker() {
            let event = external()
                .normalize_record(&record(json!({
                    "id": "ext_event_4",
                    "title": "Career Fair - Tech Companies",
                    "details": "Meet with representatives from major tech companies. Max: 500 students",
                    "venue": "Student Center",
                    "date": "2024-12-28"
                })))
                .unwrap();

            assert_eq!(event.title(), "Career Fair - Tech Companies");
            assert_eq!(event.location(), "Student Center");
            assert_eq!(event.date(), date(2024, 12, 28));
            assert_eq!(event.capacity(), 500);
            assert_eq!(event.kind(), EventKind::Seminar);
        }

        #[test]
        fn empty_record_gets_every_default() {
            let event = external().normalize_record(&RawRecord::new()).unwrap();

            assert!(event.id().starts_with("EXT_"));
            assert!(event.id().len() > "EXT_".len());
            assert_eq!(event.title(), "Untitled Event");
            assert_eq!(event.description(), "No description available");
            assert_eq!(event.location(), "Online");
            assert_eq!(event.date(), date(2024, 12, 2));
            assert_eq!(event.capacity(), 30);
            assert_eq!(event.kind(), EventKind::Seminar);
        }

        #[test]
        fn generated_ids_are_unique() {
            let normalizer = external();
            let a = normalizer.normalize_record(&RawRecord::new()).unwrap();
            let b = normalizer.normalize_record(&RawRecord::new()).unwrap();
            assert_ne!(a.id(), b.id());
        }
    }

    mod legacy_records {
        use super::*;

        #[test]
        fn legacy_id_and_slash_date() {
            let event = legacy()
                .normalize_record(&record(json!({
                    "legacy_id": "LEG001",
                    "event_name": "Introduction to Computer Science",
                    "desc": "Basic concepts of programming and algorithms",
                    "event_date": "12/15/2024",
                    "venue": "Room 101",
                    "max_attendees": "80",
                    "type": "lecture"
                })))
                .unwrap();

            assert_eq!(event.id(), "LEGACY_LEG001");
            assert_eq!(event.description(), "Basic concepts of programming and algorithms");
            assert_eq!(event.date(), date(2024, 12, 15));
            assert_eq!(event.location(), "Room 101");
            assert_eq!(event.capacity(), 80);
            assert_eq!(event.kind(), EventKind::Lecture);
        }

        #[test]
        fn category_hint_and_iso_date() {
            let event = legacy()
                .normalize_record(&record(json!({
                    "id": "LEG002",
                    "name": "Data Structures Workshop",
                    "details": "Hands-on practice with arrays, lists, and trees",
                    "scheduled_date": "2024-12-20",
                    "place": "Computer Lab A",
                    "capacity": "25",
                    "category": "workshop"
                })))
                .unwrap();

            assert_eq!(event.id(), "LEGACY_LEG002");
            assert_eq!(event.title(), "Data Structures Workshop");
            assert_eq!(event.date(), date(2024, 12, 20));
            assert_eq!(event.capacity(), 25);
            assert_eq!(event.kind(), EventKind::Workshop);
        }

        #[test]
        fn day_first_dash_date() {
            let event = legacy()
                .normalize_record(&record(json!({
                    "event_id": "LEG003",
                    "title": "Software Engineering Seminar",
                    "date": "20-12-2024",
                    "limit": "150",
                    "kind": "seminar"
                })))
                .unwrap();

            assert_eq!(event.id(), "LEGACY_LEG003");
            assert_eq!(event.date(), date(2024, 12, 20));
            assert_eq!(event.capacity(), 150);
            assert_eq!(event.kind(), EventKind::Seminar);
        }

        #[test]
        fn hint_overrides_text() {
            let event = legacy()
                .normalize_record(&record(json!({
                    "id": "1",
                    "title": "Hands-on workshop",
                    "type": "talk"
                })))
                .unwrap();
            assert_eq!(event.kind(), EventKind::Seminar);
        }

        #[test]
        fn unknown_hint_uses_default_kind() {
            let event = legacy()
                .normalize_record(&record(json!({
                    "id": "1",
                    "title": "Workshop",
                    "type": "social"
                })))
                .unwrap();
            assert_eq!(event.kind(), EventKind::Lecture);
        }

        #[test]
        fn text_classified_without_hint() {
            let event = legacy()
                .normalize_record(&record(json!({"id": "1", "title": "Thesis presentation day"})))
                .unwrap();
            assert_eq!(event.kind(), EventKind::Seminar);
        }

        #[test]
        fn bad_capacity_uses_default() {
            let event = legacy()
                .normalize_record(&record(json!({"id": "1", "max_attendees": "eighty"})))
                .unwrap();
            assert_eq!(event.capacity(), 50);
            assert_eq!(event.location(), "TBD");
        }

        #[test]
        fn numeric_id_is_prefixed() {
            let event = legacy()
                .normalize_record(&record(json!({"event_id": 7})))
                .unwrap();
            assert_eq!(event.id(), "LEGACY_7");
        }
    }

    #[test]
    fn every_alias_resolves_to_its_literal_value() {
        for normalizer in [external(), legacy()] {
            let profile = normalizer.profile();
            let family = profile.family;

            for key in profile.id_keys {
                let event = normalizer
                    .normalize_record(&RawRecord::new().with(*key, "literal"))
                    .unwrap();
                assert_eq!(event.id(), format!("{}literal", profile.id_prefix), "{family} {key}");
            }

            let text_fields: [(_, fn(&CanonicalEvent) -> &str); 3] = [
                (&profile.title, CanonicalEvent::title),
                (&profile.description, CanonicalEvent::description),
                (&profile.location, CanonicalEvent::location),
            ];
            for (field, read) in text_fields {
                for key in field.keys {
                    let value = format!("literal {key}");
                    let event = normalizer
                        .normalize_record(&RawRecord::new().with(*key, value.as_str()))
                        .unwrap();
                    assert_eq!(read(&event), value, "{family} {key}");
                }
            }

            for key in profile.capacity.fields {
                let event = normalizer
                    .normalize_record(&RawRecord::new().with(*key, "77"))
                    .unwrap();
                assert_eq!(event.capacity(), 77, "{family} {key}");
            }
        }
    }

    #[test]
    fn unpinned_normalizer_reads_clock_per_record() {
        static DAY: AtomicU32 = AtomicU32::new(1);
        fn clock() -> NaiveDate {
            NaiveDate::from_ymd_opt(2025, 3, DAY.load(Ordering::SeqCst)).unwrap()
        }

        let normalizer = RecordNormalizer::new(SourceProfile::legacy())
            .with_dates(DateNormalizer::with_clock(clock));
        DAY.store(3, Ordering::SeqCst);
        let event = normalizer.normalize_record(&RawRecord::new()).unwrap();
        assert_eq!(event.date(), date(2025, 3, 4));
    }

    #[test]
    fn legacy_workshop_details() {
        let event = legacy()
            .normalize_record(&record(json!({
                "legacy_id": "LEG002",
                "event_name": "Advanced Machine Learning Workshop",
                "desc": "Hands-on workshop covering neural networks",
                "event_date": "2024-12-20",
                "venue": "Lab 205",
                "max_attendees": "30",
                "type": "workshop"
            })))
            .unwrap();

        insta::assert_snapshot!(event.details().trim_end(), @r"
        Workshop Event ID: LEGACY_LEG002
        Title: Advanced Machine Learning Workshop
        Description: Hands-on workshop covering neural networks
        Date: 2024-12-20
        Location: Lab 205
        Capacity: 30
        ");
    }

    mod failures {
        use super::*;

        #[test]
        fn nested_title_is_rejected() {
            let err = external()
                .normalize_record(&record(json!({"id": "1", "summary": {"text": "x"}})))
                .unwrap_err();
            assert_eq!(err.code(), SourceErrorCode::InvalidField);
        }

        #[test]
        fn batch_skips_bad_records() {
            let records = vec![
                record(json!({"id": "good_1", "summary": "Intro lecture"})),
                record(json!({"id": "bad", "location": ["Room 1", "Room 2"]})),
                record(json!({"id": "good_2", "summary": "Lab session"})),
            ];

            let events = external().normalize_records(&records);
            let ids: Vec<&str> = events.iter().map(|e| e.id()).collect();
            assert_eq!(ids, vec!["EXT_good_1", "EXT_good_2"]);
        }
    }

    #[test]
    fn profile_overrides_apply() {
        let normalizer = RecordNormalizer::new(
            SourceProfile::external()
                .with_id_prefix("PARTNER_")
                .with_default_capacity(12)
                .with_default_kind(EventKind::Workshop),
        )
        .with_reference_date(reference_date());

        let event = normalizer
            .normalize_record(&record(json!({"id": "9", "summary": "Open house"})))
            .unwrap();
        assert_eq!(event.id(), "PARTNER_9");
        assert_eq!(event.capacity(), 12);
        assert_eq!(event.kind(), EventKind::Workshop);
    }
}
