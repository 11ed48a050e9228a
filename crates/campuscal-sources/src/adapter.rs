//! Source adapters.
//!
//! A [`SourceAdapter`] pulls raw records from a [`RecordSource`], runs each
//! one through a [`RecordNormalizer`], and hands back canonical events. An
//! unavailable source yields an empty import instead of an error, and a record
//! that fails to normalize is skipped without aborting the batch.
//!
//! [`CalendarAdapter`] is the single implementation; the source family is
//! selected through its [`SourceProfile`]:
//!
//! ```ignore
//! let mut adapter = CalendarAdapter::legacy(InMemorySource::new(records));
//! let events = adapter.import_events();
//! ```

use std::collections::BTreeMap;

use campuscal_core::CanonicalEvent;
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info};

use crate::error::{SourceError, SourceResult};
use crate::normalize::RecordNormalizer;
use crate::profile::{SourceFamily, SourceProfile};
use crate::source::RecordSource;

/// Name reported by adapters over legacy sources.
pub const LEGACY_SOURCE_NAME: &str = "Legacy Calendar System";

/// Turns one source's raw records into canonical events.
///
/// The `try_*` methods report an unavailable source as
/// [`SourceErrorCode::SourceUnavailable`](crate::SourceErrorCode::SourceUnavailable);
/// the plain methods degrade that to an empty result.
pub trait SourceAdapter: Send {
    /// Returns a human-readable name for the source.
    fn source_name(&self) -> &str;

    /// Checks the source's current state. Not cached.
    fn is_source_available(&self) -> bool;

    /// Returns when the last full import succeeded, if ever.
    fn last_sync_time(&self) -> Option<DateTime<Utc>>;

    /// Returns the source's descriptive metadata.
    fn source_metadata(&self) -> BTreeMap<String, String>;

    /// Imports every record, updating the last sync time on success.
    fn try_import_events(&mut self) -> SourceResult<Vec<CanonicalEvent>>;

    /// Imports the records dated within `[start, end]`.
    ///
    /// Does not touch the last sync time.
    fn try_import_events_in_range(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> SourceResult<Vec<CanonicalEvent>>;

    /// Imports every record, or nothing if the source is unavailable.
    fn import_events(&mut self) -> Vec<CanonicalEvent> {
        match self.try_import_events() {
            Ok(events) => events,
            Err(e) => {
                info!(source = %self.source_name(), error = %e, "Nothing imported");
                Vec::new()
            }
        }
    }

    /// Imports the records dated within `[start, end]`, or nothing if the source is unavailable.
    fn import_events_in_range(&mut self, start: NaiveDate, end: NaiveDate) -> Vec<CanonicalEvent> {
        match self.try_import_events_in_range(start, end) {
            Ok(events) => events,
            Err(e) => {
                info!(source = %self.source_name(), error = %e, "Nothing imported for range");
                Vec::new()
            }
        }
    }

    /// Runs a full import and returns the number of events produced.
    fn sync_events(&mut self) -> usize {
        self.import_events().len()
    }
}

/// Adapts a [`RecordSource`] of either family.
#[derive(Debug)]
pub struct CalendarAdapter<S> {
    source: S,
    name: String,
    normalizer: RecordNormalizer,
    last_sync: Option<DateTime<Utc>>,
}

impl<S: RecordSource> CalendarAdapter<S> {
    /// Creates an adapter over an external calendar.
    pub fn external(source: S, calendar_id: &str) -> Self {
        Self::with_profile(source, SourceProfile::external(), external_source_name(calendar_id))
    }

    /// Creates an adapter over a legacy calendar.
    pub fn legacy(source: S) -> Self {
        Self::with_profile(source, SourceProfile::legacy(), LEGACY_SOURCE_NAME)
    }

    /// Creates an adapter with a custom profile.
    pub fn with_profile(source: S, profile: SourceProfile, name: impl Into<String>) -> Self {
        Self {
            source,
            name: name.into(),
            normalizer: RecordNormalizer::new(profile),
            last_sync: None,
        }
    }

    /// Builder method to pin the reference date used for the date fallback.
    pub fn with_reference_date(mut self, today: NaiveDate) -> Self {
        self.normalizer = self.normalizer.with_reference_date(today);
        self
    }

    pub fn family(&self) -> SourceFamily {
        self.normalizer.profile().family
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    fn ensure_available(&self) -> SourceResult<()> {
        let reason = if !self.source.is_connected() {
            "source is not connected"
        } else if self.family().requires_authentication() && !self.source.is_authenticated() {
            "source is not authenticated"
        } else {
            return Ok(());
        };
        Err(SourceError::unavailable(reason).with_source_name(&self.name))
    }
}

impl<S: RecordSource> SourceAdapter for CalendarAdapter<S> {
    fn source_name(&self) -> &str {
        &self.name
    }

    fn is_source_available(&self) -> bool {
        self.ensure_available().is_ok()
    }

    fn last_sync_time(&self) -> Option<DateTime<Utc>> {
        self.last_sync
    }

    fn source_metadata(&self) -> BTreeMap<String, String> {
        self.source.metadata()
    }

    fn try_import_events(&mut self) -> SourceResult<Vec<CanonicalEvent>> {
        self.ensure_available()?;

        let records = self.source.raw_records();
        let events = self.normalizer.normalize_records(&records);
        self.last_sync = Some(Utc::now());

        info!(
            source = %self.name,
            records = records.len(),
            count = events.len(),
            "Imported events"
        );
        Ok(events)
    }

    fn try_import_events_in_range(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> SourceResult<Vec<CanonicalEvent>> {
        self.ensure_available()?;

        let records = self.source.records_in_range(start, end);
        let normalized = self.normalizer.normalize_records(&records);
        let total = normalized.len();
        let events = within_range(normalized, start, end);

        debug!(
            source = %self.name,
            dropped = total - events.len(),
            "Dropped events outside the requested range"
        );
        info!(
            source = %self.name,
            %start,
            %end,
            count = events.len(),
            "Imported events for range"
        );
        Ok(events)
    }
}

/// Name reported by adapters over external calendars.
pub fn external_source_name(calendar_id: &str) -> String {
    format!("External Calendar System ({})", calendar_id)
}

/// Keeps the events dated within `[start, end]`. An inverted range keeps nothing.
pub fn within_range(
    events: Vec<CanonicalEvent>,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<CanonicalEvent> {
    events
        .into_iter()
        .filter(|event| (start..=end).contains(&event.date()))
        .collect()
}
