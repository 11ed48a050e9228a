//! RecordSource trait definition.
//!
//! This module defines the [`RecordSource`] trait, the seam between source
//! adapters and whatever actually holds the raw calendar data.
//!
//! Sources are responsible for:
//! - Handing out raw records, all at once or for a date range
//! - Reporting connection and authentication state
//! - Describing themselves through a metadata map

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::raw_record::RawRecord;

/// A supplier of raw calendar records.
///
/// Every method is a cheap synchronous call: sources are in-process stand-ins
/// and never block on I/O. Adapters check [`is_connected`](Self::is_connected)
/// and [`is_authenticated`](Self::is_authenticated) on every import, so
/// implementations should report live state rather than a cached value.
pub trait RecordSource: Send + Sync {
    /// Returns every record the source holds.
    fn raw_records(&self) -> Vec<RawRecord>;

    /// Returns the records for an inclusive date range.
    ///
    /// Sources may over-deliver; adapters filter normalized events by date.
    fn records_in_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<RawRecord>;

    fn is_connected(&self) -> bool;

    fn is_authenticated(&self) -> bool;

    /// Returns descriptive metadata (name, version, vendor, capabilities).
    fn metadata(&self) -> BTreeMap<String, String>;
}

/// A source backed by a list of records held in memory.
///
/// Starts connected and authenticated. The range query returns every record
/// since raw records carry no parsed date.
#[derive(Debug, Clone)]
pub struct InMemorySource {
    records: Vec<RawRecord>,
    connected: bool,
    authenticated: bool,
    metadata: BTreeMap<String, String>,
}

impl Default for InMemorySource {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl InMemorySource {
    /// Creates a connected, authenticated source with the given records.
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self {
            records,
            connected: true,
            authenticated: true,
            metadata: BTreeMap::new(),
        }
    }

    /// Builder method to add a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Builder method to set the connection state.
    pub fn with_connected(mut self, connected: bool) -> Self {
        self.connected = connected;
        self
    }

    /// Builder method to set the authentication state.
    pub fn with_authenticated(mut self, authenticated: bool) -> Self {
        self.authenticated = authenticated;
        self
    }

    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    pub fn set_authenticated(&mut self, authenticated: bool) {
        self.authenticated = authenticated;
    }

    pub fn push(&mut self, record: RawRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordSource for InMemorySource {
    fn raw_records(&self) -> Vec<RawRecord> {
        self.records.clone()
    }

    fn records_in_range(&self, _start: NaiveDate, _end: NaiveDate) -> Vec<RawRecord> {
        self.raw_records()
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    fn metadata(&self) -> BTreeMap<String, String> {
        self.metadata.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> InMemorySource {
        InMemorySource::new(vec![
            RawRecord::new().with("id", "1"),
            RawRecord::new().with("id", "2"),
        ])
    }

    #[test]
    fn starts_available() {
        let source = sample();
        assert!(source.is_connected());
        assert!(source.is_authenticated());
        assert_eq!(source.len(), 2);
    }

    #[test]
    fn connection_state_is_live() {
        let mut source = sample().with_authenticated(false);
        assert!(!source.is_authenticated());

        source.set_connected(false);
        assert!(!source.is_connected());
        source.set_connected(true);
        source.set_authenticated(true);
        assert!(source.is_connected() && source.is_authenticated());
    }

    #[test]
    fn range_query_returns_everything() {
        let source = sample();
        let start = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(source.records_in_range(start, end), source.raw_records());
    }

    #[test]
    fn metadata_builder() {
        let source = InMemorySource::default()
            .with_metadata("name", "Legacy Campus Calendar v1.0")
            .with_metadata("capabilities", "read-only");

        assert!(source.is_empty());
        let metadata = source.metadata();
        assert_eq!(metadata.len(), 2);
        assert_eq!(
            metadata.get("name").map(String::as_str),
            Some("Legacy Campus Calendar v1.0")
        );
    }

    #[test]
    fn push_appends() {
        let mut source = InMemorySource::default();
        source.push(RawRecord::new().with("id", "3"));
        assert_eq!(source.raw_records().len(), 1);
    }
}
