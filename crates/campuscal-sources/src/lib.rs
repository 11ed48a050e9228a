//! Raw record sources and normalization adapters.
//!
//! This crate turns heterogeneous calendar records into canonical events:
//!
//! - [`RecordSource`] - The trait every raw record supplier implements
//! - [`RawRecord`] - Schema-less key/value record as delivered by a source
//! - [`SourceProfile`] - Per-family alias tables, defaults and rules
//! - [`RecordNormalizer`] - Pipeline converting one record into one event
//! - [`SourceAdapter`] - Availability checks, batch import and sync tracking
//! - [`SourceError`] - Error types for source operations
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐
//! │ External API    │    │ Legacy System   │
//! └────────┬────────┘    └────────┬────────┘
//!          │                      │
//!          │     RecordSource     │
//!          └──────────┬───────────┘
//!                     │ RawRecord
//!                     ▼
//!              ┌─────────────────┐
//!              │ CalendarAdapter │  external / legacy profile
//!              └──────┬──────────┘
//!                     │
//!                     ▼ RecordNormalizer
//!   resolve ─► date ─► capacity ─► classify ─► create_event
//!                     │
//!                     ▼
//!              ┌──────────────────┐
//!              │ CanonicalEvent   │
//!              └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use campuscal_sources::{CalendarAdapter, InMemorySource, SourceAdapter};
//!
//! let mut adapter = CalendarAdapter::external(InMemorySource::new(records), "primary");
//! for event in adapter.import_events() {
//!     println!("{}", event.details());
//! }
//! ```

pub mod adapter;
pub mod capacity;
pub mod classify;
pub mod date;
pub mod error;
pub mod normalize;
pub mod profile;
pub mod raw_record;
pub mod resolve;
pub mod source;

// Re-export main types at crate root
pub use adapter::{CalendarAdapter, LEGACY_SOURCE_NAME, SourceAdapter, external_source_name};
pub use capacity::{CapacityRules, CapacitySignal};
pub use classify::{ClassificationRule, Classifier};
pub use date::{DateNormalizer, DateRules};
pub use error::{SourceError, SourceErrorCode, SourceResult};
pub use normalize::RecordNormalizer;
pub use profile::{SourceFamily, SourceProfile, TextField};
pub use raw_record::RawRecord;
pub use resolve::{resolve, resolve_text, resolve_text_or};
pub use source::{InMemorySource, RecordSource};
