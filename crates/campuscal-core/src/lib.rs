//! Core types: canonical events, users, sorting, search, tracing

pub mod enhance;
pub mod event;
pub mod search;
pub mod sort;
pub mod tracing;
pub mod user;

pub use enhance::{Enhancement, enhance};
pub use event::{CanonicalEvent, EventDraft, EventKind, create_event};
pub use search::SearchCriteria;
pub use sort::{SortByDate, SortByTitle, SortKey, SortStrategy};
pub use crate::tracing::{
    CAMPUSCAL_TARGETS, LogLevel, TracingConfig, TracingError, TracingOutputFormat, init_tracing,
};
pub use user::{Organizer, Student, User, UserProfile};
