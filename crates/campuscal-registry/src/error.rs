//! Registry error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Reasons a registry operation was refused.
///
/// None of these are fatal. The boolean registry operations collapse them to
/// `false`; the `try_*` variants return them for callers that want the cause.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The event has an empty id.
    #[error("Event has no id")]
    MissingEventId,

    /// The user has an empty id.
    #[error("User has no id")]
    MissingUserId,

    /// No user with this id is registered.
    #[error("Unknown user: {user_id}")]
    UnknownUser { user_id: String },

    /// No event with this id is stored.
    #[error("Unknown event: {event_id}")]
    UnknownEvent { event_id: String },

    /// The registration edge already exists.
    #[error("User {user_id} is already registered for event {event_id}")]
    AlreadyRegistered { user_id: String, event_id: String },

    /// The registration edge does not exist.
    #[error("User {user_id} is not registered for event {event_id}")]
    NotRegistered { user_id: String, event_id: String },

    /// The user exists but is not an organizer.
    #[error("User {user_id} is not an organizer")]
    NotAnOrganizer { user_id: String },
}

impl RegistryError {
    /// Creates an unknown user error.
    pub fn unknown_user(user_id: impl Into<String>) -> Self {
        Self::UnknownUser {
            user_id: user_id.into(),
        }
    }

    /// Creates an unknown event error.
    pub fn unknown_event(event_id: impl Into<String>) -> Self {
        Self::UnknownEvent {
            event_id: event_id.into(),
        }
    }

    /// Creates an already registered error.
    pub fn already_registered(user_id: impl Into<String>, event_id: impl Into<String>) -> Self {
        Self::AlreadyRegistered {
            user_id: user_id.into(),
            event_id: event_id.into(),
        }
    }

    /// Creates a not registered error.
    pub fn not_registered(user_id: impl Into<String>, event_id: impl Into<String>) -> Self {
        Self::NotRegistered {
            user_id: user_id.into(),
            event_id: event_id.into(),
        }
    }

    /// Creates a not an organizer error.
    pub fn not_an_organizer(user_id: impl Into<String>) -> Self {
        Self::NotAnOrganizer {
            user_id: user_id.into(),
        }
    }

    /// Returns true for the "no such user or event" cases.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UnknownUser { .. } | Self::UnknownEvent { .. })
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The TOML could not be parsed.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
