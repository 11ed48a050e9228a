//! Error types for record sources and normalization.
//!
//! Normalization never fails an import: a [`SourceError`] raised for one
//! record is logged by the adapter and that record is skipped.

use std::fmt;
use thiserror::Error;

/// The category of a source error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceErrorCode {
    /// A field holds a value that cannot be read as the expected type
    /// (e.g., a nested record where text is expected).
    InvalidField,
    /// The source is not connected or not authenticated.
    SourceUnavailable,
}

impl SourceErrorCode {
    /// Returns a human-readable name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidField => "invalid_field",
            Self::SourceUnavailable => "source_unavailable",
        }
    }
}

impl fmt::Display for SourceErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error raised while reading from a source or normalizing one of its records.
#[derive(Debug, Error)]
pub struct SourceError {
    code: SourceErrorCode,
    message: String,
    /// The source that produced the record (e.g., "Legacy Calendar System").
    source_name: Option<String>,
    #[source]
    cause: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SourceError {
    /// Creates a new source error with the given code and message.
    pub fn new(code: SourceErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source_name: None,
            cause: None,
        }
    }

    /// Creates an invalid field error naming the offending key.
    pub fn invalid_field(key: &str, message: impl Into<String>) -> Self {
        Self::new(
            SourceErrorCode::InvalidField,
            format!("field '{}': {}", key, message.into()),
        )
    }

    /// Creates a source unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::SourceUnavailable, message)
    }

    /// Sets the source name for this error.
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    /// Sets the underlying cause.
    pub fn with_cause<E>(mut self, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.cause = Some(Box::new(cause));
        self
    }

    pub fn code(&self) -> SourceErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref name) = self.source_name {
            write!(f, "[{}] ", name)?;
        }
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// A specialized Result type for source operations.
pub type SourceResult<T> = Result<T, SourceError>;
