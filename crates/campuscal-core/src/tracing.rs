//! Logging setup for the campuscal crates.
//!
//! Each crate logs under its own target, so verbosity can be tuned per
//! concern: `campuscal_sources` for record normalization and adapter
//! availability, `campuscal_registry` for registrations and imports.
//!
//! ```ignore
//! use campuscal_core::tracing::{init_tracing, LogLevel, TracingConfig};
//!
//! // Show every skipped record while keeping registry logs quiet.
//! init_tracing(
//!     TracingConfig::default()
//!         .with_crate_level("campuscal_sources", LogLevel::Debug)
//!         .with_crate_level("campuscal_registry", LogLevel::Warn),
//! )?;
//! ```
//!
//! `RUST_LOG` wins over the configured levels when set.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    prelude::*,
};

/// Log targets of the campuscal crates.
pub const CAMPUSCAL_TARGETS: [&str; 3] =
    ["campuscal_core", "campuscal_sources", "campuscal_registry"];

#[derive(Debug, Error)]
pub enum TracingError {
    #[error("failed to set global tracing subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    #[error("failed to parse env filter: {0}")]
    EnvFilter(#[from] tracing_subscriber::filter::ParseError),
}

/// Verbosity of a log target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_level(self) -> Level {
        match self {
            Self::Error => Level::ERROR,
            Self::Warn => Level::WARN,
            Self::Info => Level::INFO,
            Self::Debug => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TracingOutputFormat {
    /// Multi-line human-readable output
    #[default]
    Pretty,
    /// Single-line output
    Compact,
    /// Structured output for long-running importers
    Json,
}

/// Configuration for tracing initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// Level for every campuscal crate without an override.
    pub level: LogLevel,
    /// Per-crate overrides, keyed by log target.
    pub crate_levels: Vec<(String, LogLevel)>,
    pub output_format: TracingOutputFormat,
    /// Include file and line of each event.
    pub include_location: bool,
    /// Log entering and closing of import spans.
    pub include_span_events: bool,
    /// Raw filter directive, replacing the computed one.
    pub env_filter: Option<String>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            crate_levels: Vec::new(),
            output_format: TracingOutputFormat::Pretty,
            include_location: false,
            include_span_events: false,
            env_filter: None,
        }
    }
}

impl TracingConfig {
    /// Compact output with source normalization at debug level, for
    /// following a single import by hand.
    #[must_use]
    pub fn import_debug() -> Self {
        Self {
            output_format: TracingOutputFormat::Compact,
            include_location: true,
            ..Self::default()
        }
        .with_crate_level("campuscal_sources", LogLevel::Debug)
    }

    /// JSON output with import spans, for scheduled imports.
    #[must_use]
    pub fn service() -> Self {
        Self {
            output_format: TracingOutputFormat::Json,
            include_span_events: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Overrides the level of one target, replacing an earlier override.
    #[must_use]
    pub fn with_crate_level(mut self, target: impl Into<String>, level: LogLevel) -> Self {
        let target = target.into();
        self.crate_levels.retain(|(existing, _)| *existing != target);
        self.crate_levels.push((target, level));
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: TracingOutputFormat) -> Self {
        self.output_format = format;
        self
    }

    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// The level in effect for `target`.
    pub fn level_for(&self, target: &str) -> LogLevel {
        self.crate_levels
            .iter()
            .find(|(existing, _)| existing == target)
            .map(|(_, level)| *level)
            .unwrap_or(self.level)
    }

    /// Filter directive covering every campuscal crate and any extra override.
    pub fn directives(&self) -> String {
        let extra = self
            .crate_levels
            .iter()
            .map(|(target, _)| target.as_str())
            .filter(|target| !CAMPUSCAL_TARGETS.contains(target));

        CAMPUSCAL_TARGETS
            .into_iter()
            .chain(extra)
            .map(|target| format!("{}={}", target, self.level_for(target).as_str()))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Builds the filter: `env_filter` if set, else `RUST_LOG`, else [`Self::directives`].
    pub fn build_filter(&self) -> Result<EnvFilter, TracingError> {
        if let Some(filter) = &self.env_filter {
            return Ok(EnvFilter::try_new(filter)?);
        }
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => Ok(EnvFilter::try_new(self.directives())?),
        }
    }
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Fails if a global subscriber is already set or the filter directive is
/// invalid.
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    let env_filter = config.build_filter()?;

    let span_events = if config.include_span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let layer = fmt::layer()
        .with_file(config.include_location)
        .with_line_number(config.include_location)
        .with_span_events(span_events);

    let layer = match config.output_format {
        TracingOutputFormat::Pretty => layer.pretty().boxed(),
        TracingOutputFormat::Compact => layer.compact().boxed(),
        TracingOutputFormat::Json => layer.json().boxed(),
    };

    let subscriber = tracing_subscriber::registry().with(env_filter).with(layer);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
