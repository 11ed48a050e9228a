//! Campus calendar configuration.
//!
//! All settings live in a single TOML file. Every section and key is
//! optional:
//!
//! ```toml
//! [registry]
//! default_sort = "date"      # or "title"
//!
//! [external]
//! calendar_id = "primary"
//! default_capacity = 30
//! id_prefix = "EXT_"
//! default_kind = "seminar"
//!
//! [legacy]
//! default_capacity = 50
//! id_prefix = "LEGACY_"
//! default_kind = "lecture"
//!
//! [logging]
//! level = "info"
//! format = "pretty"          # "compact" or "json"
//! sources = "debug"          # optional, campuscal_sources only
//! registry = "warn"          # optional, campuscal_registry only
//! ```

use std::path::Path;

use campuscal_core::{EventKind, LogLevel, SortKey, TracingConfig, TracingOutputFormat};
use campuscal_sources::{
    CalendarAdapter, LEGACY_SOURCE_NAME, RecordSource, SourceProfile, external_source_name,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::registry::EventRegistry;

// ---------------------------------------------------------------------------
// CampusConfig (config.toml)
// ---------------------------------------------------------------------------

/// Configuration for the campus calendar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampusConfig {
    /// Registry settings.
    pub registry: RegistrySettings,

    /// External calendar settings.
    pub external: ExternalSettings,

    /// Legacy calendar settings.
    pub legacy: LegacySettings,

    /// Logging settings.
    pub logging: LoggingSettings,
}

/// Registry settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySettings {
    /// Listing order used until changed at runtime.
    pub default_sort: SortKey,
}

/// External calendar settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalSettings {
    /// Calendar to read, shown in the source name.
    pub calendar_id: String,

    /// Capacity for records with no capacity signal.
    pub default_capacity: i32,

    /// Prefix prepended to every imported id.
    pub id_prefix: String,

    /// Kind for records matching no keyword.
    pub default_kind: EventKind,
}

impl Default for ExternalSettings {
    fn default() -> Self {
        let profile = SourceProfile::external();
        Self {
            calendar_id: "primary".to_string(),
            default_capacity: profile.capacity.default,
            id_prefix: profile.id_prefix,
            default_kind: profile.classifier.default_kind(),
        }
    }
}

impl ExternalSettings {
    /// Builds the source profile for these settings.
    pub fn profile(&self) -> SourceProfile {
        SourceProfile::external()
            .with_default_capacity(self.default_capacity)
            .with_id_prefix(&self.id_prefix)
            .with_default_kind(self.default_kind)
    }

    /// Builds an adapter over `source`.
    pub fn adapter<S: RecordSource>(&self, source: S) -> CalendarAdapter<S> {
        CalendarAdapter::with_profile(
            source,
            self.profile(),
            external_source_name(&self.calendar_id),
        )
    }
}

/// Legacy calendar settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacySettings {
    /// Capacity for records with no capacity field.
    pub default_capacity: i32,

    /// Prefix prepended to every imported id.
    pub id_prefix: String,

    /// Kind for records matching no keyword.
    pub default_kind: EventKind,
}

impl Default for LegacySettings {
    fn default() -> Self {
        let profile = SourceProfile::legacy();
        Self {
            default_capacity: profile.capacity.default,
            id_prefix: profile.id_prefix,
            default_kind: profile.classifier.default_kind(),
        }
    }
}

impl LegacySettings {
    /// Builds the source profile for these settings.
    pub fn profile(&self) -> SourceProfile {
        SourceProfile::legacy()
            .with_default_capacity(self.default_capacity)
            .with_id_prefix(&self.id_prefix)
            .with_default_kind(self.default_kind)
    }

    /// Builds an adapter over `source`.
    pub fn adapter<S: RecordSource>(&self, source: S) -> CalendarAdapter<S> {
        CalendarAdapter::with_profile(source, self.profile(), LEGACY_SOURCE_NAME)
    }
}

/// Logging settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Level for every campuscal crate.
    pub level: LogLevel,

    pub format: TracingOutputFormat,

    /// Override for record normalization and adapters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<LogLevel>,

    /// Override for the registry and import service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry: Option<LogLevel>,
}

impl LoggingSettings {
    /// Builds the tracing configuration for these settings.
    pub fn tracing_config(&self) -> TracingConfig {
        let overrides = [
            ("campuscal_sources", self.sources),
            ("campuscal_registry", self.registry),
        ];

        overrides.into_iter().fold(
            TracingConfig::default().with_level(self.level).with_format(self.format),
            |config, (target, level)| match level {
                Some(level) => config.with_crate_level(target, level),
                None => config,
            },
        )
    }
}

impl CampusConfig {
    /// Loads configuration from a specific path.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Creates an empty registry using the configured listing order.
    pub fn build_registry(&self) -> EventRegistry {
        EventRegistry::new().with_sort_key(self.registry.default_sort)
    }
}
