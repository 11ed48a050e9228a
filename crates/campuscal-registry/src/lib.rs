//! Event registry, import service and configuration.
//!
//! This crate provides the registry the rest of the campus calendar reads
//! and writes:
//! - Canonical events keyed by id, users keyed by id
//! - Registration edges between users and events
//! - Pluggable listing order
//! - Fan-in import from any number of source adapters
//! - TOML configuration for sources and registry
//!
//! # Example
//!
//! ```rust,no_run
//! use campuscal_registry::{CampusConfig, EventImporter};
//! use campuscal_sources::InMemorySource;
//!
//! let config = CampusConfig::load_from("campuscal.toml").unwrap_or_default();
//! let mut registry = config.build_registry();
//!
//! let mut importer = EventImporter::new()
//!     .with_adapter(config.external.adapter(InMemorySource::default()))
//!     .with_adapter(config.legacy.adapter(InMemorySource::default()));
//! let report = importer.import_into(&mut registry);
//! println!("imported {} events", report.total_added());
//! ```

mod config;
mod error;
mod importer;
mod registry;

pub use config::{CampusConfig, ExternalSettings, LegacySettings, RegistrySettings};
pub use error::{ConfigError, RegistryError, RegistryResult};
pub use importer::{EventImporter, ImportReport, SourceImport};
pub use registry::{
    EventRegistry, SharedRegistry, SystemStats, new_shared_registry, read_registry,
    write_registry,
};
