//! Import service.
//!
//! [`EventImporter`] fans in several [`SourceAdapter`]s and stores whatever
//! they produce in an [`EventRegistry`]. Unavailable sources are skipped.

use campuscal_core::CanonicalEvent;
use campuscal_sources::SourceAdapter;
use tracing::{info, info_span, warn};

use crate::registry::{EventRegistry, SharedRegistry, write_registry};

/// Per-source outcome of one import run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImport {
    pub source_name: String,
    pub available: bool,
    /// Events produced by the adapter.
    pub imported: usize,
    /// Events the registry accepted.
    pub added: usize,
}

/// Outcome of one import run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub sources: Vec<SourceImport>,
}

impl ImportReport {
    /// Events the registry accepted, across all sources.
    pub fn total_added(&self) -> usize {
        self.sources.iter().map(|s| s.added).sum()
    }

    pub fn unavailable_sources(&self) -> impl Iterator<Item = &str> {
        self.sources
            .iter()
            .filter(|s| !s.available)
            .map(|s| s.source_name.as_str())
    }
}

/// Imports events from a set of adapters into a registry.
#[derive(Default)]
pub struct EventImporter {
    adapters: Vec<Box<dyn SourceAdapter>>,
}

impl std::fmt::Debug for EventImporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventImporter")
            .field(
                "adapters",
                &self.adapters.iter().map(|a| a.source_name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl EventImporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to add an adapter.
    pub fn with_adapter(mut self, adapter: impl SourceAdapter + 'static) -> Self {
        self.add_adapter(adapter);
        self
    }

    pub fn add_adapter(&mut self, adapter: impl SourceAdapter + 'static) {
        self.adapters.push(Box::new(adapter));
    }

    pub fn adapters(&self) -> &[Box<dyn SourceAdapter>] {
        &self.adapters
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// Imports from every available adapter into `registry`.
    pub fn import_into(&mut self, registry: &mut EventRegistry) -> ImportReport {
        let batches = self.collect();
        let report = store(batches, registry);
        info!(added = report.total_added(), "Import finished");
        report
    }

    /// Imports into a shared registry.
    ///
    /// Sources are read before the write lock is taken, so readers are only
    /// blocked while events are stored.
    pub fn import_into_shared(&mut self, registry: &SharedRegistry) -> ImportReport {
        let batches = self.collect();
        let report = store(batches, &mut write_registry(registry));
        info!(added = report.total_added(), "Import finished");
        report
    }

    fn collect(&mut self) -> Vec<Batch> {
        self.adapters
            .iter_mut()
            .map(|adapter| {
                let name = adapter.source_name().to_string();
                let _span = info_span!("import_source", source = %name).entered();
                if !adapter.is_source_available() {
                    warn!(source = %name, "Skipping unavailable source");
                    return (name, false, Vec::new());
                }
                let events = adapter.import_events();
                (name, true, events)
            })
            .collect()
    }
}

type Batch = (String, bool, Vec<CanonicalEvent>);

fn store(batches: Vec<Batch>, registry: &mut EventRegistry) -> ImportReport {
    let sources = batches
        .into_iter()
        .map(|(source_name, available, events)| {
            let imported = events.len();
            let added = events
                .into_iter()
                .map(|event| registry.add_event(event))
                .filter(|&accepted| accepted)
                .count();
            SourceImport {
                source_name,
                available,
                imported,
                added,
            }
        })
        .collect();
    ImportReport { sources }
}
