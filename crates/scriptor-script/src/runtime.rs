// SPDX-FileCopyrightText: 2026 Scriptor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runtime lifecycle: wires the registry, contributor tracking, service
//! cache, and resolve facade together from configuration.

use std::sync::Arc;

use scriptor_bindings::{ContributorAggregator, ContributorTracker};
use scriptor_config::ScriptorConfig;
use scriptor_core::{EventSink, ProviderSource};
use scriptor_engine::{EngineRegistry, SourceEvent};
use tracing::info;

use crate::adapter::ScriptAdapterFactory;
use crate::cache::ServiceCache;

/// An activated scripting subsystem.
pub struct ScriptingRuntime {
    registry: Arc<EngineRegistry>,
    aggregator: Arc<ContributorAggregator>,
    tracker: Arc<ContributorTracker>,
    cache: Arc<ServiceCache>,
    adapter: ScriptAdapterFactory,
}

impl ScriptingRuntime {
    /// Build every component from `config` and register the initially
    /// active `sources`. Engine announcements go to `sink` when given.
    pub fn activate(
        config: &ScriptorConfig,
        sink: Option<Arc<dyn EventSink>>,
        sources: Vec<Arc<dyn ProviderSource>>,
    ) -> Self {
        let mut registry = EngineRegistry::new(config.engine.manifest_path.clone());
        if let Some(sink) = sink {
            registry = registry.with_event_sink(sink);
        }
        let registry = Arc::new(registry);

        for source in sources {
            registry.source_changed(SourceEvent::Started(source));
        }

        let aggregator = Arc::new(ContributorAggregator::new(
            config.bindings.any_scopes.iter().cloned(),
        ));
        let tracker = Arc::new(ContributorTracker::new(
            Arc::clone(&aggregator),
            &config.bindings.map_filter,
        ));

        let capacity = if config.cache.enabled {
            config.cache.max_entries
        } else {
            0
        };
        let cache = Arc::new(ServiceCache::new(capacity));

        let adapter = ScriptAdapterFactory::new(
            Arc::clone(&registry),
            Arc::clone(&aggregator),
            Arc::clone(&cache),
        );

        info!(
            sources = registry.source_ids().len(),
            tracks_maps = tracker.tracks_maps(),
            cache_entries = capacity,
            "scripting runtime activated"
        );

        Self {
            registry,
            aggregator,
            tracker,
            cache,
            adapter,
        }
    }

    pub fn registry(&self) -> &Arc<EngineRegistry> {
        &self.registry
    }

    pub fn aggregator(&self) -> &Arc<ContributorAggregator> {
        &self.aggregator
    }

    /// Listener to feed contributor registrations into.
    pub fn tracker(&self) -> &Arc<ContributorTracker> {
        &self.tracker
    }

    pub fn cache(&self) -> &Arc<ServiceCache> {
        &self.cache
    }

    pub fn adapter(&self) -> &ScriptAdapterFactory {
        &self.adapter
    }

    /// Dispose the service cache and forget every engine and contributor.
    pub fn deactivate(self) {
        self.cache.dispose();
        self.registry.clear();
        self.aggregator.clear();
        info!("scripting runtime deactivated");
    }
}
