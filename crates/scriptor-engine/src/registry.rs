// SPDX-FileCopyrightText: 2026 Scriptor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Engine registry for dynamically arriving and departing engine factories.
//!
//! The `EngineRegistry` tracks provider sources and single factories as its
//! membership. Lookups are answered from an [`EngineSnapshot`] that is built
//! on first use after any membership change and then shared by every reader
//! until the next change.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use arc_swap::ArcSwapOption;
use scriptor_core::{
    EngineEvent, EventSink, EventTopic, ProviderSource, ScriptEngineFactory, ServiceListener,
    SourceId,
};
use tracing::{debug, info};

use crate::snapshot::EngineSnapshot;
use crate::spi;

/// Extension used to resolve a script path: the text after the last `.`,
/// or the whole path when it has none.
pub fn extension_of(path: &str) -> &str {
    match path.rfind('.') {
        Some(dot) => &path[dot + 1..],
        None => path,
    }
}

/// Lifecycle notification for a provider source.
#[derive(Clone)]
pub enum SourceEvent {
    /// The source became active and may declare engines.
    Started(Arc<dyn ProviderSource>),
    /// The source with this id went away.
    Stopped(SourceId),
}

#[derive(Default)]
struct Membership {
    sources: Vec<Arc<dyn ProviderSource>>,
    singles: Vec<Arc<dyn ScriptEngineFactory>>,
}

/// Registry of engine factories contributed by provider sources and by
/// individual registrations.
///
/// All methods take `&self` and may be called from any thread. A snapshot
/// built concurrently with a membership change is handed to the caller that
/// built it but never published, so a change is always visible to lookups
/// that start after it.
pub struct EngineRegistry {
    manifest_path: String,
    membership: Mutex<Membership>,
    /// Bumped under the membership lock on every change.
    generation: AtomicU64,
    published: ArcSwapOption<EngineSnapshot>,
    rebuild: Mutex<()>,
    events: Option<Arc<dyn EventSink>>,
}

impl EngineRegistry {
    /// Create an empty registry that reads manifests at `manifest_path`.
    pub fn new(manifest_path: impl Into<String>) -> Self {
        Self {
            manifest_path: manifest_path.into(),
            membership: Mutex::new(Membership::default()),
            generation: AtomicU64::new(0),
            published: ArcSwapOption::empty(),
            rebuild: Mutex::new(()),
            events: None,
        }
    }

    /// Announce single-factory registrations on `sink`.
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.events = Some(sink);
        self
    }

    pub fn manifest_path(&self) -> &str {
        &self.manifest_path
    }

    /// Add a provider source.
    ///
    /// Sources without a manifest are ignored, as are sources whose id is
    /// already registered. Returns true if membership changed.
    pub fn register_source(&self, source: Arc<dyn ProviderSource>) -> bool {
        if !spi::has_manifest(source.as_ref(), &self.manifest_path) {
            debug!(source = %source.id(), "provider source declares no engines");
            return false;
        }

        let mut membership = lock(&self.membership);
        if membership.sources.iter().any(|s| s.id() == source.id()) {
            debug!(source = %source.id(), "provider source already registered");
            return false;
        }
        info!(source = %source.id(), "registering provider source");
        membership.sources.push(source);
        self.invalidate_locked(&membership);
        true
    }

    /// Remove the provider source with `id`. Returns true if it was present.
    pub fn unregister_source(&self, id: &SourceId) -> bool {
        let mut membership = lock(&self.membership);
        let before = membership.sources.len();
        membership.sources.retain(|s| s.id() != id);
        if membership.sources.len() == before {
            return false;
        }
        info!(source = %id, "unregistering provider source");
        self.invalidate_locked(&membership);
        true
    }

    /// Apply a source lifecycle notification. Returns true if membership changed.
    pub fn source_changed(&self, event: SourceEvent) -> bool {
        match event {
            SourceEvent::Started(source) => self.register_source(source),
            SourceEvent::Stopped(id) => self.unregister_source(&id),
        }
    }

    /// Add a single factory and announce it.
    ///
    /// Registering the same instance twice is a no-op. Returns true if
    /// membership changed.
    pub fn register_factory(&self, factory: Arc<dyn ScriptEngineFactory>) -> bool {
        {
            let mut membership = lock(&self.membership);
            if membership.singles.iter().any(|f| Arc::ptr_eq(f, &factory)) {
                debug!(engine = %factory.descriptor().engine_name, "engine factory already registered");
                return false;
            }
            membership.singles.push(Arc::clone(&factory));
            self.invalidate_locked(&membership);
        }
        self.announce(EventTopic::FactoryAdded, factory.as_ref());
        true
    }

    /// Remove a single factory and announce it. Returns true if it was present.
    pub fn unregister_factory(&self, factory: &Arc<dyn ScriptEngineFactory>) -> bool {
        {
            let mut membership = lock(&self.membership);
            let before = membership.singles.len();
            membership.singles.retain(|f| !Arc::ptr_eq(f, factory));
            if membership.singles.len() == before {
                return false;
            }
            self.invalidate_locked(&membership);
        }
        self.announce(EventTopic::FactoryRemoved, factory.as_ref());
        true
    }

    /// Drop the current snapshot so the next lookup rescans every source.
    pub fn invalidate(&self) {
        let membership = lock(&self.membership);
        self.invalidate_locked(&membership);
    }

    /// Forget all sources and single factories without announcing anything.
    pub fn clear(&self) {
        let mut membership = lock(&self.membership);
        membership.sources.clear();
        membership.singles.clear();
        self.invalidate_locked(&membership);
        debug!("engine registry cleared");
    }

    /// Ids of the registered provider sources, in registration order.
    pub fn source_ids(&self) -> Vec<SourceId> {
        lock(&self.membership)
            .sources
            .iter()
            .map(|s| s.id().clone())
            .collect()
    }

    /// The snapshot for the current membership, building it if needed.
    pub fn snapshot(&self) -> Arc<EngineSnapshot> {
        if let Some(snapshot) = self.current() {
            return snapshot;
        }

        let _rebuilding = lock(&self.rebuild);
        // Another caller may have published while we waited.
        if let Some(snapshot) = self.current() {
            return snapshot;
        }

        let (generation, sources, singles) = {
            let membership = lock(&self.membership);
            (
                self.generation.load(Ordering::SeqCst),
                membership.sources.clone(),
                membership.singles.clone(),
            )
        };

        let snapshot = Arc::new(EngineSnapshot::build(
            generation,
            &sources,
            &singles,
            &self.manifest_path,
        ));
        info!(
            generation,
            sources = sources.len(),
            engines = snapshot.len(),
            "engine snapshot rebuilt"
        );

        let _membership = lock(&self.membership);
        if self.generation.load(Ordering::SeqCst) == generation {
            self.published.store(Some(Arc::clone(&snapshot)));
        } else {
            debug!(generation, "membership changed during rebuild, snapshot not published");
        }
        snapshot
    }

    /// All known factories in registration order.
    pub fn factories(&self) -> Vec<Arc<dyn ScriptEngineFactory>> {
        self.snapshot().factories().to_vec()
    }

    pub fn resolve_by_extension(&self, extension: &str) -> Option<Arc<dyn ScriptEngineFactory>> {
        self.snapshot().by_extension(extension).cloned()
    }

    pub fn resolve_by_mime_type(&self, mime_type: &str) -> Option<Arc<dyn ScriptEngineFactory>> {
        self.snapshot().by_mime_type(mime_type).cloned()
    }

    pub fn resolve_by_name(&self, name: &str) -> Option<Arc<dyn ScriptEngineFactory>> {
        self.snapshot().by_name(name).cloned()
    }

    /// Resolve the factory for a script path by its extension.
    pub fn resolve_for_path(&self, path: &str) -> Option<Arc<dyn ScriptEngineFactory>> {
        self.resolve_by_extension(extension_of(path))
    }

    fn current(&self) -> Option<Arc<EngineSnapshot>> {
        let snapshot = self.published.load_full()?;
        (snapshot.generation() == self.generation.load(Ordering::SeqCst)).then_some(snapshot)
    }

    fn invalidate_locked(&self, _membership: &MutexGuard<'_, Membership>) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.published.store(None);
        debug!(generation, "engine snapshot invalidated");
    }

    fn announce(&self, topic: EventTopic, factory: &dyn ScriptEngineFactory) {
        if let Some(sink) = &self.events {
            sink.post(EngineEvent::new(topic, factory.descriptor()));
        }
    }
}

impl ServiceListener<Arc<dyn ScriptEngineFactory>> for EngineRegistry {
    fn on_add(&self, factory: Arc<dyn ScriptEngineFactory>) {
        self.register_factory(factory);
    }

    fn on_update(&self, _factory: Arc<dyn ScriptEngineFactory>) {}

    fn on_remove(&self, factory: Arc<dyn ScriptEngineFactory>) {
        self.unregister_factory(&factory);
    }
}

/// Provider sources follow their lifecycle: started sources are scanned,
/// stopped ones dropped, and a refreshed source is rescanned.
impl ServiceListener<Arc<dyn ProviderSource>> for EngineRegistry {
    fn on_add(&self, source: Arc<dyn ProviderSource>) {
        self.source_changed(SourceEvent::Started(source));
    }

    fn on_update(&self, source: Arc<dyn ProviderSource>) {
        self.source_changed(SourceEvent::Stopped(source.id().clone()));
        self.source_changed(SourceEvent::Started(source));
    }

    fn on_remove(&self, source: Arc<dyn ProviderSource>) {
        self.source_changed(SourceEvent::Stopped(source.id().clone()));
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
