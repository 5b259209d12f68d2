// SPDX-FileCopyrightText: 2026 Scriptor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Immutable lookup tables built from one registry membership.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use scriptor_core::{ProviderSource, ScriptEngineFactory};
use tracing::{info, warn};

use crate::spi::{self, FactorySink};

/// Every factory known at one registry generation, indexed by extension,
/// MIME type, and language name.
///
/// Later registrations win when two factories claim the same key: sources are
/// scanned in registration order, then single factories in registration order.
pub struct EngineSnapshot {
    generation: u64,
    factories: Vec<Arc<dyn ScriptEngineFactory>>,
    by_extension: HashMap<String, Arc<dyn ScriptEngineFactory>>,
    by_mime_type: HashMap<String, Arc<dyn ScriptEngineFactory>>,
    by_name: HashMap<String, Arc<dyn ScriptEngineFactory>>,
}

impl EngineSnapshot {
    /// Scan `sources` and collect `singles` into a new snapshot.
    pub fn build(
        generation: u64,
        sources: &[Arc<dyn ProviderSource>],
        singles: &[Arc<dyn ScriptEngineFactory>],
        manifest_path: &str,
    ) -> Self {
        let mut snapshot = Self::empty(generation);
        let mut extensions = BTreeSet::new();

        for source in sources {
            extensions.extend(spi::scan(source.as_ref(), manifest_path, &mut snapshot));
        }
        for factory in singles {
            extensions.extend(factory.descriptor().extensions.iter().cloned());
            snapshot.register_factory(Arc::clone(factory));
        }

        snapshot.log_extension_handlers(&extensions);
        snapshot
    }

    /// A snapshot with no factories.
    pub fn empty(generation: u64) -> Self {
        Self {
            generation,
            factories: Vec::new(),
            by_extension: HashMap::new(),
            by_mime_type: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Registry generation this snapshot was built from.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// All factories in registration order.
    pub fn factories(&self) -> &[Arc<dyn ScriptEngineFactory>] {
        &self.factories
    }

    pub fn by_extension(&self, extension: &str) -> Option<&Arc<dyn ScriptEngineFactory>> {
        self.by_extension.get(extension)
    }

    pub fn by_mime_type(&self, mime_type: &str) -> Option<&Arc<dyn ScriptEngineFactory>> {
        self.by_mime_type.get(mime_type)
    }

    pub fn by_name(&self, name: &str) -> Option<&Arc<dyn ScriptEngineFactory>> {
        self.by_name.get(name)
    }

    /// Every extension with a handler, sorted.
    pub fn extensions(&self) -> Vec<&str> {
        let mut extensions: Vec<&str> = self.by_extension.keys().map(String::as_str).collect();
        extensions.sort_unstable();
        extensions
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    fn log_extension_handlers(&self, extensions: &BTreeSet<String>) {
        for extension in extensions {
            match self.by_extension.get(extension) {
                Some(factory) => {
                    let descriptor = factory.descriptor();
                    info!(
                        extension = %extension,
                        engine = %descriptor.engine_name,
                        version = %descriptor.engine_version,
                        "script extension handled by engine"
                    );
                }
                None => warn!(extension = %extension, "no engine handles script extension"),
            }
        }
    }
}

impl FactorySink for EngineSnapshot {
    fn register_factory(&mut self, factory: Arc<dyn ScriptEngineFactory>) {
        let descriptor = factory.descriptor();
        info!(
            engine = %descriptor.engine_name,
            version = %descriptor.engine_version,
            language = %descriptor.language_name,
            "adding script engine"
        );

        for extension in &descriptor.extensions {
            self.by_extension
                .insert(extension.clone(), Arc::clone(&factory));
        }
        for mime_type in &descriptor.mime_types {
            self.by_mime_type
                .insert(mime_type.clone(), Arc::clone(&factory));
        }
        for name in &descriptor.names {
            self.by_name.insert(name.clone(), Arc::clone(&factory));
        }
        self.factories.push(factory);
    }
}

impl fmt::Debug for EngineSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let engines: Vec<&str> = self
            .factories
            .iter()
            .map(|factory| factory.descriptor().engine_name.as_str())
            .collect();
        f.debug_struct("EngineSnapshot")
            .field("generation", &self.generation)
            .field("engines", &engines)
            .finish()
    }
}
