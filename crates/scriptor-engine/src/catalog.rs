// SPDX-FileCopyrightText: 2026 Scriptor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Catalog of compiled-in engine factory constructors.
//!
//! A provider source resolves the names listed in its manifest against a
//! catalog. Nothing is loaded from disk: a name either maps to a constructor
//! linked into the binary or it does not exist.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use scriptor_core::{ScriptEngineFactory, ScriptorError};

/// Builds one engine factory instance.
pub type FactoryConstructor =
    Arc<dyn Fn() -> Result<Arc<dyn ScriptEngineFactory>, ScriptorError> + Send + Sync>;

/// Named factory constructors, kept sorted by name.
#[derive(Clone, Default)]
pub struct FactoryCatalog {
    constructors: BTreeMap<String, FactoryConstructor>,
}

impl FactoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a constructor under `name`, replacing any previous one.
    pub fn with<F>(mut self, name: impl Into<String>, constructor: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn ScriptEngineFactory>, ScriptorError> + Send + Sync + 'static,
    {
        self.constructors.insert(name.into(), Arc::new(constructor));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Construct the factory registered under `name`.
    ///
    /// Returns `None` when the catalog has no such name.
    pub fn instantiate(&self, name: &str) -> Option<Result<Arc<dyn ScriptEngineFactory>, ScriptorError>> {
        self.constructors.get(name).map(|constructor| constructor())
    }

    /// All names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.constructors.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

impl fmt::Debug for FactoryCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryCatalog")
            .field("names", &self.names())
            .finish()
    }
}
