// SPDX-FileCopyrightText: 2026 Scriptor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resolve facade: from a script path to an engine and its contributors.
//!
//! No engine for a path is a normal outcome and yields `None`, telling the
//! caller to try another way of handling the resource.

use std::sync::Arc;

use scriptor_bindings::ContributorAggregator;
use scriptor_engine::{EngineRegistry, extension_of};
use tracing::{debug, error};

use crate::cache::ServiceCache;
use crate::script::{ResolvedEngine, ResolvedScript};

/// Adapts script paths into resolved scripts.
#[derive(Clone)]
pub struct ScriptAdapterFactory {
    registry: Arc<EngineRegistry>,
    aggregator: Arc<ContributorAggregator>,
    cache: Arc<ServiceCache>,
}

impl ScriptAdapterFactory {
    pub fn new(
        registry: Arc<EngineRegistry>,
        aggregator: Arc<ContributorAggregator>,
        cache: Arc<ServiceCache>,
    ) -> Self {
        Self {
            registry,
            aggregator,
            cache,
        }
    }

    /// Find the engine factory for `path` and the contributors that apply to it.
    pub fn resolve(&self, path: &str) -> Option<ResolvedEngine> {
        let Some(factory) = self.registry.resolve_for_path(path) else {
            debug!(path, extension = extension_of(path), "no script engine for path");
            return None;
        };
        let contributors = self.aggregator.contributors_for(&factory.descriptor().names);
        Some(ResolvedEngine {
            factory,
            contributors,
        })
    }

    /// Resolve `path` and create a live engine for it.
    ///
    /// An engine that fails to start is logged and treated as no engine.
    pub fn adapt(&self, path: &str) -> Option<ResolvedScript> {
        let resolved = self.resolve(path)?;
        match resolved.factory.create_engine() {
            Ok(engine) => Some(ResolvedScript::new(
                path,
                resolved,
                engine,
                Arc::clone(&self.cache),
            )),
            Err(e) => {
                error!(path, engine = %resolved.descriptor().engine_name, error = %e, "cannot create script engine");
                None
            }
        }
    }

    /// First MIME type of the engine handling the extension of `name`.
    pub fn mime_type(&self, name: &str) -> Option<String> {
        self.registry
            .resolve_for_path(name)?
            .descriptor()
            .first_mime_type()
            .map(str::to_string)
    }

    /// First extension of the engine handling `mime_type`.
    pub fn extension(&self, mime_type: &str) -> Option<String> {
        self.registry
            .resolve_by_mime_type(mime_type)?
            .descriptor()
            .first_extension()
            .map(str::to_string)
    }

    pub fn registry(&self) -> &Arc<EngineRegistry> {
        &self.registry
    }

    pub fn aggregator(&self) -> &Arc<ContributorAggregator> {
        &self.aggregator
    }

    pub fn cache(&self) -> &Arc<ServiceCache> {
        &self.cache
    }
}
