// SPDX-FileCopyrightText: 2026 Scriptor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resolved scripts and the execution seam they are handed to.

use std::fmt;
use std::sync::Arc;

use scriptor_core::{
    Bindings, BindingsValuesProvider, EngineDescriptor, ScriptEngine, ScriptEngineFactory,
    ScriptorError,
};

use crate::cache::ServiceCache;

/// The engine factory chosen for a path and the contributors that apply to it.
#[derive(Clone)]
pub struct ResolvedEngine {
    pub factory: Arc<dyn ScriptEngineFactory>,
    pub contributors: Vec<Arc<dyn BindingsValuesProvider>>,
}

impl ResolvedEngine {
    pub fn descriptor(&self) -> &EngineDescriptor {
        self.factory.descriptor()
    }
}

impl fmt::Debug for ResolvedEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedEngine")
            .field("engine", &self.descriptor().engine_name)
            .field("contributors", &self.contributors.len())
            .finish()
    }
}

/// Everything an executor receives to run one script.
pub struct ExecutionRequest<'a> {
    pub path: &'a str,
    pub engine: &'a dyn ScriptEngine,
    pub contributors: &'a [Arc<dyn BindingsValuesProvider>],
    pub cache: &'a Arc<ServiceCache>,
}

impl ExecutionRequest<'_> {
    /// Run every contributor, in order, into a fresh binding set.
    pub fn bindings(&self) -> Bindings {
        collect_bindings(self.contributors)
    }
}

/// Runs a resolved script. Where the script text comes from and how the
/// result is delivered are up to the implementation.
pub trait ScriptExecutor: Send + Sync {
    fn execute(&self, request: ExecutionRequest<'_>) -> Result<serde_json::Value, ScriptorError>;
}

/// A script path bound to a live engine instance, its contributors, and the
/// shared service cache.
pub struct ResolvedScript {
    path: String,
    factory: Arc<dyn ScriptEngineFactory>,
    engine: Box<dyn ScriptEngine>,
    contributors: Vec<Arc<dyn BindingsValuesProvider>>,
    cache: Arc<ServiceCache>,
}

impl ResolvedScript {
    pub(crate) fn new(
        path: &str,
        resolved: ResolvedEngine,
        engine: Box<dyn ScriptEngine>,
        cache: Arc<ServiceCache>,
    ) -> Self {
        Self {
            path: path.to_string(),
            factory: resolved.factory,
            engine,
            contributors: resolved.contributors,
            cache,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn descriptor(&self) -> &EngineDescriptor {
        self.factory.descriptor()
    }

    pub fn engine(&self) -> &dyn ScriptEngine {
        self.engine.as_ref()
    }

    pub fn contributors(&self) -> &[Arc<dyn BindingsValuesProvider>] {
        &self.contributors
    }

    pub fn cache(&self) -> &Arc<ServiceCache> {
        &self.cache
    }

    /// Bindings produced by running every contributor in order. Later
    /// contributors overwrite earlier ones on key collisions.
    pub fn bindings(&self) -> Bindings {
        collect_bindings(&self.contributors)
    }

    /// Hand the script to `executor`.
    pub fn eval(&self, executor: &dyn ScriptExecutor) -> Result<serde_json::Value, ScriptorError> {
        executor.execute(ExecutionRequest {
            path: &self.path,
            engine: self.engine.as_ref(),
            contributors: &self.contributors,
            cache: &self.cache,
        })
    }
}

impl fmt::Debug for ResolvedScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedScript")
            .field("path", &self.path)
            .field("engine", &self.engine.engine_name())
            .field("contributors", &self.contributors.len())
            .finish()
    }
}

fn collect_bindings(contributors: &[Arc<dyn BindingsValuesProvider>]) -> Bindings {
    let mut bindings = Bindings::new();
    for contributor in contributors {
        contributor.add_bindings(&mut bindings);
    }
    bindings
}
