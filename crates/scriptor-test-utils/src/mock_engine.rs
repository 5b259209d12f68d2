// SPDX-FileCopyrightText: 2026 Scriptor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock engine factory and engine for deterministic testing.
//!
//! `MockEngine` does not interpret anything: evaluating a script returns a
//! JSON object echoing the engine name, the source text, and the bindings it
//! was given, which lets tests assert on exactly what reached the engine.

use std::sync::Arc;

use scriptor_core::{Bindings, EngineDescriptor, ScriptEngine, ScriptEngineFactory, ScriptorError};

/// An engine factory whose descriptor is fully controlled by the test.
#[derive(Debug, Clone)]
pub struct MockEngineFactory {
    descriptor: EngineDescriptor,
    fail_create: bool,
}

impl MockEngineFactory {
    /// Create a factory named `name` speaking language `name` and claiming `extensions`.
    pub fn new(name: &str, extensions: &[&str]) -> Self {
        Self {
            descriptor: EngineDescriptor::new(name, "1.0", name, "1.0")
                .with_extensions(extensions.iter().copied()),
            fail_create: false,
        }
    }

    /// Create a factory from a complete descriptor.
    pub fn from_descriptor(descriptor: EngineDescriptor) -> Self {
        Self {
            descriptor,
            fail_create: false,
        }
    }

    pub fn with_mime_types(mut self, mime_types: &[&str]) -> Self {
        self.descriptor = self.descriptor.with_mime_types(mime_types.iter().copied());
        self
    }

    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.descriptor = self.descriptor.with_aliases(aliases.iter().copied());
        self
    }

    /// Make `create_engine` fail, simulating a broken engine implementation.
    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    /// Wrap the factory in the `Arc` the registry expects.
    pub fn shared(self) -> Arc<dyn ScriptEngineFactory> {
        Arc::new(self)
    }
}

impl ScriptEngineFactory for MockEngineFactory {
    fn descriptor(&self) -> &EngineDescriptor {
        &self.descriptor
    }

    fn create_engine(&self) -> Result<Box<dyn ScriptEngine>, ScriptorError> {
        if self.fail_create {
            return Err(ScriptorError::EngineCreation {
                engine: self.descriptor.engine_name.clone(),
                message: "mock engine configured to fail".to_string(),
            });
        }
        Ok(Box::new(MockEngine {
            name: self.descriptor.engine_name.clone(),
        }))
    }
}

/// Live engine produced by [`MockEngineFactory`].
#[derive(Debug, Clone)]
pub struct MockEngine {
    name: String,
}

impl ScriptEngine for MockEngine {
    fn engine_name(&self) -> &str {
        &self.name
    }

    fn eval(&self, source: &str, bindings: &Bindings) -> Result<serde_json::Value, ScriptorError> {
        Ok(serde_json::json!({
            "engine": self.name,
            "source": source,
            "bindings": bindings,
        }))
    }
}
