// SPDX-FileCopyrightText: 2026 Scriptor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Script engine factory and live engine traits.

use crate::error::ScriptorError;
use crate::types::{Bindings, EngineDescriptor};

/// A provider of script-execution capability.
///
/// The registry only ever holds factories behind an `Arc`; the identity of a
/// registered factory is the identity of that `Arc`.
pub trait ScriptEngineFactory: Send + Sync + 'static {
    /// Returns the static description of this engine.
    fn descriptor(&self) -> &EngineDescriptor;

    /// Creates a live engine instance.
    fn create_engine(&self) -> Result<Box<dyn ScriptEngine>, ScriptorError>;
}

/// A live engine instance able to evaluate script source.
pub trait ScriptEngine: Send + Sync {
    /// Name of the engine that produced this instance.
    fn engine_name(&self) -> &str;

    /// Evaluates `source` with the given bindings in scope.
    fn eval(&self, source: &str, bindings: &Bindings) -> Result<serde_json::Value, ScriptorError>;
}
