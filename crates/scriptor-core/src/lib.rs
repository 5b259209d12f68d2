// SPDX-FileCopyrightText: 2026 Scriptor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Scriptor engine registry.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Scriptor workspace. Engine factories,
//! provider sources, binding contributors, and event sinks all implement
//! traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::ScriptorError;
pub use types::{Bindings, EngineDescriptor, EngineEvent, EventTopic, ServiceId, SourceId};

// Re-export all seam traits at crate root.
pub use traits::{
    BindingsValuesProvider, EventSink, ProviderSource, ScriptEngine, ScriptEngineFactory,
    ServiceListener,
};
