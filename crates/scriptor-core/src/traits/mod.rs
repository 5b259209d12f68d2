// SPDX-FileCopyrightText: 2026 Scriptor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions for every pluggable seam of the registry.
//!
//! Engine factories and binding contributors are supplied by plugins; provider
//! sources and event sinks are supplied by the host that embeds the registry.

pub mod bindings;
pub mod engine;
pub mod event;
pub mod listener;
pub mod source;

// Re-export all traits at the traits module level for convenience.
pub use bindings::BindingsValuesProvider;
pub use engine::{ScriptEngine, ScriptEngineFactory};
pub use event::EventSink;
pub use listener::ServiceListener;
pub use source::ProviderSource;
