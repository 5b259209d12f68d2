// SPDX-FileCopyrightText: 2026 Scriptor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Scriptor tests.
//!
//! Provides mock engine factories, in-memory provider sources, and a
//! recording event sink for fast, deterministic tests without touching the
//! filesystem.
//!
//! # Components
//!
//! - [`MockEngineFactory`] - Engine factory with a configurable descriptor
//! - [`MockBindingsProvider`] - Native bindings contributor that counts calls
//! - [`InMemorySource`] - Provider source backed by an in-memory manifest
//! - [`RecordingSink`] - Event sink that keeps every posted event

pub mod mock_bindings;
pub mod mock_engine;
pub mod mock_source;
pub mod recording_sink;

pub use mock_bindings::MockBindingsProvider;
pub use mock_engine::{MockEngine, MockEngineFactory};
pub use mock_source::InMemorySource;
pub use recording_sink::RecordingSink;
