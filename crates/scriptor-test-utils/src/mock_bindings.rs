// SPDX-FileCopyrightText: 2026 Scriptor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Native bindings contributor for aggregator and facade tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use scriptor_core::{Bindings, BindingsValuesProvider};

/// Contributes a single binding `name -> name` and counts how often it ran.
#[derive(Debug)]
pub struct MockBindingsProvider {
    name: String,
    calls: AtomicUsize,
}

impl MockBindingsProvider {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of times `add_bindings` was called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl BindingsValuesProvider for MockBindingsProvider {
    fn add_bindings(&self, bindings: &mut Bindings) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        bindings.insert(self.name.clone(), serde_json::Value::String(self.name.clone()));
    }
}
