// SPDX-FileCopyrightText: 2026 Scriptor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter that lets a plain name/value map act as a bindings contributor.

use scriptor_core::{Bindings, BindingsValuesProvider};

/// Copies every entry of its map into the bindings, one binding per key.
#[derive(Debug, Clone, Default)]
pub struct MapBindingsProvider {
    values: Bindings,
}

impl MapBindingsProvider {
    pub fn new(values: Bindings) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &Bindings {
        &self.values
    }
}

impl From<Bindings> for MapBindingsProvider {
    fn from(values: Bindings) -> Self {
        Self::new(values)
    }
}

impl BindingsValuesProvider for MapBindingsProvider {
    fn add_bindings(&self, bindings: &mut Bindings) {
        for (key, value) in &self.values {
            bindings.insert(key.clone(), value.clone());
        }
    }
}
