// SPDX-FileCopyrightText: 2026 Scriptor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bindings contributor trait.

use crate::types::Bindings;

/// Supplies extra name/value bindings for a script's execution context.
pub trait BindingsValuesProvider: Send + Sync {
    /// Adds this contributor's bindings to `bindings`, overwriting existing names.
    fn add_bindings(&self, bindings: &mut Bindings);
}
