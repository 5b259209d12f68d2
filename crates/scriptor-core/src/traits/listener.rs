// SPDX-FileCopyrightText: 2026 Scriptor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability subscription interface.

/// Receives add/update/remove notifications for dynamically tracked services.
///
/// The discovery mechanism that produces these notifications (a framework
/// service tracker, a file watcher, polling) is an adapter outside the
/// registry; the registry components only implement this trait.
pub trait ServiceListener<S>: Send + Sync {
    /// A service appeared.
    fn on_add(&self, service: S);

    /// A tracked service changed its registration properties.
    fn on_update(&self, service: S);

    /// A tracked service went away.
    fn on_remove(&self, service: S);
}
