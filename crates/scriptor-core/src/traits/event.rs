// SPDX-FileCopyrightText: 2026 Scriptor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event sink trait for registry change announcements.

use crate::types::EngineEvent;

/// Receives engine registry events.
///
/// Posting must not block and must not fail: a sink that cannot deliver an
/// event drops it.
pub trait EventSink: Send + Sync {
    fn post(&self, event: EngineEvent);
}
