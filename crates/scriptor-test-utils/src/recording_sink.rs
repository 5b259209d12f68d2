// SPDX-FileCopyrightText: 2026 Scriptor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event sink that records every posted event for later assertions.

use std::sync::{Mutex, PoisonError};

use scriptor_core::{EngineEvent, EventSink, EventTopic};

#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All events posted so far, in posting order.
    pub fn events(&self) -> Vec<EngineEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Topics of all events posted so far.
    pub fn topics(&self) -> Vec<EventTopic> {
        self.events().into_iter().map(|e| e.topic).collect()
    }
}

impl EventSink for RecordingSink {
    fn post(&self, event: EngineEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
