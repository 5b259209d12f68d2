// SPDX-FileCopyrightText: 2026 Scriptor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Broadcast event bus for engine registry announcements.
//!
//! The registry posts an [`EngineEvent`] whenever a single engine factory is
//! registered or unregistered. [`EventBus`] stamps each one with an id and a
//! timestamp and fans it out to every subscriber. Posting never blocks and
//! never fails: with no subscribers the event is simply dropped, and slow
//! subscribers lag rather than hold up the registry.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use scriptor_core::{EngineEvent, EventSink};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::trace;
use uuid::Uuid;

/// Default number of events buffered per subscriber.
pub const DEFAULT_CAPACITY: usize = 256;

/// An engine event as delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusEvent {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: EngineEvent,
}

impl BusEvent {
    fn stamp(event: EngineEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Fan-out channel for engine events.
pub struct EventBus {
    sender: broadcast::Sender<BusEvent>,
    posted: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            posted: AtomicU64::new(0),
        }
    }

    /// Receive every event posted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<BusEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Number of events posted since creation, delivered or not.
    pub fn posted(&self) -> u64 {
        self.posted.load(Ordering::Relaxed)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for EventBus {
    fn post(&self, event: EngineEvent) {
        self.posted.fetch_add(1, Ordering::Relaxed);
        let event = BusEvent::stamp(event);
        trace!(topic = %event.event.topic, engine = %event.event.engine_name, "posting engine event");
        if self.sender.send(event).is_err() {
            trace!("no subscribers for engine event");
        }
    }
}
