// SPDX-FileCopyrightText: 2026 Scriptor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared service cache handed to script executions.
//!
//! Executors use it to keep expensive, reusable objects (compiled templates,
//! connections, lookups) across runs. Entries are typed: a lookup with the
//! wrong type behaves as a miss. Once disposed, every operation fails.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry as Slot;
use scriptor_core::ScriptorError;
use tracing::{debug, info};

type Entry = Arc<dyn Any + Send + Sync>;

/// Bounded, typed, disposable key/value cache.
pub struct ServiceCache {
    entries: DashMap<String, Entry>,
    /// Slots handed out to new keys; never exceeds `max_entries`.
    reserved: AtomicUsize,
    max_entries: usize,
    disposed: AtomicBool,
}

impl ServiceCache {
    /// Create a cache holding at most `max_entries` entries. A bound of zero
    /// stores nothing, so every lookup misses.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            reserved: AtomicUsize::new(0),
            max_entries,
            disposed: AtomicBool::new(false),
        }
    }

    /// Fetch the entry under `key` if it holds a `T`.
    pub fn get<T>(&self, key: &str) -> Result<Option<Arc<T>>, ScriptorError>
    where
        T: Any + Send + Sync,
    {
        self.ensure_open()?;
        Ok(self
            .entries
            .get(key)
            .and_then(|entry| Arc::clone(entry.value()).downcast::<T>().ok()))
    }

    /// Store `value` under `key`.
    ///
    /// Returns `Ok(false)` when the cache is full and `key` is new; existing
    /// keys can always be replaced. The bound holds under concurrent inserts,
    /// and an insert racing [`dispose`](Self::dispose) leaves nothing behind.
    pub fn insert<T>(&self, key: impl Into<String>, value: Arc<T>) -> Result<bool, ScriptorError>
    where
        T: Any + Send + Sync,
    {
        self.ensure_open()?;
        let key = key.into();
        match self.entries.entry(key) {
            Slot::Occupied(mut slot) => {
                slot.insert(value);
            }
            Slot::Vacant(slot) => {
                if !self.reserve() {
                    debug!(key = %slot.key(), max_entries = self.max_entries, "service cache full, entry not stored");
                    return Ok(false);
                }
                slot.insert(value);
            }
        }

        if self.is_disposed() {
            self.release_all();
            return Err(disposed());
        }
        Ok(true)
    }

    /// Fetch the `T` under `key`, creating and storing it on a miss.
    ///
    /// The created value is returned even when the cache has no room for it.
    pub fn get_or_insert_with<T, F>(&self, key: &str, create: F) -> Result<Arc<T>, ScriptorError>
    where
        T: Any + Send + Sync,
        F: FnOnce() -> T,
    {
        if let Some(hit) = self.get::<T>(key)? {
            return Ok(hit);
        }
        let value = Arc::new(create());
        self.insert(key, Arc::clone(&value))?;
        Ok(value)
    }

    pub fn remove(&self, key: &str) -> Result<bool, ScriptorError> {
        self.ensure_open()?;
        let removed = self.entries.remove(key).is_some();
        if removed {
            // Saturating: a concurrent dispose may already have reset the count.
            let _ = self
                .reserved
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        }
        Ok(removed)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Drop every entry and refuse further use. Disposing twice is harmless.
    pub fn dispose(&self) {
        if !self.disposed.swap(true, Ordering::SeqCst) {
            let released = self.entries.len();
            self.release_all();
            info!(released, "service cache disposed");
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> Result<(), ScriptorError> {
        if self.is_disposed() {
            return Err(disposed());
        }
        Ok(())
    }

    /// Claim a slot for a new key, failing when the cache is full.
    fn reserve(&self) -> bool {
        self.reserved
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n < self.max_entries).then_some(n + 1)
            })
            .is_ok()
    }

    fn release_all(&self) {
        self.entries.clear();
        self.reserved.store(0, Ordering::SeqCst);
    }
}

fn disposed() -> ScriptorError {
    ScriptorError::Disposed("service cache".to_string())
}

impl fmt::Debug for ServiceCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceCache")
            .field("entries", &self.entries.len())
            .field("max_entries", &self.max_entries)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
