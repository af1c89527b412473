//! Lazy, weakly held resource cache keyed by integer id.
//!
//! The cache never owns a resource. Callers hold `Arc`s; the cache keeps a
//! `Weak` per id so that a second request for a live id returns the same
//! instance, and a request after every `Arc` was dropped rebuilds it.
//!
//! Each id has its own slot lock held across check, construct and publish.
//! Concurrent misses on one id therefore construct once, while different ids
//! build in parallel. A constructor must not request its own id from the same
//! cache; that would deadlock on the slot lock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::error::{ResourceKind, Result};

/// Counters describing cache traffic since creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Requests answered with an already live instance
    pub hits: u64,
    /// Requests that had to construct (first load and rebuilds)
    pub misses: u64,
    /// Misses on an id whose earlier instance had been reclaimed
    pub rebuilds: u64,
    /// Constructions that returned an error
    pub failures: u64,
}

#[derive(Debug)]
struct Slot<T> {
    value: Weak<T>,
    built: bool,
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    rebuilds: AtomicU64,
    failures: AtomicU64,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Weak, id-indexed cache of shared resources.
#[derive(Debug)]
pub struct ResourceCache<T> {
    kind: ResourceKind,
    slots: Mutex<HashMap<u32, Arc<Mutex<Slot<T>>>>>,
    counters: Counters,
}

impl<T> ResourceCache<T> {
    pub fn new(kind: ResourceKind) -> Self {
        Self { kind, slots: Mutex::new(HashMap::new()), counters: Counters::default() }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Return the live instance for `id`, or construct one with `build`.
    ///
    /// Errors from `build` are returned unchanged and nothing is published, so
    /// the next request for `id` tries again from scratch.
    pub fn load_or_get(&self, id: u32, build: impl FnOnce() -> Result<T>) -> Result<Arc<T>> {
        let slot = lock(&self.slots)
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(Slot { value: Weak::new(), built: false })))
            .clone();

        let mut guard = lock(&slot);
        if let Some(live) = guard.value.upgrade() {
            self.counters.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("{} {} cache hit", self.kind, id);
            return Ok(live);
        }

        self.counters.misses.fetch_add(1, Ordering::Relaxed);
        if guard.built {
            self.counters.rebuilds.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("{} {} was reclaimed, rebuilding", self.kind, id);
        } else {
            tracing::debug!("{} {} cache miss", self.kind, id);
        }

        match build() {
            Ok(value) => {
                let value = Arc::new(value);
                guard.value = Arc::downgrade(&value);
                guard.built = true;
                Ok(value)
            }
            Err(err) => {
                self.counters.failures.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("{} {} failed to build: {}", self.kind, id, err);
                drop(guard);
                drop(slot);
                self.remove_if_dead(id);
                Err(err)
            }
        }
    }

    /// The live instance for `id`, without constructing.
    pub fn loaded(&self, id: u32) -> Option<Arc<T>> {
        let slot = lock(&self.slots).get(&id).cloned()?;
        let value = lock(&slot).value.upgrade();
        value
    }

    /// True if a slot exists for `id`, live or not.
    pub fn has_slot(&self, id: u32) -> bool {
        lock(&self.slots).contains_key(&id)
    }

    /// Number of ids whose instance is currently alive.
    pub fn live_count(&self) -> usize {
        lock(&self.slots).values().filter(|slot| lock(slot).value.strong_count() > 0).count()
    }

    /// Drop slots whose instance has been reclaimed.
    ///
    /// Only bookkeeping is freed; live instances are unaffected and reclaimed
    /// ids are rebuilt on their next request as before.
    pub fn purge(&self) -> usize {
        let mut slots = lock(&self.slots);
        let before = slots.len();
        slots.retain(|_, slot| Arc::strong_count(slot) > 1 || lock(slot).value.strong_count() > 0);
        before - slots.len()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            rebuilds: self.counters.rebuilds.load(Ordering::Relaxed),
            failures: self.counters.failures.load(Ordering::Relaxed),
        }
    }

    fn remove_if_dead(&self, id: u32) {
        let mut slots = lock(&self.slots);
        let dead = slots
            .get(&id)
            .is_some_and(|slot| Arc::strong_count(slot) == 1 && lock(slot).value.strong_count() == 0);
        if dead {
            slots.remove(&id);
        }
    }
}
