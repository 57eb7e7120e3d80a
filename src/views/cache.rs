//! Thread-safe cache of compiled view entries.
//!
//! The key map is guarded by a lock that is only held long enough to find
//! or create the slot for a key. Each slot has its own lock, held while the
//! cached entry is checked for currency and, if needed, rebuilt. Builds for
//! different keys therefore run in parallel, while builds for the same key
//! are serialized so at most one entry is ever committed per key.
//!
//! Lock order is always map, then slot, and the map lock is never waited on
//! while a slot lock is held.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::error::Result;

use super::entry::ViewEntry;
use super::key::ResolutionKey;

type Slot = Mutex<Option<Arc<dyn ViewEntry>>>;

/// Counters describing cache behaviour.
#[derive(Debug, Default)]
pub struct CacheStats {
    /// Lookups served by a current cached entry.
    pub hits: AtomicU64,
    /// Lookups that found no entry.
    pub misses: AtomicU64,
    /// Cached entries found stale and rebuilt.
    pub rebuilds: AtomicU64,
    /// Builds that failed and cached nothing.
    pub failures: AtomicU64,
}

impl CacheStats {
    /// Get hit rate (0.0 to 1.0)
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed) as f64;
        let total = hits
            + self.misses.load(Ordering::Relaxed) as f64
            + self.rebuilds.load(Ordering::Relaxed) as f64;
        if total > 0.0 {
            hits / total
        } else {
            0.0
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Hits: {}, Misses: {}, Rebuilds: {}, Failures: {}, Hit Rate: {:.2}%",
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
            self.rebuilds.load(Ordering::Relaxed),
            self.failures.load(Ordering::Relaxed),
            self.hit_rate() * 100.0,
        )
    }

    fn record(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Maps resolution keys to compiled view entries.
#[derive(Default)]
pub struct ViewCache {
    slots: Mutex<HashMap<ResolutionKey, Arc<Slot>>>,
    stats: CacheStats,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Return the current entry for `key`, building it with `build` on a
    /// miss or when the cached entry is stale.
    ///
    /// Build failures are returned as-is and nothing is cached for them.
    pub fn resolve<F>(&self, key: &ResolutionKey, build: F) -> Result<Arc<dyn ViewEntry>>
    where
        F: FnOnce(&ResolutionKey) -> Result<Arc<dyn ViewEntry>>,
    {
        let slot = self.slot(key);
        let mut cached = slot.lock();

        match cached.as_ref() {
            Some(entry) if entry.is_current() => {
                CacheStats::record(&self.stats.hits);
                debug!("View cache hit for '{}'", key.view_name);
                return Ok(Arc::clone(entry));
            }
            Some(entry) => {
                CacheStats::record(&self.stats.rebuilds);
                debug!(
                    "Cached view '{}' (entry {}) is stale, rebuilding",
                    key.view_name,
                    entry.id()
                );
                *cached = None;
            }
            None => {
                CacheStats::record(&self.stats.misses);
                debug!("View cache miss for '{}'", key.view_name);
            }
        }

        match build(key) {
            Ok(entry) => {
                *cached = Some(Arc::clone(&entry));
                Ok(entry)
            }
            Err(e) => {
                CacheStats::record(&self.stats.failures);
                drop(cached);
                self.discard_if_empty(key, &slot);
                Err(e)
            }
        }
    }

    /// The cached entry for `key`, only if it is still current.
    pub fn get(&self, key: &ResolutionKey) -> Option<Arc<dyn ViewEntry>> {
        let slot = self.slots.lock().get(key).cloned()?;
        let cached = slot.lock();
        cached
            .as_ref()
            .filter(|entry| entry.is_current())
            .map(Arc::clone)
    }

    /// Store `entry` under `key`, returning the entry it replaced.
    pub fn insert(
        &self,
        key: ResolutionKey,
        entry: Arc<dyn ViewEntry>,
    ) -> Option<Arc<dyn ViewEntry>> {
        let slot = self.slot(&key);
        let mut cached = slot.lock();
        cached.replace(entry)
    }

    /// Forget the entry for `key`. Returns whether a slot existed.
    pub fn invalidate(&self, key: &ResolutionKey) -> bool {
        self.slots.lock().remove(key).is_some()
    }

    /// Forget every entry, returning how many slots were dropped.
    pub fn clear(&self) -> usize {
        let mut slots = self.slots.lock();
        let count = slots.len();
        slots.clear();
        count
    }

    /// Number of committed entries.
    ///
    /// Waits for in-flight builds to finish.
    pub fn len(&self) -> usize {
        let slots: Vec<Arc<Slot>> = self.slots.lock().values().cloned().collect();
        slots.iter().filter(|slot| slot.lock().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, key: &ResolutionKey) -> Arc<Slot> {
        let mut slots = self.slots.lock();
        match slots.get(key) {
            Some(slot) => Arc::clone(slot),
            None => {
                let slot = Arc::new(Mutex::new(None));
                slots.insert(key.clone(), Arc::clone(&slot));
                slot
            }
        }
    }

    /// Drop the slot for `key` if it is still `slot`, holds nothing, and no
    /// other caller holds it.
    ///
    /// Slots are only cloned under the map lock, so with the map lock held a
    /// count of two (the map and `slot`) means no one else can commit into
    /// it. Uses `try_lock` so the map lock is never held while waiting on a
    /// slot.
    fn discard_if_empty(&self, key: &ResolutionKey, slot: &Arc<Slot>) {
        let mut slots = self.slots.lock();
        let empty = match slots.get(key) {
            Some(current) if Arc::ptr_eq(current, slot) && Arc::strong_count(slot) <= 2 => {
                current.try_lock().is_some_and(|cached| cached.is_none())
            }
            _ => false,
        };
        if empty {
            slots.remove(key);
        }
    }
}

impl std::fmt::Debug for ViewCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewCache")
            .field("slots", &self.slots.lock().len())
            .field("stats", &self.stats)
            .finish()
    }
}
