//! Cache Store Module
//!
//! The in-memory cache engine: a recency-ordered entry table with LRU
//! eviction at capacity and scheduler-driven per-entry expiry.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use linked_hash_map::LinkedHashMap;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats};
use crate::config::CacheConfig;
use crate::contract::Cache;
use crate::error::Result;
use crate::scheduler::{delay_from_secs, Cancellation, Scheduler, TokioScheduler};

// == Cache State ==
/// Everything guarded by the engine lock.
struct CacheState<T> {
    /// Entries in recency order: least recently used at the front, most
    /// recently touched at the back. Refreshed on every successful get
    /// and every set, so iteration order *is* the eviction order.
    entries: LinkedHashMap<String, CacheEntry<T>>,
    /// Performance statistics
    stats: CacheStats,
    /// Source for entry generations; bumped on every set so a timer armed
    /// for an overwritten entry can recognize itself as stale.
    next_generation: u64,
}

fn lock<T>(state: &Mutex<CacheState<T>>) -> MutexGuard<'_, CacheState<T>> {
    // A panic cannot leave the table half-updated, so a poisoned lock is
    // still usable.
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

// == Memory Cache ==
/// Thread-safe in-memory cache with LRU eviction and per-entry expiry.
///
/// All operations serialize on one internal lock; lock hold time is
/// bounded by the number of entries evicted in a single `set`. Cloning
/// yields another handle to the same cache; separate instances share
/// nothing.
///
/// Expiry timers run on the injected [`Scheduler`]. A timer's callback
/// captures the entry's generation and removes the entry only if the
/// generation still matches, so a timer racing a newer `set` or a
/// `clear` on the same key can never remove the newer value.
pub struct MemoryCache<T> {
    state: Arc<Mutex<CacheState<T>>>,
    scheduler: Arc<dyn Scheduler>,
    /// Maximum number of entries, 0 = unbounded
    max_items: usize,
}

impl<T: Clone + Send + 'static> MemoryCache<T> {
    // == Constructors ==
    /// Creates a cache holding at most `max_items` entries (0 = unbounded),
    /// scheduling expiry on the current tokio runtime.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime; use
    /// [`with_scheduler`](MemoryCache::with_scheduler) to inject a
    /// scheduler explicitly.
    pub fn new(max_items: usize) -> Self {
        Self::with_scheduler(max_items, Arc::new(TokioScheduler::new()))
    }

    /// Creates a cache that arms expiry timers on the given scheduler.
    pub fn with_scheduler(max_items: usize, scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            state: Arc::new(Mutex::new(CacheState {
                entries: LinkedHashMap::new(),
                stats: CacheStats::new(),
                next_generation: 0,
            })),
            scheduler,
            max_items,
        }
    }

    /// Creates a cache from configuration, scheduling on the current
    /// tokio runtime.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.max_items)
    }

    // == Get ==
    /// Queries the cache for the value under the given key.
    ///
    /// Returns `Ok(Some(value))` if the key is present and unexpired,
    /// marking the entry as most recently used. Returns `Ok(None)`
    /// otherwise. An entry whose deadline passed before its timer fired
    /// is removed here rather than served stale.
    pub fn get(&self, key: &str) -> Result<Option<T>> {
        let mut guard = lock(&self.state);
        let state = &mut *guard;

        let expired = match state.entries.get(key) {
            Some(entry) => entry.is_expired(),
            None => {
                state.stats.record_miss();
                return Ok(None);
            }
        };

        if expired {
            // Removing the entry drops it, cancelling the pending timer.
            if state.entries.remove(key).is_some() {
                state.stats.record_expiration();
                debug!(key, "removed expired entry on read");
            }
            state.stats.record_miss();
            return Ok(None);
        }

        // Live entry: refresh recency and hand out a copy.
        let value = state
            .entries
            .get_refresh(key)
            .map(|entry| entry.value.clone());
        state.stats.record_hit();
        Ok(value)
    }

    // == Set ==
    /// Caches the given value under the given key, marking it most
    /// recently used and optionally expiring it after
    /// `expire_after_seconds`.
    ///
    /// Overwriting a key cancels its previous timer and re-arms a new one
    /// if a duration is given; a duration of zero arms a zero-delay timer
    /// rather than removing synchronously, so removal ordering always
    /// follows the scheduler path. If the table then exceeds capacity,
    /// least recently used entries are evicted (their timers cancelled)
    /// until the table fits; the entry just inserted sits at the most
    /// recent end and is never its own victim.
    ///
    /// A negative or non-finite duration is rejected before any state
    /// changes.
    pub fn set(&self, key: &str, value: T, expire_after_seconds: Option<f64>) -> Result<()> {
        // Validate up front: state must be untouched on error.
        let ttl = expire_after_seconds.map(delay_from_secs).transpose()?;

        let mut guard = lock(&self.state);
        let state = &mut *guard;

        let generation = state.next_generation;
        state.next_generation += 1;

        // Replacing an entry drops it, cancelling any prior timer.
        drop(state.entries.remove(key));

        // Arm the timer before inserting: the fire handler serializes on
        // the engine lock, so it cannot run until this call releases it,
        // and it will then find a matching generation.
        let timer = match expire_after_seconds {
            Some(seconds) => Some(self.arm_expiry(key, generation, seconds)?),
            None => None,
        };

        state
            .entries
            .insert(key.to_string(), CacheEntry::new(value, ttl, generation, timer));

        while self.max_items > 0 && state.entries.len() > self.max_items {
            if let Some((evicted, _entry)) = state.entries.pop_front() {
                state.stats.record_eviction();
                debug!(key = %evicted, "evicted least recently used entry");
            }
        }

        Ok(())
    }

    // == Clear ==
    /// Clears the value, if any, cached under the given key, cancelling
    /// its pending timer. Returns whether a value was cached.
    pub fn clear(&self, key: &str) -> Result<bool> {
        let mut guard = lock(&self.state);
        match guard.entries.remove(key) {
            Some(_entry) => {
                debug!(key, "cleared entry");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // == Expiry ==
    fn arm_expiry(&self, key: &str, generation: u64, delay_seconds: f64) -> Result<Cancellation> {
        let state = Arc::downgrade(&self.state);
        let key = key.to_string();

        self.scheduler.run_once_after(
            delay_seconds,
            Box::new(move || expire_entry(state, &key, generation)),
        )
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let guard = lock(&self.state);
        let mut stats = guard.stats.clone();
        stats.live_entries = guard.entries.len();
        stats
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        lock(&self.state).entries.len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the configured capacity (0 = unbounded).
    pub fn max_items(&self) -> usize {
        self.max_items
    }
}

/// Timer-driven removal. The entry is removed only if it still exists
/// and its generation matches the timer that fired: a stale timer racing
/// a newer `set`, a `clear`, or a dropped cache is a no-op.
fn expire_entry<T>(state: Weak<Mutex<CacheState<T>>>, key: &str, generation: u64) {
    let state = match state.upgrade() {
        Some(state) => state,
        None => return,
    };
    let mut guard = lock(&state);
    let state = &mut *guard;

    let live_generation = state.entries.get(key).map(|entry| entry.generation());
    if live_generation == Some(generation) && state.entries.remove(key).is_some() {
        state.stats.record_expiration();
        debug!(key, "entry expired");
    }
}

impl<T> Clone for MemoryCache<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            scheduler: Arc::clone(&self.scheduler),
            max_items: self.max_items,
        }
    }
}

impl<T> fmt::Debug for MemoryCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryCache")
            .field("max_items", &self.max_items)
            .finish_non_exhaustive()
    }
}

// == Cache Contract ==
impl<T: Clone + Send + 'static> Cache<T> for MemoryCache<T> {
    fn get(&self, key: &str) -> Result<Option<T>> {
        MemoryCache::get(self, key)
    }

    fn set(&self, key: &str, value: T, expire_after_seconds: Option<f64>) -> Result<()> {
        MemoryCache::set(self, key, value, expire_after_seconds)
    }

    fn clear(&self, key: &str) -> Result<bool> {
        MemoryCache::clear(self, key)
    }
}
