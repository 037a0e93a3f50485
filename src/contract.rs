//! Cache Contract Module
//!
//! The interface every cache backend implements, so callers can swap the
//! in-memory engine for an alternative backend (e.g. a remote store)
//! without changing call sites.

use crate::error::Result;

// == Cache Trait ==
/// Contract for a key/value cache with optional per-entry expiry.
///
/// Implemented by [`MemoryCache`](crate::MemoryCache) and by any
/// alternative backend; callers that should not care which one they are
/// talking to can hold an `Arc<dyn Cache<T>>`.
pub trait Cache<T>: Send + Sync {
    /// Queries the cache for the value under the given key.
    ///
    /// Returns `Ok(Some(value))` if the key is present and unexpired,
    /// marking the entry as most recently used. Returns `Ok(None)` if the
    /// key is absent or expired; a miss is never an error.
    fn get(&self, key: &str) -> Result<Option<T>>;

    /// Caches the given value under the given key, optionally expiring
    /// after the given number of seconds.
    ///
    /// Overwrites any existing entry for the key and marks it most
    /// recently used. A negative or non-finite duration is rejected with
    /// [`CacheError::InvalidDuration`](crate::CacheError::InvalidDuration)
    /// before any state changes.
    fn set(&self, key: &str, value: T, expire_after_seconds: Option<f64>) -> Result<()>;

    /// Clears the value, if any, cached under the given key.
    ///
    /// Returns whether a value was cached (and thus cleared). Clearing an
    /// absent key is a no-op returning `Ok(false)`.
    fn clear(&self, key: &str) -> Result<bool>;
}
