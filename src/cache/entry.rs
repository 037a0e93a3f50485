//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with expiry support.

use std::time::{Duration, Instant};

use crate::scheduler::Cancellation;

// == Cache Entry ==
/// A single cache entry: the stored value plus expiry metadata.
///
/// The generation is a version counter captured by the entry's expiry
/// timer when it is armed; a timer whose generation no longer matches the
/// table's entry fires as a no-op. Dropping an entry cancels its pending
/// timer, so every removal path (clear, overwrite, eviction, expiry)
/// releases the timer without extra bookkeeping.
#[derive(Debug)]
pub struct CacheEntry<T> {
    /// The stored value
    pub value: T,
    /// Deadline after which the entry no longer counts as live,
    /// None = no expiration
    expires_at: Option<Instant>,
    /// Version counter guarding against stale timer fires
    generation: u64,
    /// Handle for the armed expiry timer, if any
    timer: Option<Cancellation>,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    pub(crate) fn new(
        value: T,
        ttl: Option<Duration>,
        generation: u64,
        timer: Option<Cancellation>,
    ) -> Self {
        Self {
            value,
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
            generation,
            timer,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry's deadline has passed.
    ///
    /// Boundary condition: an entry is expired when the current instant
    /// is greater than or equal to the deadline, so a zero TTL counts as
    /// expired immediately.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Instant::now() >= expires_at,
            None => false,
        }
    }

    // == Remaining TTL ==
    /// Returns the remaining time to live, or None if the entry never
    /// expires. An already-expired entry reports a zero remainder.
    pub fn remaining_ttl(&self) -> Option<Duration> {
        self.expires_at
            .map(|expires_at| expires_at.saturating_duration_since(Instant::now()))
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }
}

impl<T> Drop for CacheEntry<T> {
    fn drop(&mut self) {
        if let Some(timer) = &self.timer {
            timer.cancel();
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::thread::sleep;

    use super::*;

    #[test]
    fn test_entry_without_ttl_never_expires() {
        let entry = CacheEntry::new("value", None, 0, None);
        assert!(!entry.is_expired());
        assert!(entry.remaining_ttl().is_none());
    }

    #[test]
    fn test_entry_with_ttl_expires() {
        let entry = CacheEntry::new("value", Some(Duration::from_millis(20)), 0, None);
        assert!(!entry.is_expired());

        sleep(Duration::from_millis(40));
        assert!(entry.is_expired());
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let entry = CacheEntry::new("value", Some(Duration::ZERO), 0, None);
        assert!(entry.is_expired());
        assert_eq!(entry.remaining_ttl(), Some(Duration::ZERO));
    }

    #[test]
    fn test_remaining_ttl_counts_down() {
        let entry = CacheEntry::new("value", Some(Duration::from_secs(10)), 0, None);

        let remaining = entry.remaining_ttl().unwrap();
        assert!(remaining <= Duration::from_secs(10));
        assert!(remaining >= Duration::from_secs(9));
    }

    #[test]
    fn test_drop_cancels_timer() {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        let entry = CacheEntry::new(
            "value",
            Some(Duration::from_secs(60)),
            0,
            Some(Cancellation::new(move || flag.store(true, Ordering::SeqCst))),
        );

        drop(entry);
        assert!(cancelled.load(Ordering::SeqCst));
    }
}
