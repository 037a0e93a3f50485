//! Property-Based Tests for Cache Module
//!
//! Uses proptest to verify capacity, recency, and removal behavior over
//! generated operation sequences.

use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;

use crate::cache::MemoryCache;
use crate::scheduler::testing::ManualScheduler;

// == Test Configuration ==
const TEST_MAX_ITEMS: usize = 100;

fn test_cache<T: Clone + Send + 'static>(max_items: usize) -> MemoryCache<T> {
    MemoryCache::with_scheduler(max_items, Arc::new(ManualScheduler::new()))
}

// == Strategies ==
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,64}"
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,256}"
}

/// Generates a sequence of cache operations for testing
#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
    Clear { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
        key_strategy().prop_map(|key| CacheOp::Clear { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // For any sequence of set calls, the number of live entries never
    // exceeds the configured capacity.
    #[test]
    fn prop_capacity_bound(
        entries in prop::collection::vec((key_strategy(), value_strategy()), 1..200)
    ) {
        let max_items = 50;
        let cache = test_cache(max_items);

        for (key, value) in entries {
            cache.set(&key, value, None).unwrap();
            prop_assert!(
                cache.len() <= max_items,
                "Cache size {} exceeds max {}",
                cache.len(),
                max_items
            );
        }
    }

    // Storing a value and reading it back (before expiry) returns the
    // stored value.
    #[test]
    fn prop_roundtrip_storage(key in key_strategy(), value in value_strategy()) {
        let cache = test_cache(TEST_MAX_ITEMS);

        cache.set(&key, value.clone(), None).unwrap();
        prop_assert_eq!(cache.get(&key).unwrap(), Some(value));
    }

    // Overwriting a key leaves exactly one entry holding the new value.
    #[test]
    fn prop_overwrite_semantics(
        key in key_strategy(),
        value1 in value_strategy(),
        value2 in value_strategy()
    ) {
        let cache = test_cache(TEST_MAX_ITEMS);

        cache.set(&key, value1, None).unwrap();
        cache.set(&key, value2.clone(), None).unwrap();

        prop_assert_eq!(cache.get(&key).unwrap(), Some(value2));
        prop_assert_eq!(cache.len(), 1);
    }

    // clear returns true exactly when the key was present, and a second
    // clear always returns false.
    #[test]
    fn prop_clear_semantics(key in key_strategy(), value in value_strategy()) {
        let cache = test_cache(TEST_MAX_ITEMS);

        prop_assert!(!cache.clear(&key).unwrap());

        cache.set(&key, value, None).unwrap();
        prop_assert!(cache.clear(&key).unwrap());
        prop_assert_eq!(cache.get(&key).unwrap(), None);
        prop_assert!(!cache.clear(&key).unwrap());
    }

    // Filling the cache to capacity and adding one more entry evicts
    // exactly the least recently used key.
    #[test]
    fn prop_lru_eviction_order(
        initial_keys in prop::collection::vec(key_strategy(), 3..10),
        new_key in key_strategy(),
        new_value in value_strategy()
    ) {
        let unique_keys: Vec<String> = initial_keys
            .into_iter()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        prop_assume!(unique_keys.len() >= 2);
        prop_assume!(!unique_keys.contains(&new_key));

        let capacity = unique_keys.len();
        let cache = test_cache(capacity);

        // First key written becomes the eviction candidate.
        let oldest_key = unique_keys[0].clone();
        for key in &unique_keys {
            cache.set(key, format!("value_{}", key), None).unwrap();
        }
        prop_assert_eq!(cache.len(), capacity);

        cache.set(&new_key, new_value, None).unwrap();

        prop_assert_eq!(cache.len(), capacity);
        prop_assert_eq!(cache.get(&oldest_key).unwrap(), None);
        prop_assert!(cache.get(&new_key).unwrap().is_some());
        for key in unique_keys.iter().skip(1) {
            prop_assert!(
                cache.get(key).unwrap().is_some(),
                "Key '{}' should still exist (not the oldest)",
                key
            );
        }
    }

    // A get on an existing key makes it most recently used, so it is not
    // the next eviction victim.
    #[test]
    fn prop_lru_access_tracking(
        keys in prop::collection::vec(key_strategy(), 3..8),
        new_key in key_strategy(),
        new_value in value_strategy()
    ) {
        let unique_keys: Vec<String> = keys
            .into_iter()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        prop_assume!(unique_keys.len() >= 3);
        prop_assume!(!unique_keys.contains(&new_key));

        let capacity = unique_keys.len();
        let cache = test_cache(capacity);

        for key in &unique_keys {
            cache.set(key, format!("value_{}", key), None).unwrap();
        }

        // Touch the would-be victim; the second key becomes the victim.
        let accessed_key = unique_keys[0].clone();
        let expected_evicted = unique_keys[1].clone();
        prop_assert!(cache.get(&accessed_key).unwrap().is_some());

        cache.set(&new_key, new_value, None).unwrap();

        prop_assert!(cache.get(&accessed_key).unwrap().is_some());
        prop_assert_eq!(cache.get(&expected_evicted).unwrap(), None);
        prop_assert!(cache.get(&new_key).unwrap().is_some());
    }

    // Statistics reflect the hits and misses of the operations actually
    // performed.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..50)) {
        let cache = test_cache(TEST_MAX_ITEMS);
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    cache.set(&key, value, None).unwrap();
                }
                CacheOp::Get { key } => match cache.get(&key).unwrap() {
                    Some(_) => expected_hits += 1,
                    None => expected_misses += 1,
                },
                CacheOp::Clear { key } => {
                    let _ = cache.clear(&key).unwrap();
                }
            }
        }

        let stats = cache.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.live_entries, cache.len(), "Live entries mismatch");
    }
}
