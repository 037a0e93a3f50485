//! memo_cache - A lightweight in-memory cache
//!
//! Provides a thread-safe key/value cache with LRU eviction at a
//! configurable capacity and scheduler-driven per-entry expiry, plus the
//! [`Cache`] contract alternative backends implement to stay
//! interchangeable with the in-memory engine.
//!
//! ```
//! use memo_cache::MemoryCache;
//!
//! #[tokio::main]
//! async fn main() -> memo_cache::Result<()> {
//!     // Hold at most two entries; expire "b" after five seconds.
//!     let cache = MemoryCache::new(2);
//!     cache.set("a", "alpha".to_string(), None)?;
//!     cache.set("b", "beta".to_string(), Some(5.0))?;
//!
//!     assert_eq!(cache.get("a")?, Some("alpha".to_string()));
//!
//!     // "b" is now least recently used, so a third entry evicts it.
//!     cache.set("c", "gamma".to_string(), None)?;
//!     assert_eq!(cache.get("b")?, None);
//!
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod contract;
pub mod error;
pub mod remote;
pub mod scheduler;

pub use cache::{CacheEntry, CacheStats, MemoryCache};
pub use config::CacheConfig;
pub use contract::Cache;
pub use error::{CacheError, Result};
pub use remote::RemoteCache;
pub use scheduler::{Cancellation, Scheduler, Task, TokioScheduler};
