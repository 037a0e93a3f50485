//! Remote Cache Module
//!
//! Placeholder for an out-of-process cache backend implementing the same
//! [`Cache`] contract as the in-memory engine.

use crate::contract::Cache;
use crate::error::{CacheError, Result};

const BACKEND: &str = "remote cache backend";

// == Remote Cache ==
/// Not-yet-implemented remote backend.
///
/// Every operation fails with [`CacheError::Unimplemented`]. It must
/// never pretend to be an always-empty cache: callers relying on a
/// remote backend for persistence would silently lose data.
#[derive(Debug, Default)]
pub struct RemoteCache;

impl RemoteCache {
    pub fn new() -> Self {
        Self
    }
}

impl<T> Cache<T> for RemoteCache {
    fn get(&self, _key: &str) -> Result<Option<T>> {
        Err(CacheError::Unimplemented(BACKEND))
    }

    fn set(&self, _key: &str, _value: T, _expire_after_seconds: Option<f64>) -> Result<()> {
        Err(CacheError::Unimplemented(BACKEND))
    }

    fn clear(&self, _key: &str) -> Result<bool> {
        Err(CacheError::Unimplemented(BACKEND))
    }
}
