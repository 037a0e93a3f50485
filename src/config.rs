//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;

use crate::error::{CacheError, Result};

/// Environment variable naming the cache capacity.
const MAX_ITEMS_VAR: &str = "CACHE_MAX_ITEMS";

/// Default capacity: unbounded.
const DEFAULT_MAX_ITEMS: usize = 0;

/// Cache configuration parameters.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold, 0 = unbounded
    pub max_items: usize,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment
    /// variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_ITEMS` - Maximum cache entries, 0 = unbounded
    ///   (default: 0)
    ///
    /// A set but unparseable value (including a negative number) fails
    /// with [`CacheError::InvalidCapacity`] rather than silently falling
    /// back to the default.
    pub fn from_env() -> Result<Self> {
        let max_items = match env::var(MAX_ITEMS_VAR) {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| CacheError::InvalidCapacity(raw))?,
            Err(_) => DEFAULT_MAX_ITEMS,
        };

        Ok(Self { max_items })
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_items: DEFAULT_MAX_ITEMS,
        }
    }
}
