//! Error types for the cache library
//!
//! Provides unified error handling using thiserror.
//!
//! A lookup miss is not an error: `get` reports it as `Ok(None)` and
//! `clear` on an absent key as `Ok(false)`. Errors are reserved for
//! invalid configuration and unimplemented backends.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache library.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Expiry or timer duration is negative, NaN, or infinite
    #[error("Invalid duration: {0} seconds (must be non-negative and finite)")]
    InvalidDuration(f64),

    /// Capacity configuration could not be parsed
    #[error("Invalid capacity: {0:?}")]
    InvalidCapacity(String),

    /// Backend exists as a contract placeholder only
    #[error("Unimplemented backend: {0}")]
    Unimplemented(&'static str),
}

// == Result Type Alias ==
/// Convenience Result type for the cache library.
pub type Result<T> = std::result::Result<T, CacheError>;

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CacheError::InvalidDuration(-1.5);
        assert!(err.to_string().contains("-1.5"));

        let err = CacheError::InvalidCapacity("abc".to_string());
        assert!(err.to_string().contains("abc"));

        let err = CacheError::Unimplemented("remote cache backend");
        assert!(err.to_string().contains("remote cache backend"));
    }
}
