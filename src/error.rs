//! Error types for the cache subsystem
//!
//! Cache misses are not errors and never show up here. Failures from loaders
//! and memoized operations keep their own error type and are not wrapped.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A capacity, TTL or sweep interval was rejected at construction
    #[error("Invalid cache configuration: {0}")]
    InvalidConfig(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache subsystem.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_message() {
        let err = CacheError::InvalidConfig("capacity must be greater than 0".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid cache configuration: capacity must be greater than 0"
        );
    }
}
