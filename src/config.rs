//! Configuration Module
//!
//! Per-cache sizing and timing, with presets for each cache kind and
//! overrides loaded from environment variables.

use std::env;

use crate::cache::DEFAULT_TTL_MS;
use crate::error::{CacheError, Result};

/// Sizing and timing for one cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// TTL in milliseconds for entries set without an explicit one
    pub default_ttl_ms: u64,
    /// Period of the background expiry sweep in milliseconds
    pub sweep_interval_ms: u64,
}

impl CacheConfig {
    pub fn new(capacity: usize, default_ttl_ms: u64, sweep_interval_ms: u64) -> Self {
        Self {
            capacity,
            default_ttl_ms,
            sweep_interval_ms,
        }
    }

    /// General-purpose cache: 100 entries, 5 min TTL, 1 min sweep.
    pub fn general() -> Self {
        Self::new(100, DEFAULT_TTL_MS, MINUTE_MS)
    }

    /// Decoded media assets: 50 entries, 30 min TTL, 5 min sweep.
    pub fn media() -> Self {
        Self::new(50, 30 * MINUTE_MS, 5 * MINUTE_MS)
    }

    /// User profiles and post lists: 200 entries, 30 min TTL, 10 min sweep.
    pub fn users() -> Self {
        Self::new(200, 30 * MINUTE_MS, 10 * MINUTE_MS)
    }

    /// Posts, trending and search results: 100 entries, 20 min TTL, 5 min sweep.
    pub fn content() -> Self {
        Self::new(100, 20 * MINUTE_MS, 5 * MINUTE_MS)
    }

    /// Rejects zero capacity, TTL or sweep interval. Values are never clamped.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(CacheError::InvalidConfig(
                "capacity must be greater than 0".to_string(),
            ));
        }
        if self.default_ttl_ms == 0 {
            return Err(CacheError::InvalidConfig(
                "default TTL must be greater than 0".to_string(),
            ));
        }
        if self.sweep_interval_ms == 0 {
            return Err(CacheError::InvalidConfig(
                "sweep interval must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Overrides preset values from `<PREFIX>_CAPACITY`,
    /// `<PREFIX>_DEFAULT_TTL_MS` and `<PREFIX>_SWEEP_INTERVAL_MS`.
    ///
    /// Missing or unparsable variables keep the preset value.
    pub fn from_env_with_prefix(prefix: &str, preset: Self) -> Self {
        Self {
            capacity: env_or(&format!("{prefix}_CAPACITY"), preset.capacity),
            default_ttl_ms: env_or(&format!("{prefix}_DEFAULT_TTL_MS"), preset.default_ttl_ms),
            sweep_interval_ms: env_or(
                &format!("{prefix}_SWEEP_INTERVAL_MS"),
                preset.sweep_interval_ms,
            ),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::general()
    }
}

/// Configuration for all four caches owned by the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManagerConfig {
    pub general: CacheConfig,
    pub media: CacheConfig,
    pub users: CacheConfig,
    pub content: CacheConfig,
}

impl ManagerConfig {
    /// Loads every cache's configuration from the environment.
    ///
    /// # Environment Variables
    /// Prefixes `GENERAL_CACHE`, `MEDIA_CACHE`, `USER_CACHE` and `CONTENT_CACHE`,
    /// each with `_CAPACITY`, `_DEFAULT_TTL_MS` and `_SWEEP_INTERVAL_MS`.
    pub fn from_env() -> Self {
        Self {
            general: CacheConfig::from_env_with_prefix("GENERAL_CACHE", CacheConfig::general()),
            media: CacheConfig::from_env_with_prefix("MEDIA_CACHE", CacheConfig::media()),
            users: CacheConfig::from_env_with_prefix("USER_CACHE", CacheConfig::users()),
            content: CacheConfig::from_env_with_prefix("CONTENT_CACHE", CacheConfig::content()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.general.validate()?;
        self.media.validate()?;
        self.users.validate()?;
        self.content.validate()
    }
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            general: CacheConfig::general(),
            media: CacheConfig::media(),
            users: CacheConfig::users(),
            content: CacheConfig::content(),
        }
    }
}

const MINUTE_MS: u64 = 60_000;

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
