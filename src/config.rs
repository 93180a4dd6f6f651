//! Configuration Module
//!
//! Sizes caches from environment variables.

use std::env;

use crate::error::{CacheError, Result};

/// Default maximum number of entries
pub const DEFAULT_CAPACITY: usize = 1000;

/// Default TTL in seconds (0 = entries never expire)
pub const DEFAULT_TTL_SECS: i64 = 0;

/// Cache sizing parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// TTL in seconds applied by `Lru::add_default`; zero or negative disables expiry
    pub default_ttl_secs: i64,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `LRU_CAPACITY` - Maximum cache entries (default: 1000)
    /// - `LRU_DEFAULT_TTL` - Default TTL in seconds (default: 0, no expiry)
    pub fn from_env() -> Self {
        Self::from_env_with_prefix("LRU")
    }

    /// Same as [`CacheConfig::from_env`] but reads `{prefix}_CAPACITY` and
    /// `{prefix}_DEFAULT_TTL`, so each cache in a process can be sized on its own.
    pub fn from_env_with_prefix(prefix: &str) -> Self {
        Self {
            capacity: env::var(format!("{}_CAPACITY", prefix))
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_CAPACITY),
            default_ttl_secs: env::var(format!("{}_DEFAULT_TTL", prefix))
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_TTL_SECS),
        }
    }

    /// Rejects configurations a cache cannot be built from.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(CacheError::InvalidCapacity(self.capacity));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            default_ttl_secs: DEFAULT_TTL_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.capacity, 1000);
        assert_eq!(config.default_ttl_secs, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_env_defaults() {
        env::remove_var("CFGTEST_DEFAULTS_CAPACITY");
        env::remove_var("CFGTEST_DEFAULTS_DEFAULT_TTL");

        let config = CacheConfig::from_env_with_prefix("CFGTEST_DEFAULTS");
        assert_eq!(config, CacheConfig::default());
    }

    #[test]
    fn test_config_from_env_with_prefix() {
        env::set_var("CFGTEST_SESSIONS_CAPACITY", "64");
        env::set_var("CFGTEST_SESSIONS_DEFAULT_TTL", " 30 ");

        let config = CacheConfig::from_env_with_prefix("CFGTEST_SESSIONS");
        assert_eq!(config.capacity, 64);
        assert_eq!(config.default_ttl_secs, 30);
    }

    #[test]
    fn test_config_from_env_unparsable_falls_back() {
        env::set_var("CFGTEST_BROKEN_CAPACITY", "lots");
        env::set_var("CFGTEST_BROKEN_DEFAULT_TTL", "soon");

        let config = CacheConfig::from_env_with_prefix("CFGTEST_BROKEN");
        assert_eq!(config, CacheConfig::default());
    }

    #[test]
    fn test_config_validate_zero_capacity() {
        let config = CacheConfig {
            capacity: 0,
            default_ttl_secs: 10,
        };
        assert_eq!(config.validate(), Err(CacheError::InvalidCapacity(0)));
    }
}
