//! Cache configuration types.

use std::time::Duration;

/// Default number of entries an in-memory store holds before evicting.
pub const DEFAULT_MAX_ENTRIES: usize = 1024;

/// Cache configuration.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Key prefix for all cache keys
    pub key_prefix: Option<String>,

    /// TTL applied when a write does not specify one
    pub default_ttl: Option<Duration>,

    /// Upper bound on stored entries
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            key_prefix: None,
            default_ttl: None,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

impl CacheConfig {
    /// Create a configuration with defaults.
    ///
    /// # Examples
    ///
    /// ```
    /// use tradegate_cache::CacheConfig;
    /// use std::time::Duration;
    ///
    /// let config = CacheConfig::new()
    ///     .with_key_prefix("flags")
    ///     .with_default_ttl(Duration::from_secs(60));
    /// assert_eq!(config.build_key("checkout"), "flags:checkout");
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the key prefix.
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    /// Set the default TTL.
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = Some(ttl);
        self
    }

    /// Set the maximum number of stored entries.
    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = max;
        self
    }

    /// Build the final key with prefix if configured.
    pub fn build_key(&self, key: &str) -> String {
        match &self.key_prefix {
            Some(prefix) => format!("{}:{}", prefix, key),
            None => key.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.max_entries, DEFAULT_MAX_ENTRIES);
        assert!(config.default_ttl.is_none());
    }

    #[test]
    fn test_build_key() {
        let config = CacheConfig::new().with_key_prefix("feature_flag");
        assert_eq!(config.build_key("beta"), "feature_flag:beta");
        assert_eq!(CacheConfig::new().build_key("beta"), "beta");
    }
}
