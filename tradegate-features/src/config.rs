//! Evaluator settings.

use crate::hash::HashStrategy;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::time::Duration;
use tradegate_config::{ConfigManager, ConfigValidator, Result, Validate};

/// Environment prefix read by [`EvaluatorConfig::from_env`].
pub const ENV_PREFIX: &str = "TRADEGATE_FEATURES";

/// Longest allowed cache lifetime.
pub const MAX_CACHE_TTL_SECS: u64 = 86_400;

/// Evaluator settings.
///
/// Every field has a default, so an empty [`ConfigManager`] yields
/// [`EvaluatorConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// Cache registry lookups
    pub cache_enabled: bool,
    /// How long a lookup stays fresh
    pub cache_ttl_secs: u64,
    /// Bound on cached lookups
    pub cache_max_entries: usize,
    /// Role granting the admin bypass
    #[serde(deserialize_with = "scalar_string")]
    pub admin_role: String,
    /// Bucketing hash
    pub hash_strategy: HashStrategy,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            cache_ttl_secs: 60,
            cache_max_entries: tradegate_cache::config::DEFAULT_MAX_ENTRIES,
            admin_role: "admin".to_string(),
            hash_strategy: HashStrategy::Legacy,
        }
    }
}

impl EvaluatorConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Pull the cache settings back into their valid ranges.
    pub fn clamped(mut self) -> Self {
        self.cache_ttl_secs = self.cache_ttl_secs.clamp(1, MAX_CACHE_TTL_SECS);
        self.cache_max_entries = self.cache_max_entries.max(1);
        self
    }

    /// Deserialize and validate from a populated manager.
    pub fn from_manager(manager: &ConfigManager) -> Result<Self> {
        manager.load_validated()
    }

    /// Read `TRADEGATE_FEATURES_*` variables.
    pub fn from_env() -> Result<Self> {
        let manager = ConfigManager::with_prefix(ENV_PREFIX);
        manager.load_env()?;
        Self::from_manager(&manager)
    }
}

/// Environment loading turns `ADMIN_ROLE=123` into a number; take it back as text.
fn scalar_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(D::Error::custom(format!("expected a string, found {}", other))),
    }
}

impl Validate for EvaluatorConfig {
    fn validate(&self) -> Result<()> {
        ConfigValidator::in_range(self.cache_ttl_secs, 1, MAX_CACHE_TTL_SECS, "cache_ttl_secs")?;
        ConfigValidator::in_range(self.cache_max_entries, 1, usize::MAX, "cache_max_entries")?;
        ConfigValidator::not_empty(&self.admin_role, "admin_role")
    }
}
