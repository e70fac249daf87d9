//! Short-lived cache of registry lookups.
//!
//! Entries hold the flag configuration (or the fact that it does not exist),
//! never a per-user decision, so one caller's bucket cannot leak to another.

use crate::flag::FeatureFlag;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tradegate_cache::{CacheStore, helpers};
use tradegate_log::warn;

const KEY_PREFIX: &str = "feature_flag";

/// A remembered registry answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CachedLookup {
    Found { flag: FeatureFlag },
    Missing,
}

impl CachedLookup {
    pub fn into_flag(self) -> Option<FeatureFlag> {
        match self {
            CachedLookup::Found { flag } => Some(flag),
            CachedLookup::Missing => None,
        }
    }
}

impl From<Option<FeatureFlag>> for CachedLookup {
    fn from(flag: Option<FeatureFlag>) -> Self {
        match flag {
            Some(flag) => CachedLookup::Found { flag },
            None => CachedLookup::Missing,
        }
    }
}

/// Lookup cache over any [`CacheStore`].
///
/// Store failures are logged and treated as misses; the registry stays the
/// source of truth. The store may be shared, so the cache remembers which keys
/// it wrote and [`clear`](Self::clear) removes only those.
#[derive(Clone)]
pub struct FlagCache {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
    written: Arc<RwLock<HashSet<String>>>,
}

impl FlagCache {
    pub fn new(store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self {
            store,
            ttl,
            written: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn key(name: &str) -> String {
        format!("{}:{}", KEY_PREFIX, name)
    }

    pub async fn get(&self, name: &str) -> Option<CachedLookup> {
        match helpers::get(self.store.as_ref(), &Self::key(name)).await {
            Ok(lookup) => lookup,
            Err(e) => {
                warn!(target: "tradegate::features", "Ignoring unreadable cache entry for '{}': {}", name, e);
                None
            }
        }
    }

    pub async fn put(&self, name: &str, lookup: &CachedLookup) {
        let key = Self::key(name);
        match helpers::set(self.store.as_ref(), &key, lookup, Some(self.ttl)).await {
            Ok(()) => {
                self.written.write().await.insert(key);
            }
            Err(e) => {
                warn!(target: "tradegate::features", "Failed to cache flag '{}': {}", name, e);
            }
        }
    }

    pub async fn invalidate(&self, name: &str) {
        let key = Self::key(name);
        if let Err(e) = self.store.delete(&key).await {
            warn!(target: "tradegate::features", "Failed to invalidate flag '{}': {}", name, e);
        }
        self.written.write().await.remove(&key);
    }

    /// Delete every flag entry this cache wrote. Other keys in the store are kept.
    pub async fn clear(&self) {
        let mut written = self.written.write().await;
        let keys: Vec<&str> = written.iter().map(String::as_str).collect();
        if let Err(e) = self.store.delete_many(&keys).await {
            warn!(target: "tradegate::features", "Failed to clear flag cache: {}", e);
            return;
        }
        written.clear();
    }
}
