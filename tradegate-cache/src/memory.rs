//! Bounded in-process TTL cache.

use crate::config::CacheConfig;
use crate::error::CacheResult;
use crate::traits::CacheStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tradegate_log::debug;

#[derive(Clone)]
struct CacheEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|exp| exp > now)
    }
}

/// In-memory cache store.
///
/// Expiry uses `tokio::time::Instant`, so tests can drive it with
/// `tokio::time::pause` and `advance`. Capacity is bounded by
/// [`CacheConfig::max_entries`]; a full cache first drops expired entries and
/// then evicts whichever entry is closest to expiring (entries without a TTL
/// go last).
#[derive(Clone)]
pub struct InMemoryCache {
    data: Arc<RwLock<HashMap<String, CacheEntry>>>,
    config: CacheConfig,
}

impl InMemoryCache {
    /// Create a cache with default configuration.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Create a cache with custom configuration.
    ///
    /// A `max_entries` of zero is raised to one.
    pub fn with_config(mut config: CacheConfig) -> Self {
        config.max_entries = config.max_entries.max(1);
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Drop every expired entry, returning how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let mut data = self.data.write().await;
        let before = data.len();
        let now = Instant::now();
        data.retain(|_, entry| entry.is_live(now));
        before - data.len()
    }

    fn make_room(&self, data: &mut HashMap<String, CacheEntry>) {
        let now = Instant::now();
        data.retain(|_, entry| entry.is_live(now));

        while data.len() >= self.config.max_entries {
            let victim = data
                .iter()
                .min_by_key(|(_, entry)| (entry.expires_at.is_none(), entry.expires_at))
                .map(|(key, _)| key.clone());

            match victim {
                Some(key) => {
                    debug!(target: "tradegate::cache", "Evicting '{}' to stay within capacity", key);
                    data.remove(&key);
                }
                None => break,
            }
        }
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for InMemoryCache {
    async fn get_json(&self, key: &str) -> CacheResult<Option<String>> {
        let key = self.config.build_key(key);
        let data = self.data.read().await;
        Ok(data
            .get(&key)
            .filter(|entry| entry.is_live(Instant::now()))
            .map(|entry| entry.value.clone()))
    }

    async fn set_json(&self, key: &str, value: String, ttl: Option<Duration>) -> CacheResult<()> {
        let key = self.config.build_key(key);
        // a TTL past the clock's range never expires
        let expires_at = ttl
            .or(self.config.default_ttl)
            .and_then(|ttl| Instant::now().checked_add(ttl));

        let mut data = self.data.write().await;
        if !data.contains_key(&key) {
            self.make_room(&mut data);
        }
        data.insert(key, CacheEntry { value, expires_at });
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        let key = self.config.build_key(key);
        self.data.write().await.remove(&key);
        Ok(())
    }

    async fn clear(&self) -> CacheResult<()> {
        self.data.write().await.clear();
        Ok(())
    }

    async fn ttl(&self, key: &str) -> CacheResult<Option<Duration>> {
        let key = self.config.build_key(key);
        let data = self.data.read().await;
        let now = Instant::now();
        Ok(data
            .get(&key)
            .and_then(|entry| entry.expires_at)
            .filter(|exp| *exp > now)
            .map(|exp| exp - now))
    }

    async fn len(&self) -> CacheResult<usize> {
        Ok(self.data.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_delete() {
        let cache = InMemoryCache::new();
        cache.set_json("a", "1".to_string(), None).await.unwrap();
        assert_eq!(cache.get_json("a").await.unwrap(), Some("1".to_string()));
        assert!(cache.exists("a").await.unwrap());

        cache.delete("a").await.unwrap();
        assert_eq!(cache.get_json("a").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_expire() {
        let cache = InMemoryCache::new();
        cache
            .set_json("a", "1".to_string(), Some(Duration::from_secs(60)))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(cache.get_json("a").await.unwrap().is_some());
        assert!(cache.ttl("a").await.unwrap().is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.get_json("a").await.unwrap().is_none());
        assert!(cache.ttl("a").await.unwrap().is_none());
        assert_eq!(cache.purge_expired().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_ttl_applies() {
        let cache =
            InMemoryCache::with_config(CacheConfig::new().with_default_ttl(Duration::from_secs(5)));
        cache.set_json("a", "1".to_string(), None).await.unwrap();

        tokio::time::advance(Duration::from_secs(6)).await;
        assert!(cache.get_json("a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unrepresentable_ttl_never_expires() {
        let cache = InMemoryCache::new();
        cache
            .set_json("a", "1".to_string(), Some(Duration::MAX))
            .await
            .unwrap();
        assert_eq!(cache.get_json("a").await.unwrap(), Some("1".to_string()));
        assert!(cache.ttl("a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_zero_capacity_is_raised_to_one() {
        let cache = InMemoryCache::with_config(CacheConfig::new().with_max_entries(0));
        assert_eq!(cache.config().max_entries, 1);
        cache.set_json("a", "1".to_string(), None).await.unwrap();
        assert_eq!(cache.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_capacity_evicts_soonest_expiring() {
        let cache = InMemoryCache::with_config(CacheConfig::new().with_max_entries(2));
        cache
            .set_json("short", "1".to_string(), Some(Duration::from_secs(1)))
            .await
            .unwrap();
        cache.set_json("forever", "2".to_string(), None).await.unwrap();
        cache
            .set_json("new", "3".to_string(), Some(Duration::from_secs(30)))
            .await
            .unwrap();

        assert_eq!(cache.len().await.unwrap(), 2);
        assert!(cache.get_json("short").await.unwrap().is_none());
        assert!(cache.get_json("forever").await.unwrap().is_some());
        assert!(cache.get_json("new").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_overwrite_does_not_evict() {
        let cache = InMemoryCache::with_config(CacheConfig::new().with_max_entries(1));
        cache.set_json("a", "1".to_string(), None).await.unwrap();
        cache.set_json("a", "2".to_string(), None).await.unwrap();
        assert_eq!(cache.get_json("a").await.unwrap(), Some("2".to_string()));
    }

    #[tokio::test]
    async fn test_key_prefix_is_isolated_per_store() {
        let store = InMemoryCache::with_config(CacheConfig::new().with_key_prefix("flags"));
        store.set_json("beta", "true".to_string(), None).await.unwrap();
        assert_eq!(store.get_json("beta").await.unwrap(), Some("true".to_string()));
    }
}
