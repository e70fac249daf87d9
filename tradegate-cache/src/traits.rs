//! Cache store trait definition.

use crate::error::CacheResult;
use async_trait::async_trait;
use std::time::Duration;

/// Cache store trait for different cache backends.
///
/// Values are opaque JSON strings; use [`crate::helpers`] for typed access.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns `Ok(None)` when the key is absent or expired.
    async fn get_json(&self, key: &str) -> CacheResult<Option<String>>;

    /// Store a value. `ttl = None` falls back to the store's default TTL, if any.
    async fn set_json(&self, key: &str, value: String, ttl: Option<Duration>) -> CacheResult<()>;

    /// Delete a key from the cache.
    async fn delete(&self, key: &str) -> CacheResult<()>;

    /// Check if a live key exists.
    async fn exists(&self, key: &str) -> CacheResult<bool> {
        Ok(self.get_json(key).await?.is_some())
    }

    /// Clear all keys from the cache.
    async fn clear(&self) -> CacheResult<()>;

    /// Remaining time-to-live, `None` if the key has no expiry or is absent.
    async fn ttl(&self, key: &str) -> CacheResult<Option<Duration>>;

    /// Number of stored entries, including ones that expired but were not yet purged.
    async fn len(&self) -> CacheResult<usize>;

    /// Get multiple keys concurrently, preserving input order.
    async fn get_many(&self, keys: &[&str]) -> CacheResult<Vec<Option<String>>> {
        use futures::future::try_join_all;

        let futures = keys.iter().map(|key| self.get_json(key));
        try_join_all(futures).await
    }

    /// Delete multiple keys concurrently.
    async fn delete_many(&self, keys: &[&str]) -> CacheResult<()> {
        use futures::future::try_join_all;

        let futures = keys.iter().map(|key| self.delete(key));
        try_join_all(futures).await?;
        Ok(())
    }
}
