//! Flag registries.

use crate::error::{RegistryError, RegistryResult};
use crate::flag::{FeatureFlag, FlagRow};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tradegate_config::ConfigLoader;

/// Read access to stored feature flags.
#[async_trait]
pub trait FlagRegistry: Send + Sync {
    /// Look up one flag. `Ok(None)` means the flag does not exist.
    async fn get(&self, name: &str) -> RegistryResult<Option<FeatureFlag>>;

    /// Every flag, ordered by name.
    async fn list(&self) -> RegistryResult<Vec<FeatureFlag>>;
}

#[async_trait]
impl<R: FlagRegistry + ?Sized> FlagRegistry for Arc<R> {
    async fn get(&self, name: &str) -> RegistryResult<Option<FeatureFlag>> {
        (**self).get(name).await
    }

    async fn list(&self) -> RegistryResult<Vec<FeatureFlag>> {
        (**self).list().await
    }
}

#[derive(Deserialize)]
struct FlagDocument {
    #[serde(default)]
    flags: Vec<FlagRow>,
}

/// Registry held in process memory.
///
/// Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistry {
    flags: Arc<RwLock<HashMap<String, FeatureFlag>>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from flags; later duplicates win.
    pub fn from_flags(flags: impl IntoIterator<Item = FeatureFlag>) -> Self {
        let map = flags
            .into_iter()
            .map(|flag| (flag.name.clone(), flag))
            .collect();
        Self {
            flags: Arc::new(RwLock::new(map)),
        }
    }

    /// Load a JSON or TOML document of the form `{ "flags": [ ... ] }`.
    ///
    /// Every row is validated; one bad row fails the whole load.
    pub fn from_file(path: impl AsRef<Path>) -> RegistryResult<Self> {
        let loader = ConfigLoader::auto(path.as_ref())?;
        let document: FlagDocument = serde_json::from_value(loader.load_file(path)?)
            .map_err(|e| RegistryError::Decode(e.to_string()))?;

        let flags = document
            .flags
            .into_iter()
            .map(FeatureFlag::try_from)
            .collect::<RegistryResult<Vec<_>>>()?;

        Ok(Self::from_flags(flags))
    }

    /// Insert or replace a flag, returning the previous version.
    pub async fn upsert(&self, flag: FeatureFlag) -> Option<FeatureFlag> {
        self.flags.write().await.insert(flag.name.clone(), flag)
    }

    pub async fn remove(&self, name: &str) -> Option<FeatureFlag> {
        self.flags.write().await.remove(name)
    }

    pub async fn len(&self) -> usize {
        self.flags.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.flags.read().await.is_empty()
    }
}

#[async_trait]
impl FlagRegistry for InMemoryRegistry {
    async fn get(&self, name: &str) -> RegistryResult<Option<FeatureFlag>> {
        Ok(self.flags.read().await.get(name).cloned())
    }

    async fn list(&self) -> RegistryResult<Vec<FeatureFlag>> {
        let mut flags: Vec<FeatureFlag> = self.flags.read().await.values().cloned().collect();
        flags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(flags)
    }
}
