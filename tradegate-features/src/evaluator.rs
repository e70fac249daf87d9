//! Rollout evaluation.

use crate::cache::{CachedLookup, FlagCache};
use crate::caller::{AdminPolicy, CallerContext, RoleAdminPolicy};
use crate::config::{EvaluatorConfig, MAX_CACHE_TTL_SECS};
use crate::error::RegistryResult;
use crate::evaluation::{EvaluationResult, Reason};
use crate::flag::FeatureFlag;
use crate::hash::HashStrategy;
use crate::registry::FlagRegistry;
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tradegate_cache::{CacheConfig, CacheStore, InMemoryCache};
use tradegate_config::Validate;
use tradegate_log::{debug, trace, warn};

const LOG_TARGET: &str = "tradegate::features";

/// Decides whether a feature is on for a caller.
///
/// Evaluation never fails: anything that prevents a positive answer (missing
/// flag, registry outage, anonymous caller on a percentage rollout) yields
/// `enabled = false` with a [`Reason`] saying why.
///
/// # Examples
///
/// ```
/// use tradegate_features::*;
///
/// # tokio_test::block_on(async {
/// let registry = InMemoryRegistry::from_flags([
///     FeatureFlag::enabled("invoices-v2"),
///     FeatureFlag::rollout("trade-finance", 100),
/// ]);
/// let evaluator = RolloutEvaluator::new(registry);
///
/// let buyer = CallerContext::user("user-42");
/// let result = evaluator.evaluate("invoices-v2", &buyer).await;
/// assert_eq!(result, EvaluationResult::on(Reason::FullyEnabled));
///
/// let result = evaluator.evaluate("trade-finance", &CallerContext::anonymous()).await;
/// assert_eq!(result.reason, Reason::NotAuthenticated);
/// # });
/// ```
#[derive(Clone)]
pub struct RolloutEvaluator {
    registry: Arc<dyn FlagRegistry>,
    admin_policy: Arc<dyn AdminPolicy>,
    cache: Option<FlagCache>,
    hash: HashStrategy,
}

impl RolloutEvaluator {
    /// Evaluator with default settings: role `admin` bypasses, lookups cached
    /// in memory for 60 seconds, legacy hash.
    pub fn new(registry: impl FlagRegistry + 'static) -> Self {
        Self::builder(registry).build()
    }

    pub fn builder(registry: impl FlagRegistry + 'static) -> RolloutEvaluatorBuilder {
        RolloutEvaluatorBuilder::new(Arc::new(registry))
    }

    pub fn hash_strategy(&self) -> HashStrategy {
        self.hash
    }

    /// Bucket in `1..=100` the evaluator assigns to `user_id`.
    pub fn bucket_for(&self, user_id: &str) -> u8 {
        self.hash.bucket(user_id)
    }

    /// Evaluate one flag for one caller.
    pub async fn evaluate(&self, feature_name: &str, caller: &CallerContext) -> EvaluationResult {
        if self.admin_policy.is_admin(caller) {
            trace!(target: LOG_TARGET, "Admin bypass for '{}'", feature_name);
            return EvaluationResult::on(Reason::Admin);
        }

        if feature_name.is_empty() {
            return EvaluationResult::off(Reason::NotFound);
        }

        let flag = match self.lookup(feature_name).await {
            Ok(Some(flag)) => flag,
            Ok(None) => return EvaluationResult::off(Reason::NotFound),
            Err(e) => {
                warn!(target: LOG_TARGET, "Flag '{}' unavailable, failing closed: {}", feature_name, e);
                return EvaluationResult::off(Reason::Error);
            }
        };

        self.decide(&flag, caller)
    }

    /// `evaluate(..).enabled`.
    pub async fn is_enabled(&self, feature_name: &str, caller: &CallerContext) -> bool {
        self.evaluate(feature_name, caller).await.enabled
    }

    /// Evaluate several flags concurrently. Duplicate names collapse to one entry.
    pub async fn evaluate_many<S: AsRef<str>>(
        &self,
        feature_names: &[S],
        caller: &CallerContext,
    ) -> HashMap<String, EvaluationResult> {
        let evaluations = feature_names.iter().map(|name| async move {
            let name = name.as_ref();
            (name.to_string(), self.evaluate(name, caller).await)
        });

        join_all(evaluations).await.into_iter().collect()
    }

    /// Forget the cached lookup for one flag.
    pub async fn invalidate(&self, feature_name: &str) {
        if let Some(cache) = &self.cache {
            cache.invalidate(feature_name).await;
        }
    }

    /// Forget every cached lookup. Only flag entries are removed from a shared
    /// cache store.
    pub async fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear().await;
        }
    }

    async fn lookup(&self, name: &str) -> RegistryResult<Option<FeatureFlag>> {
        if let Some(cache) = &self.cache
            && let Some(hit) = cache.get(name).await
        {
            debug!(target: LOG_TARGET, "Cache hit for '{}'", name);
            return Ok(hit.into_flag());
        }

        debug!(target: LOG_TARGET, "Cache miss for '{}', querying registry", name);
        let flag = self.registry.get(name).await?;

        if let Some(cache) = &self.cache {
            cache.put(name, &CachedLookup::from(flag.clone())).await;
        }

        Ok(flag)
    }

    fn decide(&self, flag: &FeatureFlag, caller: &CallerContext) -> EvaluationResult {
        if !flag.enabled {
            return EvaluationResult::off(Reason::Disabled);
        }

        let Some(percentage) = flag.rollout_percentage else {
            return EvaluationResult::on(Reason::FullyEnabled);
        };

        let Some(user_id) = caller.bucketing_id() else {
            return EvaluationResult::off(Reason::NotAuthenticated);
        };

        let bucket = self.hash.bucket(user_id);
        if percentage.includes(bucket) {
            EvaluationResult::on(Reason::PercentageEnabled)
        } else {
            EvaluationResult::off(Reason::PercentageDisabled)
        }
    }
}

/// Builder for [`RolloutEvaluator`].
pub struct RolloutEvaluatorBuilder {
    registry: Arc<dyn FlagRegistry>,
    admin_policy: Option<Arc<dyn AdminPolicy>>,
    cache_store: Option<Arc<dyn CacheStore>>,
    config: EvaluatorConfig,
}

impl RolloutEvaluatorBuilder {
    fn new(registry: Arc<dyn FlagRegistry>) -> Self {
        Self {
            registry,
            admin_policy: None,
            cache_store: None,
            config: EvaluatorConfig::default(),
        }
    }

    /// Apply loaded settings. Explicit `admin_policy` / `cache_store` calls
    /// still take precedence. Out-of-range cache settings are clamped at
    /// [`build`](Self::build).
    pub fn config(mut self, config: EvaluatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn admin_policy(mut self, policy: impl AdminPolicy + 'static) -> Self {
        self.admin_policy = Some(Arc::new(policy));
        self
    }

    /// Cache lookups in `store` instead of a private [`InMemoryCache`].
    pub fn cache_store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.cache_store = Some(store);
        self.config.cache_enabled = true;
        self
    }

    /// Lookup lifetime, clamped to `1..=MAX_CACHE_TTL_SECS` seconds.
    pub fn cache_ttl(mut self, ttl: std::time::Duration) -> Self {
        self.config.cache_ttl_secs = ttl.as_secs().clamp(1, MAX_CACHE_TTL_SECS);
        self
    }

    /// Always go to the registry.
    pub fn without_cache(mut self) -> Self {
        self.cache_store = None;
        self.config.cache_enabled = false;
        self
    }

    pub fn hash_strategy(mut self, hash: HashStrategy) -> Self {
        self.config.hash_strategy = hash;
        self
    }

    pub fn build(self) -> RolloutEvaluator {
        let config = match self.config.validate() {
            Ok(()) => self.config,
            Err(e) => {
                warn!(target: LOG_TARGET, "Invalid evaluator settings, clamping: {}", e);
                self.config.clamped()
            }
        };

        let admin_policy: Arc<dyn AdminPolicy> = match self.admin_policy {
            Some(policy) => policy,
            None => Arc::new(RoleAdminPolicy::new(config.admin_role.clone())),
        };

        let cache = if config.cache_enabled {
            let store: Arc<dyn CacheStore> = match self.cache_store {
                Some(store) => store,
                None => Arc::new(InMemoryCache::with_config(
                    CacheConfig::new().with_max_entries(config.cache_max_entries),
                )),
            };
            Some(FlagCache::new(store, config.cache_ttl()))
        } else {
            None
        };

        RolloutEvaluator {
            registry: self.registry,
            admin_policy,
            cache,
            hash: config.hash_strategy,
        }
    }
}
