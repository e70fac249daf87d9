// Tradegate - feature rollout core for the Tradegate marketplace
//
// Re-exports the member crates so applications depend on a single package.

pub use tradegate_features::*;

pub use tradegate_cache;
pub use tradegate_config;
pub use tradegate_features;
pub use tradegate_log;

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        AdminPolicy, CallerContext, EvaluationResult, EvaluatorConfig, FeatureFlag, FlagRegistry,
        HashStrategy, InMemoryRegistry, Reason, RestFlagRegistry, RestRegistryConfig,
        RolloutEvaluator, RolloutPercentage,
    };
    pub use tradegate_cache::{CacheStore, InMemoryCache};
    pub use tradegate_config::ConfigManager;
}
