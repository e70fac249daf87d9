//! Feature flags for Tradegate
//!
//! Decides whether a named feature is visible to a caller. A flag is either
//! off, on for everyone, or on for a stable percentage of signed-in users.
//!
//! # Features
//!
//! - **Admin bypass** - holders of the admin role see every feature
//! - **Percentage rollout** - users are bucketed `1..=100` by a stable hash of their id
//! - **Fail closed** - missing flags and registry outages evaluate to "off"
//! - **Lookup cache** - registry answers are cached per flag for a short TTL
//! - **Registries** - in-memory/file-backed, or the managed database's REST API
//!
//! # Quick Start
//!
//! ```
//! use tradegate_features::*;
//!
//! # tokio_test::block_on(async {
//! let registry = InMemoryRegistry::from_flags([
//!     FeatureFlag::disabled("ai-advisor"),
//!     FeatureFlag::rollout("bulk-payments", 25),
//! ]);
//! let evaluator = RolloutEvaluator::new(registry.clone());
//!
//! let admin = CallerContext::user("ops-1").with_role("admin");
//! assert!(evaluator.is_enabled("ai-advisor", &admin).await);
//!
//! let buyer = CallerContext::user("user-42");
//! let result = evaluator.evaluate("bulk-payments", &buyer).await;
//! assert_eq!(result.reason, Reason::PercentageDisabled);
//! # });
//! ```
//!
//! # Configuration
//!
//! ```no_run
//! use tradegate_features::*;
//!
//! # fn main() -> Result<()> {
//! let config = EvaluatorConfig::from_env()?; // TRADEGATE_FEATURES_CACHE_TTL_SECS=30 ...
//! let registry = RestFlagRegistry::new(RestRegistryConfig::new(
//!     "https://project.example.co",
//!     "service-key",
//! ))?;
//! let evaluator = RolloutEvaluator::builder(registry).config(config).build();
//! # let _ = evaluator;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod caller;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod evaluator;
pub mod flag;
pub mod hash;
pub mod registry;
pub mod rest;

pub use cache::{CachedLookup, FlagCache};
pub use caller::{AdminPolicy, CallerContext, NoAdminPolicy, RoleAdminPolicy};
pub use config::EvaluatorConfig;
pub use error::{FeatureError, RegistryError, RegistryResult, Result};
pub use evaluation::{EvaluationResult, Reason};
pub use evaluator::{RolloutEvaluator, RolloutEvaluatorBuilder};
pub use flag::{FeatureFlag, FlagRow, RolloutPercentage};
pub use hash::HashStrategy;
pub use registry::{FlagRegistry, InMemoryRegistry};
pub use rest::{RestFlagRegistry, RestRegistryConfig};
