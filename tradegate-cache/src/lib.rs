//! Cache stores for Tradegate.
//!
//! A small, pluggable cache layer: the [`CacheStore`] trait describes a
//! string-valued TTL store, [`InMemoryCache`] is the bounded in-process
//! implementation, and [`helpers`] adds typed `get`/`set` through serde.
//!
//! # Examples
//!
//! ```
//! use tradegate_cache::*;
//! use std::time::Duration;
//!
//! # async fn example() -> CacheResult<()> {
//! let cache = InMemoryCache::with_config(
//!     CacheConfig::new()
//!         .with_key_prefix("feature_flag")
//!         .with_default_ttl(Duration::from_secs(60)),
//! );
//!
//! helpers::set(&cache, "new-checkout", &true, None).await?;
//! let cached: Option<bool> = helpers::get(&cache, "new-checkout").await?;
//! assert_eq!(cached, Some(true));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod helpers;
pub mod memory;
pub mod traits;

pub use config::CacheConfig;
pub use error::{CacheError, CacheResult};
pub use memory::InMemoryCache;
pub use traits::CacheStore;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::CacheConfig;
    pub use crate::error::{CacheError, CacheResult};
    pub use crate::helpers;
    pub use crate::memory::InMemoryCache;
    pub use crate::traits::CacheStore;
}
