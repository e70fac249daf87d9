//! Integration tests for tradegate-cache

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tradegate_cache::prelude::*;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Snapshot {
    name: String,
    enabled: bool,
}

#[tokio::test]
async fn test_typed_round_trip_through_trait_object() {
    let store: Arc<dyn CacheStore> = Arc::new(InMemoryCache::new());
    let snapshot = Snapshot {
        name: "bulk-payments".to_string(),
        enabled: true,
    };

    helpers::set(store.as_ref(), "bulk-payments", &snapshot, None)
        .await
        .unwrap();
    let loaded: Option<Snapshot> = helpers::get(store.as_ref(), "bulk-payments").await.unwrap();
    assert_eq!(loaded, Some(snapshot));
}

#[tokio::test]
async fn test_typed_get_reports_corrupt_values() {
    let store = InMemoryCache::new();
    store
        .set_json("broken", "{not json".to_string(), None)
        .await
        .unwrap();

    let result: CacheResult<Option<Snapshot>> = helpers::get(&store, "broken").await;
    assert!(matches!(result, Err(CacheError::Deserialization(_))));
}

#[tokio::test]
async fn test_batch_operations_preserve_order() {
    let store = InMemoryCache::new();
    store.set_json("a", "1".to_string(), None).await.unwrap();
    store.set_json("c", "3".to_string(), None).await.unwrap();

    let values = store.get_many(&["a", "b", "c"]).await.unwrap();
    assert_eq!(values, vec![Some("1".to_string()), None, Some("3".to_string())]);

    store.delete_many(&["a", "c"]).await.unwrap();
    assert_eq!(store.len().await.unwrap(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_clones_share_storage() {
    let store = InMemoryCache::new();
    let other = store.clone();
    store
        .set_json("shared", "yes".to_string(), Some(Duration::from_secs(10)))
        .await
        .unwrap();
    assert!(other.exists("shared").await.unwrap());

    other.clear().await.unwrap();
    assert!(!store.exists("shared").await.unwrap());
}
