use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Process-wide keyed cache for external lookups.
///
/// Each entry holds a JSON value and an absolute expiry; eviction is
/// time-based only, performed on read. The store is shared by cloning
/// (cheap `Arc` clone) and injected through application state rather
/// than accessed as a singleton. Reads and writes to a key are not
/// mutually exclusive: two concurrent misses may both fetch upstream,
/// which is accepted, and last-writer-wins on insert.
#[derive(Clone, Default)]
pub struct LookupCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

struct CacheEntry {
    value: Value,
    expires_at: Instant,
}

impl LookupCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a live (non-expired) entry. Expired entries are removed.
    pub async fn get(&self, key: &str) -> Option<Value> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.expires_at > Instant::now() => {
                    return Some(entry.value.clone());
                }
                Some(_) => {}
                None => return None,
            }
        }

        // Entry exists but is expired: evict it.
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get(key) {
            if entry.expires_at <= Instant::now() {
                entries.remove(key);
            } else {
                // Refreshed by a concurrent writer in the meantime.
                return Some(entry.value.clone());
            }
        }
        None
    }

    /// Store a value with an absolute expiry of now + ttl.
    pub async fn insert(&self, key: impl Into<String>, value: Value, ttl: Duration) {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + ttl,
        };
        let mut entries = self.entries.write().await;
        entries.insert(key.into(), entry);
    }

    /// Number of stored entries, live or expired. Test hook.
    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn live_entry_is_returned() {
        let cache = LookupCache::new();
        cache
            .insert("trefle_search_rose_1", json!({"total": 3}), Duration::from_secs(60))
            .await;

        let hit = cache.get("trefle_search_rose_1").await;
        assert_eq!(hit, Some(json!({"total": 3})));
    }

    #[tokio::test]
    async fn missing_key_is_none() {
        let cache = LookupCache::new();
        assert!(cache.get("weather_nope_2026-01-01").await.is_none());
    }

    #[tokio::test]
    async fn expired_entry_is_evicted() {
        let cache = LookupCache::new();
        cache
            .insert("trefle_plant_7", json!({"id": 7}), Duration::from_millis(20))
            .await;

        tokio::time::sleep(Duration::from_millis(40)).await;

        assert!(cache.get("trefle_plant_7").await.is_none());
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let cache = LookupCache::new();
        cache
            .insert("trefle_list_1", json!([1]), Duration::from_secs(60))
            .await;
        cache
            .insert("trefle_list_2", json!([2]), Duration::from_secs(60))
            .await;

        assert_eq!(cache.get("trefle_list_1").await, Some(json!([1])));
        assert_eq!(cache.get("trefle_list_2").await, Some(json!([2])));
    }

    #[tokio::test]
    async fn reinsert_refreshes_expiry() {
        let cache = LookupCache::new();
        cache
            .insert("weather_a_2026-01-01", json!(1), Duration::from_millis(20))
            .await;
        cache
            .insert("weather_a_2026-01-01", json!(2), Duration::from_secs(60))
            .await;

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(cache.get("weather_a_2026-01-01").await, Some(json!(2)));
    }
}
