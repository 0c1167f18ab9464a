//! Session Cache - time-boxed key/value store for fetched collections
//!
//! Entries expire a fixed TTL after they are written. Values are stored
//! as JSON so any serializable collection fits behind one interface.
//! Corrupt or mistyped entries are dropped and reported as a miss.

use moka::sync::Cache;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Prefix applied to every key
pub const CACHE_KEY_PREFIX: &str = "arcraiders_data_";

/// 30 minutes
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

pub const ALL_ITEMS_KEY: &str = "all_items";
pub const ALL_QUESTS_KEY: &str = "all_quests";
pub const HIDEOUT_BENCHES_KEY: &str = "hideout_benches";
pub const PROJECTS_KEY: &str = "projects";

#[derive(Clone)]
pub struct SessionCache {
    inner: Cache<String, Arc<Value>>,
    ttl: Duration,
}

impl SessionCache {
    pub fn new(ttl: Duration) -> Self {
        let inner = Cache::builder().max_capacity(64).time_to_live(ttl).build();
        Self { inner, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn full_key(key: &str) -> String {
        format!("{}{}", CACHE_KEY_PREFIX, key)
    }

    /// Stored value, or `None` when missing, expired or not a `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let full_key = Self::full_key(key);
        let value = self.inner.get(&full_key)?;

        match serde_json::from_value(Value::clone(&value)) {
            Ok(decoded) => {
                tracing::debug!("Session cache hit for {}", full_key);
                Some(decoded)
            }
            Err(e) => {
                tracing::warn!("Discarding unreadable cache entry {}: {}", full_key, e);
                self.inner.invalidate(&full_key);
                None
            }
        }
    }

    /// Store a value; a value that cannot be serialized is logged and skipped.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_value(value) {
            Ok(json) => self.inner.insert(Self::full_key(key), Arc::new(json)),
            Err(e) => tracing::warn!("Failed to cache {}: {}", key, e),
        }
    }

    pub fn remove(&self, key: &str) {
        self.inner.invalidate(&Self::full_key(key));
    }

    pub fn clear(&self) {
        self.inner.invalidate_all();
        tracing::debug!("Session cache cleared");
    }
}

impl Default for SessionCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl std::fmt::Debug for SessionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCache").field("ttl", &self.ttl).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_set_get_clear() {
        let cache = SessionCache::default();
        cache.set(ALL_ITEMS_KEY, &vec!["wires", "battery"]);

        let items: Option<Vec<String>> = cache.get(ALL_ITEMS_KEY);
        assert_eq!(items, Some(vec!["wires".to_string(), "battery".to_string()]));

        cache.clear();
        assert_eq!(cache.get::<Vec<String>>(ALL_ITEMS_KEY), None);
    }

    #[test]
    fn test_wrong_shape_is_a_miss() {
        let cache = SessionCache::default();
        cache.set(PROJECTS_KEY, &42u32);
        assert_eq!(cache.get::<Vec<String>>(PROJECTS_KEY), None);
        // The bad entry was dropped
        assert_eq!(cache.get::<u32>(PROJECTS_KEY), None);
    }

    #[test]
    fn test_entries_expire_after_ttl() {
        let cache = SessionCache::new(Duration::from_millis(50));
        cache.set(ALL_QUESTS_KEY, &1u32);
        assert_eq!(cache.get::<u32>(ALL_QUESTS_KEY), Some(1));

        sleep(Duration::from_millis(150));
        assert_eq!(cache.get::<u32>(ALL_QUESTS_KEY), None);
    }
}
