use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::clock::Clock;
use crate::search::models::CityMatch;

/// In-memory map whose entries disappear after a fixed time-to-live
pub struct TtlCache<K, V> {
    data: DashMap<K, CacheEntry<V>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

struct CacheEntry<V> {
    value: V,
    expires_at: DateTime<Utc>,
}

impl<K, V> TtlCache<K, V>
where
    K: std::hash::Hash + Eq + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            data: DashMap::new(),
            ttl,
            clock,
        }
    }

    /// Live value for `key`; an expired entry is dropped on the way
    pub fn get(&self, key: &K) -> Option<V> {
        let entry = self.data.get(key)?;
        if entry.expires_at > self.clock.now() {
            Some(entry.value.clone())
        } else {
            drop(entry);
            self.data.remove(key);
            None
        }
    }

    /// Insert or overwrite; the TTL restarts
    pub fn insert(&self, key: K, value: V) {
        let entry = CacheEntry {
            value,
            expires_at: self.expiry(),
        };
        self.data.insert(key, entry);
    }

    /// Now plus the TTL, saturating at the far future
    fn expiry(&self) -> DateTime<Utc> {
        let now = self.clock.now();
        chrono::Duration::from_std(self.ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Drop every expired entry
    pub fn cleanup(&self) {
        let now = self.clock.now();
        self.data.retain(|_, entry| entry.expires_at > now);
    }

    /// Number of entries, expired ones included
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// City search results keyed by normalized query
pub type SearchCache = Arc<TtlCache<String, Vec<CityMatch>>>;

/// Search results rarely change; keep them for a day
pub const SEARCH_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

pub fn create_search_cache(clock: Arc<dyn Clock>) -> SearchCache {
    Arc::new(TtlCache::new(SEARCH_CACHE_TTL, clock))
}

/// Lowercase, trimmed key so "  Paris" and "paris" share an entry
pub fn normalize_cache_key(location: &str) -> String {
    location.trim().to_lowercase()
}

/// Sweep expired search results once an hour
pub fn start_cache_cleanup_task(cache: SearchCache) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60 * 60));
        loop {
            interval.tick().await;
            let before = cache.len();
            cache.cleanup();
            let after = cache.len();
            if before != after {
                tracing::debug!(
                    removed = before - after,
                    remaining = after,
                    "Search cache cleanup completed"
                );
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::testing::ManualClock;

    fn manual_cache<V: Clone>(ttl_secs: u64) -> (TtlCache<String, V>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::at(1_700_000_000));
        (TtlCache::new(Duration::from_secs(ttl_secs), clock.clone()), clock)
    }

    fn paris() -> CityMatch {
        CityMatch {
            name: "Paris".to_string(),
            country: "FR".to_string(),
            state: None,
            lat: 48.8534,
            lon: 2.3488,
        }
    }

    #[test]
    fn test_cache_insert_and_get() {
        let (cache, _) = manual_cache::<Vec<CityMatch>>(60);
        cache.insert("paris".to_string(), vec![paris()]);
        assert_eq!(cache.get(&"paris".to_string()), Some(vec![paris()]));
    }

    #[test]
    fn test_cache_miss() {
        let (cache, _) = manual_cache::<u32>(60);
        assert_eq!(cache.get(&"missing".to_string()), None);
    }

    #[test]
    fn test_cache_ttl_expiry() {
        let (cache, clock) = manual_cache::<u32>(60);
        cache.insert("key".to_string(), 1);
        clock.advance_secs(59);
        assert_eq!(cache.get(&"key".to_string()), Some(1));
        clock.advance_secs(1);
        assert_eq!(cache.get(&"key".to_string()), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_cleanup() {
        let (cache, clock) = manual_cache::<u32>(60);
        cache.insert("a".to_string(), 1);
        clock.advance_secs(30);
        cache.insert("b".to_string(), 2);
        clock.advance_secs(30);
        cache.cleanup();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&"b".to_string()), Some(2));
    }

    #[test]
    fn test_normalize_cache_key() {
        assert_eq!(normalize_cache_key("  Chicago  "), "chicago");
        assert_eq!(normalize_cache_key("NEW YORK"), "new york");
        assert_eq!(normalize_cache_key("London,GB"), "london,gb");
    }
}
