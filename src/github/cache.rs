//! Response cache for upstream listing fetches.
//!
//! Keeps parsed pages in memory keyed by request URL so repeated listing
//! requests inside the TTL window skip the network.
//! - Entries expire after `ttl` (a few minutes by default)
//! - Expired entries are purged whenever a new entry is stored
//! - There is no invalidation API: a bypass fetch simply overwrites the entry
//!
//! Used by: `GitHubClient::list_commits()` in client.rs

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

struct CacheEntry<T> {
    value: T,
    stored_at: Instant,
}

pub struct ResponseCache<T> {
    entries: RwLock<HashMap<String, CacheEntry<T>>>,
    ttl: Duration,
    created_at: Instant,
}

impl<T: Clone> ResponseCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            created_at: Instant::now(),
        }
    }

    /// Fresh entry for `key`, if one exists.
    pub fn get(&self, key: &str) -> Option<T> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(key)
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| entry.value.clone())
    }

    pub fn insert(&self, key: String, value: T) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let ttl = self.ttl;
        let before = entries.len();
        entries.retain(|_, entry| entry.stored_at.elapsed() < ttl);
        let purged = before - entries.len();
        if purged > 0 {
            tracing::debug!("Purged {} expired cache entries", purged);
        }

        entries.insert(
            key,
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Get cache statistics for debugging
    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let fresh = entries
            .values()
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .count();
        CacheStats {
            entries: entries.len(),
            fresh_entries: fresh,
            age_secs: self.created_at.elapsed().as_secs(),
        }
    }
}

#[derive(Debug)]
pub struct CacheStats {
    pub entries: usize,
    pub fresh_entries: usize,
    pub age_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serves_fresh_entries() {
        let cache = ResponseCache::new(Duration::from_secs(300));
        cache.insert("https://api/commits?page=1".to_string(), 7u32);

        assert_eq!(cache.get("https://api/commits?page=1"), Some(7));
        assert_eq!(cache.get("https://api/commits?page=2"), None);
    }

    #[test]
    fn expired_entries_are_misses_and_get_purged() {
        let cache = ResponseCache::new(Duration::ZERO);
        cache.insert("a".to_string(), 1u32);
        assert_eq!(cache.get("a"), None);

        cache.insert("b".to_string(), 2u32);
        let stats = cache.stats();
        assert_eq!(stats.entries, 1, "expired 'a' should be purged on insert");
        assert_eq!(stats.fresh_entries, 0);
    }

    #[test]
    fn insert_overwrites_existing_key() {
        let cache = ResponseCache::new(Duration::from_secs(300));
        cache.insert("a".to_string(), 1u32);
        cache.insert("a".to_string(), 2u32);

        assert_eq!(cache.get("a"), Some(2));
        assert_eq!(cache.stats().entries, 1);
    }
}
