//! Memory Cache Module
//!
//! Map-backed implementation of the cache contract with lazy expiry
//! and bulk purge.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::cache::{AsyncCache, Cache, Entry};
use crate::error::Result;

// == Memory Cache ==
/// Unbounded in-memory cache with per-entry expiry.
///
/// Expired entries are not removed proactively; they are detected and
/// deleted on the read that discovers them, or during an explicit
/// [`purge`](Cache::purge) sweep.
///
/// Designed for single-writer access: all operations take `&mut self` and
/// there is no internal locking. Callers that share a cache across threads
/// or tasks must serialize access externally.
#[derive(Debug, Default)]
pub struct MemoryCache<K, V> {
    /// Key-value storage
    entries: HashMap<K, Entry<V>>,
    /// Default timeout applied to entries stored without an explicit one
    default_timeout: Option<Duration>,
}

impl<K, V> MemoryCache<K, V>
where
    K: Eq + Hash,
{
    // == Constructors ==
    /// Creates an empty cache whose entries never expire by default.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            default_timeout: None,
        }
    }

    /// Creates an empty cache with a default timeout for unlabelled `set`
    /// calls.
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self {
            entries: HashMap::new(),
            default_timeout: timeout,
        }
    }

    /// Creates a cache seeded with initial key-value pairs.
    ///
    /// The default timeout applies to every seeded entry and to subsequent
    /// `set` calls without an explicit timeout.
    pub fn with_entries(items: impl IntoIterator<Item = (K, V)>, timeout: Option<Duration>) -> Self {
        let entries = items
            .into_iter()
            .map(|(key, value)| (key, Entry::new(value, timeout)))
            .collect();

        Self {
            entries,
            default_timeout: timeout,
        }
    }

    // == Accessors ==
    /// Returns the number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the configured default timeout.
    pub fn default_timeout(&self) -> Option<Duration> {
        self.default_timeout
    }
}

// == Blocking Contract ==
impl<K, V> Cache<K, V> for MemoryCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    fn get(&mut self, key: &K) -> Result<Option<V>> {
        if let Some(entry) = self.entries.get(key) {
            if entry.is_expired() {
                // Lazy expiry: drop the entry on the read that found it
                self.entries.remove(key);
                return Ok(None);
            }
            let value = entry.value.clone();
            return Ok(Some(value));
        }
        Ok(None)
    }

    fn set(&mut self, key: K, value: V, timeout: Option<Duration>) -> Result<()> {
        let effective = timeout.or(self.default_timeout);
        self.entries.insert(key, Entry::new(value, effective));
        Ok(())
    }

    fn contains(&mut self, key: &K) -> Result<bool> {
        if let Some(entry) = self.entries.get(key) {
            if entry.is_expired() {
                self.entries.remove(key);
                return Ok(false);
            }
            return Ok(true);
        }
        Ok(false)
    }

    fn delete(&mut self, key: &K) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn purge(&mut self) -> Result<usize> {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        let removed = before - self.entries.len();

        if removed > 0 {
            debug!("Purge removed {} expired entries", removed);
        }

        Ok(removed)
    }
}

// == Suspending Contract ==
// Local map access completes immediately; the suspending flavor exists so
// callers generic over `AsyncCache` can back onto a memory cache.
#[async_trait]
impl<K, V> AsyncCache<K, V> for MemoryCache<K, V>
where
    K: Eq + Hash + Send + Sync,
    V: Clone + Send + 'static,
{
    async fn get(&mut self, key: &K) -> Result<Option<V>> {
        Cache::get(self, key)
    }

    async fn set(&mut self, key: K, value: V, timeout: Option<Duration>) -> Result<()> {
        Cache::set(self, key, value, timeout)
    }

    async fn contains(&mut self, key: &K) -> Result<bool> {
        Cache::contains(self, key)
    }

    async fn delete(&mut self, key: &K) -> Result<()> {
        Cache::delete(self, key)
    }

    async fn purge(&mut self) -> Result<usize> {
        Cache::purge(self)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    // The in-memory caches implement both contracts, so only the blocking
    // trait may be in scope for dot-method calls; the suspending test uses
    // qualified calls with a function-local import.
    use super::{Cache, MemoryCache};
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_set_and_get() {
        let mut cache: MemoryCache<String, String> = MemoryCache::new();

        cache.set("key1".to_string(), "value1".to_string(), None).unwrap();

        assert_eq!(cache.get(&"key1".to_string()).unwrap(), Some("value1".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_get_missing_is_none() {
        let mut cache: MemoryCache<String, String> = MemoryCache::new();

        assert_eq!(cache.get(&"missing".to_string()).unwrap(), None);
    }

    #[test]
    fn test_get_or_default() {
        let mut cache: MemoryCache<&str, i64> = MemoryCache::new();

        cache.set("present", 7, None).unwrap();

        assert_eq!(cache.get_or(&"present", 0).unwrap(), 7);
        assert_eq!(cache.get_or(&"absent", 42).unwrap(), 42);
    }

    #[test]
    fn test_overwrite_replaces_whole_entry() {
        let mut cache: MemoryCache<&str, &str> = MemoryCache::new();

        cache.set("key", "first", None).unwrap();
        cache.set("key", "second", None).unwrap();

        assert_eq!(cache.get(&"key").unwrap(), Some("second"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_delete_absent_is_not_an_error() {
        let mut cache: MemoryCache<&str, &str> = MemoryCache::new();

        cache.set("key", "value", None).unwrap();
        cache.delete(&"key").unwrap();
        cache.delete(&"key").unwrap();

        assert!(cache.is_empty());
    }

    #[test]
    fn test_entry_expires_and_is_lazily_removed() {
        let mut cache: MemoryCache<&str, &str> = MemoryCache::new();

        cache.set("key", "value", Some(Duration::from_millis(20))).unwrap();
        assert_eq!(cache.get(&"key").unwrap(), Some("value"));

        sleep(Duration::from_millis(40));

        assert_eq!(cache.get(&"key").unwrap(), None);
        // The expired entry was deleted by the read that discovered it
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_timeout_expires_immediately() {
        let mut cache: MemoryCache<&str, &str> = MemoryCache::new();

        cache.set("key", "value", Some(Duration::ZERO)).unwrap();
        sleep(Duration::from_millis(1));

        assert_eq!(cache.get(&"key").unwrap(), None);
    }

    #[test]
    fn test_default_timeout_applies_to_unlabelled_set() {
        let mut cache: MemoryCache<&str, &str> =
            MemoryCache::with_timeout(Some(Duration::from_millis(20)));

        cache.set("key", "value", None).unwrap();
        sleep(Duration::from_millis(40));

        assert_eq!(cache.get(&"key").unwrap(), None);
    }

    #[test]
    fn test_per_call_timeout_overrides_default() {
        let mut cache: MemoryCache<&str, &str> =
            MemoryCache::with_timeout(Some(Duration::from_millis(20)));

        cache.set("long", "value", Some(Duration::from_secs(60))).unwrap();
        sleep(Duration::from_millis(40));

        // The override outlives the short default
        assert_eq!(cache.get(&"long").unwrap(), Some("value"));
    }

    #[test]
    fn test_contains_respects_expiry() {
        let mut cache: MemoryCache<&str, &str> = MemoryCache::new();

        cache.set("live", "value", None).unwrap();
        cache.set("dying", "value", Some(Duration::from_millis(20))).unwrap();

        assert!(cache.contains(&"live").unwrap());
        assert!(cache.contains(&"dying").unwrap());

        sleep(Duration::from_millis(40));

        assert!(cache.contains(&"live").unwrap());
        assert!(!cache.contains(&"dying").unwrap());
        assert!(!cache.contains(&"absent").unwrap());
    }

    #[test]
    fn test_purge_removes_exactly_the_expired_entries() {
        let mut cache: MemoryCache<String, i32> = MemoryCache::new();

        for i in 0..3 {
            cache
                .set(format!("expired{}", i), i, Some(Duration::from_millis(20)))
                .unwrap();
        }
        for i in 0..4 {
            cache.set(format!("live{}", i), i, None).unwrap();
        }

        sleep(Duration::from_millis(40));

        assert_eq!(cache.purge().unwrap(), 3);
        assert_eq!(cache.len(), 4);
        for i in 0..4 {
            assert_eq!(cache.get(&format!("live{}", i)).unwrap(), Some(i));
        }
    }

    #[test]
    fn test_purge_on_clean_cache_removes_nothing() {
        let mut cache: MemoryCache<&str, &str> = MemoryCache::new();

        cache.set("key", "value", None).unwrap();

        assert_eq!(cache.purge().unwrap(), 0);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_seeded_construction() {
        let mut cache =
            MemoryCache::with_entries(vec![("a", 1), ("b", 2)], Some(Duration::from_secs(60)));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&"a").unwrap(), Some(1));
        assert_eq!(cache.get(&"b").unwrap(), Some(2));
    }

    #[test]
    fn test_falsy_values_are_present() {
        // A stored "falsy" value must not read as absence
        let mut cache: MemoryCache<&str, String> = MemoryCache::new();
        cache.set("empty", String::new(), None).unwrap();
        assert_eq!(cache.get(&"empty").unwrap(), Some(String::new()));

        let mut cache: MemoryCache<&str, i64> = MemoryCache::new();
        cache.set("zero", 0, None).unwrap();
        assert_eq!(cache.get(&"zero").unwrap(), Some(0));

        let mut cache: MemoryCache<&str, bool> = MemoryCache::new();
        cache.set("false", false, None).unwrap();
        assert_eq!(cache.get(&"false").unwrap(), Some(false));
    }

    #[tokio::test]
    async fn test_suspending_contract_on_memory_cache() {
        use crate::cache::AsyncCache;

        let mut cache: MemoryCache<String, i64> = MemoryCache::new();

        AsyncCache::set(&mut cache, "key".to_string(), 9, None).await.unwrap();

        assert_eq!(AsyncCache::get(&mut cache, &"key".to_string()).await.unwrap(), Some(9));
        assert!(AsyncCache::contains(&mut cache, &"key".to_string()).await.unwrap());
        assert_eq!(AsyncCache::get_or(&mut cache, &"key".to_string(), 0).await.unwrap(), 9);
        assert_eq!(AsyncCache::get_or(&mut cache, &"absent".to_string(), 5).await.unwrap(), 5);

        AsyncCache::delete(&mut cache, &"key".to_string()).await.unwrap();
        assert_eq!(AsyncCache::get(&mut cache, &"key".to_string()).await.unwrap(), None);
    }
}
