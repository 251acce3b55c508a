//! LRU Memory Cache Module
//!
//! Memory cache variant bounded by entry count, evicting least-recently-used
//! entries independent of TTL.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::cache::{AsyncCache, Cache, Entry};
use crate::error::Result;

// == LRU Tracker ==
/// Tracks access order for LRU eviction.
///
/// Keys are stored in a VecDeque where:
/// - Front = Most recently used
/// - Back = Least recently used
#[derive(Debug)]
pub struct LruTracker<K> {
    /// Order of keys by access time
    order: VecDeque<K>,
}

impl<K> LruTracker<K>
where
    K: Clone + PartialEq,
{
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Touch ==
    /// Marks a key as recently used (moves to front).
    pub fn touch(&mut self, key: &K) {
        self.remove(key);
        self.order.push_front(key.clone());
    }

    // == Remove ==
    /// Removes a key from the tracker.
    pub fn remove(&mut self, key: &K) {
        self.order.retain(|k| k != key);
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    ///
    /// Returns None if the tracker is empty.
    pub fn evict_oldest(&mut self) -> Option<K> {
        self.order.pop_back()
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without removing it.
    pub fn peek_oldest(&self) -> Option<&K> {
        self.order.back()
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<K> Default for LruTracker<K>
where
    K: Clone + PartialEq,
{
    fn default() -> Self {
        Self::new()
    }
}

// == LRU Memory Cache ==
/// In-memory cache bounded by entry count.
///
/// Same contract as [`MemoryCache`](crate::cache::MemoryCache), plus a
/// `max_size` bound. Every successful `get`, `set` or `contains` on a
/// present key promotes it to most-recently-used. Inserting a new key at
/// capacity evicts the least-recently-used entry first; eviction is
/// unconditional on capacity, independent of whether the evicted entry has
/// also expired. TTL-expiry-on-read runs before capacity accounting: an
/// expired entry discovered on read is deleted and frees its slot.
#[derive(Debug)]
pub struct LruMemoryCache<K, V> {
    /// Key-value storage
    entries: HashMap<K, Entry<V>>,
    /// Recency-of-access tracker, maintained alongside the map
    lru: LruTracker<K>,
    /// Maximum number of entries allowed
    max_size: usize,
    /// Default timeout for entries stored without an explicit one
    default_timeout: Option<Duration>,
}

impl<K, V> LruMemoryCache<K, V>
where
    K: Eq + Hash + Clone,
{
    // == Constructors ==
    /// Creates an empty bounded cache.
    ///
    /// # Arguments
    /// * `max_size` - Maximum number of entries the cache can hold
    ///
    /// # Panics
    /// Panics if `max_size` is zero.
    pub fn new(max_size: usize) -> Self {
        Self::with_timeout(max_size, None)
    }

    /// Creates an empty bounded cache with a default timeout.
    ///
    /// # Panics
    /// Panics if `max_size` is zero; a bounded cache must be able to hold
    /// at least one entry.
    pub fn with_timeout(max_size: usize, timeout: Option<Duration>) -> Self {
        assert!(max_size > 0, "max_size must be at least 1");

        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            max_size,
            default_timeout: timeout,
        }
    }

    /// Creates a bounded cache seeded with initial key-value pairs.
    ///
    /// Seeding goes through `set`, so the bound holds and earlier seed
    /// entries are evicted once the capacity is reached.
    pub fn with_entries(
        max_size: usize,
        items: impl IntoIterator<Item = (K, V)>,
        timeout: Option<Duration>,
    ) -> Self {
        let mut cache = Self::with_timeout(max_size, timeout);
        for (key, value) in items {
            cache.insert(key, value, None);
        }
        cache
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

    /// Returns the configured capacity bound.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    // == Internal ==
    /// Removes one entry and its tracker slot.
    fn remove_entry(&mut self, key: &K) {
        self.entries.remove(key);
        self.lru.remove(key);
    }

    /// Stores one entry, evicting the least-recently-used entry first when
    /// a new key arrives at capacity. Infallible: local map access cannot
    /// fail.
    fn insert(&mut self, key: K, value: V, timeout: Option<Duration>) {
        let is_new = !self.entries.contains_key(&key);

        if is_new && self.entries.len() >= self.max_size {
            if let Some(evicted) = self.lru.evict_oldest() {
                self.entries.remove(&evicted);
                debug!("Capacity eviction of least-recently-used entry");
            }
        }

        let effective = timeout.or(self.default_timeout);
        self.entries.insert(key.clone(), Entry::new(value, effective));
        self.lru.touch(&key);
    }
}

// == Blocking Contract ==
impl<K, V> Cache<K, V> for LruMemoryCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn get(&mut self, key: &K) -> Result<Option<V>> {
        if let Some(entry) = self.entries.get(key) {
            if entry.is_expired() {
                // Expiry check runs first and frees the capacity slot
                self.remove_entry(key);
                return Ok(None);
            }
            let value = entry.value.clone();
            self.lru.touch(key);
            return Ok(Some(value));
        }
        Ok(None)
    }

    fn set(&mut self, key: K, value: V, timeout: Option<Duration>) -> Result<()> {
        self.insert(key, value, timeout);
        Ok(())
    }

    fn contains(&mut self, key: &K) -> Result<bool> {
        if let Some(entry) = self.entries.get(key) {
            if entry.is_expired() {
                self.remove_entry(key);
                return Ok(false);
            }
            self.lru.touch(key);
            return Ok(true);
        }
        Ok(false)
    }

    fn delete(&mut self, key: &K) -> Result<()> {
        self.remove_entry(key);
        Ok(())
    }

    fn purge(&mut self) -> Result<usize> {
        let expired: Vec<K> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        let removed = expired.len();
        for key in expired {
            self.remove_entry(&key);
        }

        if removed > 0 {
            debug!("Purge removed {} expired entries", removed);
        }

        Ok(removed)
    }
}

// == Suspending Contract ==
#[async_trait]
impl<K, V> AsyncCache<K, V> for LruMemoryCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
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
    // Only the blocking trait in scope; both contracts would make every
    // dot-method call ambiguous.
    use super::{Cache, LruMemoryCache, LruTracker};
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_tracker_touch_and_evict_order() {
        let mut lru: LruTracker<&str> = LruTracker::new();

        lru.touch(&"a");
        lru.touch(&"b");
        lru.touch(&"c");

        assert_eq!(lru.len(), 3);
        assert_eq!(lru.peek_oldest(), Some(&"a"));

        // Touching an existing key moves it to the front
        lru.touch(&"a");
        assert_eq!(lru.peek_oldest(), Some(&"b"));

        assert_eq!(lru.evict_oldest(), Some("b"));
        assert_eq!(lru.evict_oldest(), Some("c"));
        assert_eq!(lru.evict_oldest(), Some("a"));
        assert_eq!(lru.evict_oldest(), None);
    }

    #[test]
    fn test_tracker_remove() {
        let mut lru: LruTracker<&str> = LruTracker::new();

        lru.touch(&"a");
        lru.touch(&"b");
        lru.remove(&"a");
        lru.remove(&"missing");

        assert_eq!(lru.len(), 1);
        assert_eq!(lru.evict_oldest(), Some("b"));
        assert!(lru.is_empty());
    }

    #[test]
    fn test_inserting_past_capacity_evicts_oldest() {
        let mut cache: LruMemoryCache<String, i32> = LruMemoryCache::new(3);

        for i in 1..=4 {
            cache.set(format!("key{}", i), i, None).unwrap();
        }

        // Exactly the last three keys remain
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get(&"key1".to_string()).unwrap(), None);
        assert_eq!(cache.get(&"key2".to_string()).unwrap(), Some(2));
        assert_eq!(cache.get(&"key3".to_string()).unwrap(), Some(3));
        assert_eq!(cache.get(&"key4".to_string()).unwrap(), Some(4));
    }

    #[test]
    fn test_read_promotes_and_prevents_eviction() {
        let mut cache: LruMemoryCache<&str, i32> = LruMemoryCache::new(3);

        cache.set("a", 1, None).unwrap();
        cache.set("b", 2, None).unwrap();
        cache.set("c", 3, None).unwrap();

        // Promote "a"; "b" becomes the eviction candidate
        cache.get(&"a").unwrap();
        cache.set("d", 4, None).unwrap();

        assert_eq!(cache.get(&"a").unwrap(), Some(1));
        assert_eq!(cache.get(&"b").unwrap(), None);
        assert_eq!(cache.get(&"d").unwrap(), Some(4));
    }

    #[test]
    fn test_contains_promotes() {
        let mut cache: LruMemoryCache<&str, i32> = LruMemoryCache::new(2);

        cache.set("a", 1, None).unwrap();
        cache.set("b", 2, None).unwrap();

        assert!(cache.contains(&"a").unwrap());
        cache.set("c", 3, None).unwrap();

        // "b" was least recently used once "a" was promoted
        assert_eq!(cache.get(&"b").unwrap(), None);
        assert_eq!(cache.get(&"a").unwrap(), Some(1));
    }

    #[test]
    fn test_overwrite_does_not_evict() {
        let mut cache: LruMemoryCache<&str, i32> = LruMemoryCache::new(2);

        cache.set("a", 1, None).unwrap();
        cache.set("b", 2, None).unwrap();
        cache.set("a", 10, None).unwrap();

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&"a").unwrap(), Some(10));
        assert_eq!(cache.get(&"b").unwrap(), Some(2));
    }

    #[test]
    fn test_expired_entry_frees_slot_on_read() {
        let mut cache: LruMemoryCache<&str, i32> = LruMemoryCache::new(2);

        cache.set("dying", 1, Some(Duration::from_millis(20))).unwrap();
        cache.set("live", 2, None).unwrap();

        sleep(Duration::from_millis(40));

        // The read deletes the expired entry rather than counting it
        assert_eq!(cache.get(&"dying").unwrap(), None);
        assert_eq!(cache.len(), 1);

        // The freed slot takes the next insert without evicting "live"
        cache.set("new", 3, None).unwrap();
        assert_eq!(cache.get(&"live").unwrap(), Some(2));
        assert_eq!(cache.get(&"new").unwrap(), Some(3));
    }

    #[test]
    fn test_eviction_ignores_ttl() {
        let mut cache: LruMemoryCache<&str, i32> = LruMemoryCache::new(2);

        // The LRU entry has the longer TTL; it is evicted regardless
        cache.set("oldest", 1, Some(Duration::from_secs(3600))).unwrap();
        cache.set("newer", 2, Some(Duration::from_secs(1))).unwrap();
        cache.set("newest", 3, None).unwrap();

        assert_eq!(cache.get(&"oldest").unwrap(), None);
        assert_eq!(cache.get(&"newer").unwrap(), Some(2));
        assert_eq!(cache.get(&"newest").unwrap(), Some(3));
    }

    #[test]
    fn test_purge_keeps_tracker_in_sync() {
        let mut cache: LruMemoryCache<String, i32> = LruMemoryCache::new(10);

        cache.set("expired".to_string(), 1, Some(Duration::from_millis(20))).unwrap();
        cache.set("live".to_string(), 2, None).unwrap();

        sleep(Duration::from_millis(40));

        assert_eq!(cache.purge().unwrap(), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.lru.len(), 1);
        assert_eq!(cache.get(&"live".to_string()).unwrap(), Some(2));
    }

    #[test]
    fn test_delete_keeps_tracker_in_sync() {
        let mut cache: LruMemoryCache<&str, i32> = LruMemoryCache::new(10);

        cache.set("a", 1, None).unwrap();
        cache.delete(&"a").unwrap();

        assert!(cache.is_empty());
        assert!(cache.lru.is_empty());
    }

    #[test]
    #[should_panic(expected = "max_size must be at least 1")]
    fn test_zero_capacity_is_rejected() {
        let _ = LruMemoryCache::<&str, i32>::new(0);
    }

    #[test]
    fn test_capacity_one_evicts_on_every_new_key() {
        let mut cache: LruMemoryCache<&str, i32> = LruMemoryCache::new(1);

        cache.set("a", 1, None).unwrap();
        cache.set("b", 2, None).unwrap();

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&"a").unwrap(), None);
        assert_eq!(cache.get(&"b").unwrap(), Some(2));
    }

    #[test]
    fn test_seeded_construction_respects_bound() {
        let cache = LruMemoryCache::with_entries(
            2,
            vec![("a", 1), ("b", 2), ("c", 3)],
            Some(Duration::from_secs(60)),
        );

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.max_size(), 2);
    }
}
