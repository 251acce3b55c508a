//! Cache Module
//!
//! In-memory caching with lazy expiry and optional LRU-bounded storage,
//! behind a uniform blocking/suspending cache contract.
//!
//! The two traits below are deliberately parallel: same method names, same
//! semantics. A backend implements [`Cache`] when its operations complete
//! without suspending (local map access) and [`AsyncCache`] when they may
//! await external I/O. The in-memory backends implement both, so callers
//! that are generic over [`AsyncCache`] can use a local cache and a remote
//! cache interchangeably.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

mod entry;
mod lru;
mod memory;


// Re-export public types
pub use entry::Entry;
pub use lru::{LruMemoryCache, LruTracker};
pub use memory::MemoryCache;

// == Blocking Cache Contract ==
/// The capability set every blocking cache backend must satisfy.
///
/// Absence is a distinguished value, never an error: `get` returns
/// `Ok(None)` for a missing or expired key. Errors are reserved for
/// backend and serialization failures, which the in-memory backends
/// never produce.
pub trait Cache<K, V> {
    /// Returns the value if present and not expired.
    ///
    /// As a side effect, an expired entry discovered during lookup may be
    /// lazily deleted.
    fn get(&mut self, key: &K) -> Result<Option<V>>;

    /// Returns the value if present and not expired, else `default`.
    fn get_or(&mut self, key: &K, default: V) -> Result<V> {
        Ok(self.get(key)?.unwrap_or(default))
    }

    /// Inserts or replaces the entry for `key`.
    ///
    /// `timeout` overrides the cache's configured default for this entry
    /// only; `None` falls back to the default.
    fn set(&mut self, key: K, value: V, timeout: Option<Duration>) -> Result<()>;

    /// Returns true only if `key` is present and not expired.
    fn contains(&mut self, key: &K) -> Result<bool>;

    /// Removes the entry for `key` if present; absent keys are not an error.
    fn delete(&mut self, key: &K) -> Result<()>;

    /// Scans all entries, deletes every expired one and returns the count
    /// removed.
    ///
    /// Backends whose store manages expiry natively (the remote cache)
    /// implement this as a no-op returning 0.
    fn purge(&mut self) -> Result<usize>;
}

// == Suspending Cache Contract ==
/// The suspending flavor of [`Cache`], with identical semantics.
///
/// Suspension points are exactly the points where a backend operation may
/// wait on external I/O; the in-memory implementations never actually
/// suspend.
#[async_trait]
pub trait AsyncCache<K, V>: Send
where
    K: Send + Sync,
    V: Send + 'static,
{
    /// Returns the value if present and not expired.
    async fn get(&mut self, key: &K) -> Result<Option<V>>;

    /// Returns the value if present and not expired, else `default`.
    async fn get_or(&mut self, key: &K, default: V) -> Result<V> {
        Ok(self.get(key).await?.unwrap_or(default))
    }

    /// Inserts or replaces the entry for `key`, with an optional per-entry
    /// timeout override.
    async fn set(&mut self, key: K, value: V, timeout: Option<Duration>) -> Result<()>;

    /// Returns true only if `key` is present and not expired.
    async fn contains(&mut self, key: &K) -> Result<bool>;

    /// Removes the entry for `key` if present; absent keys are not an error.
    async fn delete(&mut self, key: &K) -> Result<()>;

    /// Deletes every expired entry and returns the count removed.
    async fn purge(&mut self) -> Result<usize>;
}
