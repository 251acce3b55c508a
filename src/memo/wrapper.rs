//! Memoization Wrapper Module
//!
//! Wraps a computation behind a cache consulted by argument signature, in
//! blocking and suspending flavors.

use std::future::Future;
use std::marker::PhantomData;
use std::time::Duration;

use crate::cache::{AsyncCache, Cache, MemoryCache};
use crate::error::Result;
use crate::memo::{build_signature, Args, KeyPolicy, Signature};

// == Blocking Memoization Wrapper ==
/// Memoizes a blocking computation against any blocking cache.
///
/// Each call derives a [`Signature`] from the supplied [`Args`] under the
/// wrapper's [`KeyPolicy`], consults the backing cache, and only runs the
/// computation on a miss, storing the result. On a hit the computation is
/// not run, so its side effects do not occur.
///
/// Signatures compare argument *hashes*, not the arguments themselves;
/// colliding hashes are treated as the same call.
///
/// Concurrent identical calls are not de-duplicated: two callers that both
/// miss will both compute and both store (last write wins).
///
/// # Example
/// ```
/// use cachekit::memo::{Args, Memo};
///
/// let mut double: Memo<i64> = Memo::new("double", None);
/// let result = double.call(Args::new().arg(&21), || 21 * 2).unwrap();
/// assert_eq!(result, 42);
/// ```
pub struct Memo<V, C = MemoryCache<Signature, V>> {
    /// Identity of the wrapped callable, hashed into every signature
    name: String,
    /// Argument inclusion policy
    policy: KeyPolicy,
    /// Backing cache
    cache: C,
    _value: PhantomData<V>,
}

impl<V> Memo<V, MemoryCache<Signature, V>>
where
    V: Clone,
{
    /// Creates a wrapper backed by a fresh memory cache with the given
    /// timeout, including every argument in the signature.
    pub fn new(name: &str, timeout: Option<Duration>) -> Self {
        Self::with_cache(name, KeyPolicy::new(), MemoryCache::with_timeout(timeout))
    }
}

impl<V, C> Memo<V, C>
where
    V: Clone,
    C: Cache<Signature, V>,
{
    /// Creates a wrapper over an explicit backing cache and policy.
    pub fn with_cache(name: &str, policy: KeyPolicy, cache: C) -> Self {
        Self {
            name: name.to_string(),
            policy,
            cache,
            _value: PhantomData,
        }
    }

    // == Call ==
    /// Returns the cached result for `args`, computing and storing it on a
    /// miss.
    ///
    /// Signature derivation failures surface before `compute` runs.
    pub fn call(&mut self, args: Args, compute: impl FnOnce() -> V) -> Result<V> {
        let sig = build_signature(&self.name, &args, &self.policy)?;

        if let Some(value) = self.cache.get(&sig)? {
            return Ok(value);
        }

        let value = compute();
        // Stored without a per-entry override so the backing cache's
        // default timeout applies
        self.cache.set(sig, value.clone(), None)?;

        Ok(value)
    }

    /// Returns the backing cache.
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Returns the backing cache mutably, e.g. to delete or purge entries.
    pub fn cache_mut(&mut self) -> &mut C {
        &mut self.cache
    }
}

// == Suspending Memoization Wrapper ==
/// Memoizes a suspending computation against any suspending cache.
///
/// Identical semantics to [`Memo`]; the cache query and store are awaited.
/// Because the in-memory caches also implement the suspending contract,
/// the backing cache may be local or remote interchangeably.
///
/// # Example
/// ```no_run
/// # async fn demo() -> cachekit::Result<()> {
/// use cachekit::memo::{Args, AsyncMemo};
///
/// let mut fetch: AsyncMemo<String> = AsyncMemo::new("fetch", None);
/// let body = fetch
///     .call(Args::new().arg("https://example.com"), async {
///         "response body".to_string()
///     })
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct AsyncMemo<V, C = MemoryCache<Signature, V>> {
    name: String,
    policy: KeyPolicy,
    cache: C,
    _value: PhantomData<V>,
}

impl<V> AsyncMemo<V, MemoryCache<Signature, V>>
where
    V: Clone + Send + 'static,
{
    /// Creates a wrapper backed by a fresh memory cache with the given
    /// timeout, including every argument in the signature.
    pub fn new(name: &str, timeout: Option<Duration>) -> Self {
        Self::with_cache(name, KeyPolicy::new(), MemoryCache::with_timeout(timeout))
    }
}

impl<V, C> AsyncMemo<V, C>
where
    V: Clone + Send + 'static,
    C: AsyncCache<Signature, V>,
{
    /// Creates a wrapper over an explicit backing cache and policy.
    pub fn with_cache(name: &str, policy: KeyPolicy, cache: C) -> Self {
        Self {
            name: name.to_string(),
            policy,
            cache,
            _value: PhantomData,
        }
    }

    // == Call ==
    /// Returns the cached result for `args`, computing and storing it on a
    /// miss.
    ///
    /// On a hit the `compute` future is dropped unpolled, so the wrapped
    /// work never starts. A cancelled in-flight store may leave the remote
    /// backend written or unwritten; there is no rollback.
    pub async fn call<F>(&mut self, args: Args, compute: F) -> Result<V>
    where
        F: Future<Output = V>,
    {
        let sig = build_signature(&self.name, &args, &self.policy)?;

        if let Some(value) = self.cache.get(&sig).await? {
            return Ok(value);
        }

        let value = compute.await;
        self.cache.set(sig, value.clone(), None).await?;

        Ok(value)
    }

    /// Returns the backing cache.
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Returns the backing cache mutably.
    pub fn cache_mut(&mut self) -> &mut C {
        &mut self.cache
    }
}
