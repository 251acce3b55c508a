//! Cachekit - expiring caches with function memoization
//!
//! A process-local and remote-backed caching layer: an expiring key/value
//! store with optional LRU-bounded eviction, a Redis-backed implementation
//! of the same contract, and a memoization wrapper that derives a cache
//! key from a call's arguments and short-circuits recomputation.
//!
//! # Example
//! ```
//! use cachekit::cache::{Cache, MemoryCache};
//! use std::time::Duration;
//!
//! let mut cache: MemoryCache<&str, String> =
//!     MemoryCache::with_timeout(Some(Duration::from_secs(60)));
//!
//! cache.set("greeting", "hello".to_string(), None).unwrap();
//! assert_eq!(cache.get(&"greeting").unwrap(), Some("hello".to_string()));
//! ```

pub mod cache;
pub mod error;
pub mod memo;
pub mod remote;

pub use cache::{AsyncCache, Cache, Entry, LruMemoryCache, MemoryCache};
pub use error::{CacheError, Result};
pub use memo::{Args, AsyncMemo, KeyPolicy, Memo, Signature};
pub use remote::{AsyncRedisCache, RedisCache, RemoteConfig, SessionRegistry};
