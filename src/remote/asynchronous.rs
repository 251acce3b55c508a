//! Suspending Remote Cache Module
//!
//! Cache contract implementation over a managed asynchronous Redis
//! connection, with semantics identical to the blocking flavor.

use std::fmt::Display;
use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use tracing::debug;

use crate::cache::AsyncCache;
use crate::error::Result;
use crate::remote::{expiry_millis, Json, RemoteConfig, ValueCodec};

// == Suspending Redis Cache ==
/// Redis-backed cache, suspending flavor.
///
/// Suspension points are exactly the remote round-trips. The connection
/// manager reconnects on its own after transport drops; individual
/// commands still surface transport errors to the caller. A call cancelled
/// mid-`set` may leave the remote store written or unwritten.
pub struct AsyncRedisCache<K, V, C = Json> {
    /// Managed connection to the backing store
    manager: ConnectionManager,
    /// Prefix prepended to every transport key
    prefix: String,
    /// Default expiry for entries stored without an explicit timeout
    default_timeout: Option<Duration>,
    _marker: PhantomData<fn(K) -> (V, C)>,
}

impl<K, V, C> AsyncRedisCache<K, V, C>
where
    K: Display,
    C: ValueCodec<V>,
{
    // == Constructors ==
    /// Connects to the configured Redis instance.
    pub async fn connect(config: &RemoteConfig) -> Result<Self> {
        let client = Client::open(config.url())?;
        let manager = ConnectionManager::new(client).await?;
        debug!("Connected to redis at {}", config.url());

        Ok(Self::from_manager(
            manager,
            config.prefix.clone(),
            config.default_timeout,
        ))
    }

    /// Wraps an already-constructed connection manager supplied by the
    /// caller.
    pub fn from_manager(
        manager: ConnectionManager,
        prefix: impl Into<String>,
        default_timeout: Option<Duration>,
    ) -> Self {
        Self {
            manager,
            prefix: prefix.into(),
            default_timeout,
            _marker: PhantomData,
        }
    }

    // == Internal ==
    fn transport_key(&self, key: &K) -> String {
        format!("{}{}", self.prefix, key)
    }
}

impl<K, V, C> AsyncRedisCache<K, V, C>
where
    K: Display + Send + Sync,
    V: Send + 'static,
    C: ValueCodec<V> + Send,
{
    // == Seed ==
    /// Stores a set of initial entries under the default timeout.
    pub async fn seed(&mut self, items: impl IntoIterator<Item = (K, V)>) -> Result<()> {
        for (key, value) in items {
            AsyncCache::set(self, key, value, None).await?;
        }
        Ok(())
    }
}

// == Suspending Contract ==
#[async_trait]
impl<K, V, C> AsyncCache<K, V> for AsyncRedisCache<K, V, C>
where
    K: Display + Send + Sync,
    V: Send + 'static,
    C: ValueCodec<V> + Send,
{
    async fn get(&mut self, key: &K) -> Result<Option<V>> {
        let tkey = self.transport_key(key);

        // Nil-aware single fetch: absence is unambiguous even for values
        // whose wire form is empty or zero
        let raw: Option<String> = self.manager.get(&tkey).await?;
        raw.map(|wire| C::decode(&wire)).transpose()
    }

    async fn set(&mut self, key: K, value: V, timeout: Option<Duration>) -> Result<()> {
        let tkey = self.transport_key(&key);
        // Encode before any I/O so codec failures surface without a
        // half-done remote write
        let wire = C::encode(&value)?;

        match timeout.or(self.default_timeout) {
            Some(t) if t.is_zero() => {
                let _: () = self.manager.del(&tkey).await?;
            }
            Some(t) => {
                let _: () = self
                    .manager
                    .pset_ex(&tkey, wire, expiry_millis(t))
                    .await?;
            }
            None => {
                let _: () = self.manager.set(&tkey, wire).await?;
            }
        }

        Ok(())
    }

    async fn contains(&mut self, key: &K) -> Result<bool> {
        let tkey = self.transport_key(key);
        let exists: bool = self.manager.exists(&tkey).await?;
        Ok(exists)
    }

    async fn delete(&mut self, key: &K) -> Result<()> {
        let tkey = self.transport_key(key);
        let _: () = self.manager.del(&tkey).await?;
        Ok(())
    }

    // Redis expires entries natively
    async fn purge(&mut self) -> Result<usize> {
        Ok(0)
    }
}
