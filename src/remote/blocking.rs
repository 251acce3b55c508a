//! Blocking Remote Cache Module
//!
//! Cache contract implementation over a blocking Redis connection.

use std::fmt::Display;
use std::marker::PhantomData;
use std::time::Duration;

use redis::{Client, Commands, Connection};
use tracing::debug;

use crate::cache::Cache;
use crate::error::Result;
use crate::remote::{expiry_millis, Json, RemoteConfig, ValueCodec};

// == Blocking Redis Cache ==
/// Redis-backed cache, blocking flavor.
///
/// Logical keys are mapped to transport keys by prepending the configured
/// prefix to the key's canonical string form, so the key type must render
/// a stable `Display`. Values cross the wire through the codec `C`, chosen
/// at construction: [`Json`] by default, or [`Text`](crate::remote::Text)
/// for types with their own string codec.
///
/// Expiry is delegated to Redis itself; `purge` is therefore a no-op.
/// Transport and codec failures propagate as errors, never as misses.
pub struct RedisCache<K, V, C = Json> {
    /// Open connection to the backing store
    conn: Connection,
    /// Prefix prepended to every transport key
    prefix: String,
    /// Default expiry for entries stored without an explicit timeout
    default_timeout: Option<Duration>,
    _marker: PhantomData<fn(K) -> (V, C)>,
}

impl<K, V, C> RedisCache<K, V, C>
where
    K: Display,
    C: ValueCodec<V>,
{
    // == Constructors ==
    /// Connects to the configured Redis instance.
    ///
    /// # Errors
    /// Returns [`CacheError::Backend`](crate::CacheError::Backend) if the
    /// connection cannot be established.
    pub fn connect(config: &RemoteConfig) -> Result<Self> {
        let client = Client::open(config.url())?;
        let conn = client.get_connection()?;
        debug!("Connected to redis at {}", config.url());

        Ok(Self::from_connection(
            conn,
            config.prefix.clone(),
            config.default_timeout,
        ))
    }

    /// Wraps an already-open connection supplied by the caller.
    pub fn from_connection(
        conn: Connection,
        prefix: impl Into<String>,
        default_timeout: Option<Duration>,
    ) -> Self {
        Self {
            conn,
            prefix: prefix.into(),
            default_timeout,
            _marker: PhantomData,
        }
    }

    // == Seed ==
    /// Stores a set of initial entries under the default timeout.
    pub fn seed(&mut self, items: impl IntoIterator<Item = (K, V)>) -> Result<()> {
        for (key, value) in items {
            Cache::set(self, key, value, None)?;
        }
        Ok(())
    }

    // == Internal ==
    /// Maps a logical key to its transport key.
    fn transport_key(&self, key: &K) -> String {
        format!("{}{}", self.prefix, key)
    }
}

// == Blocking Contract ==
impl<K, V, C> Cache<K, V> for RedisCache<K, V, C>
where
    K: Display,
    C: ValueCodec<V>,
{
    fn get(&mut self, key: &K) -> Result<Option<V>> {
        let tkey = self.transport_key(key);

        // Single round-trip with an explicit miss marker: redis nil maps
        // to None, while an empty stored string comes back as Some("")
        let raw: Option<String> = self.conn.get(&tkey)?;
        raw.map(|wire| C::decode(&wire)).transpose()
    }

    fn set(&mut self, key: K, value: V, timeout: Option<Duration>) -> Result<()> {
        let tkey = self.transport_key(&key);
        let wire = C::encode(&value)?;

        match timeout.or(self.default_timeout) {
            // Redis rejects a zero expiry; an entry that expires on the
            // next read is observationally absent, so drop the key
            Some(t) if t.is_zero() => {
                let _: () = self.conn.del(&tkey)?;
            }
            Some(t) => {
                let _: () = self.conn.pset_ex(&tkey, wire, expiry_millis(t))?;
            }
            None => {
                let _: () = self.conn.set(&tkey, wire)?;
            }
        }

        Ok(())
    }

    fn contains(&mut self, key: &K) -> Result<bool> {
        let tkey = self.transport_key(key);
        let exists: bool = self.conn.exists(&tkey)?;
        Ok(exists)
    }

    fn delete(&mut self, key: &K) -> Result<()> {
        let tkey = self.transport_key(key);
        let _: () = self.conn.del(&tkey)?;
        Ok(())
    }

    // Redis expires entries natively
    fn purge(&mut self) -> Result<usize> {
        Ok(0)
    }
}
