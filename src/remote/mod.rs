//! Remote Cache Module
//!
//! Implements the cache contract against a Redis key/value service, in
//! blocking and suspending flavors sharing identical semantics, plus the
//! value codecs and the named session registry.

use std::time::Duration;

mod asynchronous;
mod blocking;
mod codec;
mod registry;

// Re-export public types
pub use asynchronous::AsyncRedisCache;
pub use blocking::RedisCache;
pub use codec::{Json, StringCodec, Text, ValueCodec};
pub use registry::SessionRegistry;

// == Remote Configuration ==
/// Connection-time configuration for a remote cache.
///
/// Covers the construction surface only; loading these values from the
/// environment or a file belongs to the caller.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Redis host
    pub host: String,
    /// Redis port
    pub port: u16,
    /// Redis database index
    pub db: i64,
    /// Prefix prepended to every transport key
    pub prefix: String,
    /// Default expiry for entries stored without an explicit timeout
    pub default_timeout: Option<Duration>,
}

impl RemoteConfig {
    /// Renders the connection URL for the redis client.
    pub fn url(&self) -> String {
        format!("redis://{}:{}/{}", self.host, self.port, self.db)
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6379,
            db: 0,
            prefix: String::new(),
            default_timeout: None,
        }
    }
}

// == Expiry Conversion ==
/// Converts a timeout to the whole milliseconds redis expects, saturating
/// for durations beyond the representable range.
pub(crate) fn expiry_millis(timeout: Duration) -> u64 {
    u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)
}
