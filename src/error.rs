//! Error types for the caching layer
//!
//! Provides unified error handling using thiserror.
//!
//! Absence is never an error: `get` on a missing or expired key returns
//! `Ok(None)`. The variants here cover conditions a caller must be able to
//! tell apart from a plain miss: a backend that cannot be reached, a value
//! that cannot cross the wire, or a memoization signature that cannot be
//! derived.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache and memoization operations.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Remote backend could not be reached or rejected a command.
    ///
    /// Never converted into a cache miss.
    #[error("Cache backend unavailable: {0}")]
    Backend(#[from] redis::RedisError),

    /// Value could not be encoded for storage
    #[error("Failed to encode value: {0}")]
    Encode(String),

    /// Stored value could not be decoded back
    #[error("Failed to decode value: {0}")]
    Decode(String),

    /// Memoization signature derivation failed because a required
    /// argument was not supplied
    #[error("Required argument missing: {0}")]
    MissingArgument(String),

    /// A session was registered under this name with a different cache type
    #[error("Session `{0}` is registered with a different cache type")]
    SessionTypeMismatch(String),
}

// == Result Type Alias ==
/// Convenience Result type for the caching layer.
pub type Result<T> = std::result::Result<T, CacheError>;
