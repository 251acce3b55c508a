//! Cache Entry Module
//!
//! Defines the wrapper for individual cache entries with expiry support.

use std::time::{Duration, Instant};

// == Entry ==
/// A stored value together with its optional absolute expiry instant.
///
/// The expiry instant is computed once, at insertion, as `now + timeout`.
/// It is never recomputed on read. An entry without a timeout never expires;
/// an entry with a zero timeout is already past its expiry on the next read.
#[derive(Debug, Clone)]
pub struct Entry<V> {
    /// The stored value
    pub value: V,
    /// Absolute expiry instant, None = never expires
    expires_at: Option<Instant>,
}

impl<V> Entry<V> {
    // == Constructor ==
    /// Creates a new entry with an optional time-to-live.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `timeout` - Optional TTL; `None` means the entry never expires
    pub fn new(value: V, timeout: Option<Duration>) -> Self {
        Self {
            value,
            expires_at: timeout.map(|t| Instant::now() + t),
        }
    }

    // == Is Expired ==
    /// Checks whether the entry has expired.
    ///
    /// Only the absence of a timeout means never-expires. A zero timeout
    /// produces `expires_at == insertion instant`, so any strictly later
    /// read observes the entry as expired.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => Instant::now() > expires,
            None => false,
        }
    }

    /// Returns the absolute expiry instant, if any.
    pub fn expires_at(&self) -> Option<Instant> {
        self.expires_at
    }
}
