//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// A stored key/value pair and its absolute expiry time.
#[derive(Debug, Clone)]
pub struct Entry<V> {
    /// Key this entry is indexed under
    pub key: String,
    /// The stored value
    pub value: V,
    /// Instant after which the entry is logically gone
    pub expires_at: Instant,
}

impl<V> Entry<V> {
    // == Constructor ==
    /// Creates an entry that expires `ttl` after `now`.
    pub fn new(key: String, value: V, now: Instant, ttl: Duration) -> Self {
        Self {
            key,
            value,
            expires_at: now + ttl,
        }
    }

    // == Refresh ==
    /// Replaces the value and pushes expiry out to `now + ttl`.
    pub fn refresh(&mut self, value: V, now: Instant, ttl: Duration) {
        self.value = value;
        self.expires_at = now + ttl;
    }

    // == Is Expired ==
    /// Checks if the entry has expired as of `now`.
    ///
    /// An entry whose expiry equals `now` is already expired: only an
    /// expiry strictly in the future keeps it alive.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}
