//! Cache Entry Module
//!
//! A stored payload together with its freshness deadline.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// A single entry held by the in-memory backend.
///
/// The deadline is fixed when the entry is written; reading an entry never moves it.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Serialized payload
    pub value: Vec<u8>,
    /// Instant from which the entry is considered gone
    pub expires_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry that expires `ttl` from now.
    pub fn new(value: Vec<u8>, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    // == Is Expired ==
    /// An entry is expired once the current time reaches its deadline.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    // == Time To Live ==
    /// Remaining lifetime, zero once expired.
    pub fn ttl_remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}
