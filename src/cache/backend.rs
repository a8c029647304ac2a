//! Cache Backend Module
//!
//! The key-value transport the cache layer sits on. Implementations report
//! every failure as a `CacheError`; deciding what to do about it is the
//! job of `CacheStore`.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::CacheResult;

// == Cache Backend ==
/// A key-value store with per-entry TTL and prefix deletion.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Returns the payload stored under `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>>;

    /// Stores `value` under `key`, replacing any previous entry and deadline.
    async fn set_ex(&self, key: &str, value: &[u8], ttl: Duration) -> CacheResult<()>;

    /// Removes exactly one key. Returns whether it existed.
    async fn delete(&self, key: &str) -> CacheResult<bool>;

    /// Removes every key starting with `prefix`. Returns how many were removed.
    async fn delete_prefix(&self, prefix: &str) -> CacheResult<usize>;

    /// Releases any connection held by the backend.
    async fn close(&self) {}
}
