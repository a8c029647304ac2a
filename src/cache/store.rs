//! Cache Store Module
//!
//! Resilient front for a `CacheBackend`. Every call is bounded by a timeout
//! and every failure is logged and counted here; callers only ever see
//! "miss" or "no-op", never an error.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::cache::CacheBackend;
use crate::error::{CacheError, CacheResult};

/// Default bound on a single backend call
pub const DEFAULT_OP_TIMEOUT: Duration = Duration::from_millis(250);

/// Default bound on clearing a whole key family, which may take several round trips
pub const DEFAULT_PREFIX_TIMEOUT: Duration = Duration::from_secs(5);

// == Cache Store ==
pub struct CacheStore {
    backend: Arc<dyn CacheBackend>,
    op_timeout: Duration,
    prefix_timeout: Duration,
    failures: AtomicU64,
}

impl CacheStore {
    // == Constructor ==
    pub fn new(backend: Arc<dyn CacheBackend>, op_timeout: Duration) -> Self {
        Self {
            backend,
            op_timeout,
            prefix_timeout: DEFAULT_PREFIX_TIMEOUT.max(op_timeout),
            failures: AtomicU64::new(0),
        }
    }

    /// Overrides the bound on `delete_by_prefix`. Never lower than the single-call bound.
    pub fn with_prefix_timeout(mut self, prefix_timeout: Duration) -> Self {
        self.prefix_timeout = prefix_timeout.max(self.op_timeout);
        self
    }

    /// Runs one backend call under `limit`, absorbing any failure.
    ///
    /// Requests the backend refused (oversized key or payload) are not
    /// backend failures and are only logged at debug.
    async fn call<T, F>(&self, op: &'static str, subject: &str, limit: Duration, fut: F) -> Option<T>
    where
        F: Future<Output = CacheResult<T>>,
    {
        let err = match tokio::time::timeout(limit, fut).await {
            Ok(Ok(value)) => return Some(value),
            Ok(Err(err)) => err,
            Err(_) => CacheError::Timeout(limit.as_millis() as u64),
        };

        if err.is_rejection() {
            debug!(backend = self.backend.name(), op, key = subject, error = %err, "cache request rejected");
            return None;
        }

        self.failures.fetch_add(1, Ordering::Relaxed);
        warn!(
            backend = self.backend.name(),
            op,
            key = subject,
            error = %err,
            "cache operation failed, continuing without cache"
        );
        None
    }

    // == Get ==
    /// Returns the cached payload, or `None` on a miss or any failure.
    pub async fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.call("get", key, self.op_timeout, self.backend.get(key)).await.flatten()
    }

    // == Set ==
    /// Best-effort population. Returns whether the backend accepted the entry.
    pub async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> bool {
        if ttl.is_zero() {
            debug!(key, "zero TTL, skipping cache population");
            return false;
        }
        self.call("set", key, self.op_timeout, self.backend.set_ex(key, value, ttl))
            .await
            .is_some()
    }

    // == Delete ==
    /// Best-effort removal of one key. Returns whether the backend acknowledged it.
    pub async fn delete(&self, key: &str) -> bool {
        self.call("delete", key, self.op_timeout, self.backend.delete(key))
            .await
            .is_some()
    }

    // == Delete By Prefix ==
    /// Removes every key of a family. Returns whether the backend acknowledged it.
    ///
    /// Bounded by the family budget, not the single-call timeout.
    pub async fn delete_by_prefix(&self, prefix: &str) -> bool {
        match self
            .call(
                "delete_prefix",
                prefix,
                self.prefix_timeout,
                self.backend.delete_prefix(prefix),
            )
            .await
        {
            Some(removed) => {
                debug!(prefix, removed, "cache family cleared");
                true
            }
            None => false,
        }
    }

    /// Number of backend calls that failed or timed out so far.
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Releases the backend connection. Called once at shutdown.
    pub async fn close(&self) {
        self.backend.close().await;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::backend::testing::{FlakyBackend, SlowScanBackend, StalledBackend};
    use crate::cache::MemoryBackend;

    const TTL: Duration = Duration::from_secs(300);

    fn memory_store() -> CacheStore {
        CacheStore::new(Arc::new(MemoryBackend::new(100)), DEFAULT_OP_TIMEOUT)
    }

    #[tokio::test]
    async fn test_set_get_delete() {
        let store = memory_store();

        assert!(store.set("k", b"v", TTL).await);
        assert_eq!(store.get("k").await, Some(b"v".to_vec()));
        assert!(store.delete("k").await);
        assert_eq!(store.get("k").await, None);
        assert_eq!(store.failures(), 0);
    }

    #[tokio::test]
    async fn test_delete_by_prefix_removes_every_populated_key() {
        let store = memory_store();
        for page in 1..=25 {
            store
                .set(&format!("products:list:{}:10", page), b"page", TTL)
                .await;
        }
        store.set("products:detail:x", b"detail", TTL).await;

        assert!(store.delete_by_prefix("products:list:").await);
        for page in 1..=25 {
            assert_eq!(store.get(&format!("products:list:{}:10", page)).await, None);
        }
        assert!(store.get("products:detail:x").await.is_some());
    }

    #[tokio::test]
    async fn test_zero_ttl_is_not_stored() {
        let store = memory_store();
        assert!(!store.set("k", b"v", Duration::ZERO).await);
        assert_eq!(store.get("k").await, None);
    }

    #[tokio::test]
    async fn test_failures_are_absorbed_and_counted() {
        let backend = Arc::new(FlakyBackend::new());
        backend.set_down(true);
        let store = CacheStore::new(backend, DEFAULT_OP_TIMEOUT);

        assert_eq!(store.get("k").await, None);
        assert!(!store.set("k", b"v", TTL).await);
        assert!(!store.delete("k").await);
        assert!(!store.delete_by_prefix("products:").await);
        assert_eq!(store.failures(), 4);
    }

    #[tokio::test]
    async fn test_recovers_when_backend_returns() {
        let backend = Arc::new(FlakyBackend::new());
        let store = CacheStore::new(backend.clone(), DEFAULT_OP_TIMEOUT);

        backend.set_down(true);
        assert!(!store.set("k", b"v", TTL).await);

        backend.set_down(false);
        assert!(store.set("k", b"v", TTL).await);
        assert_eq!(store.get("k").await, Some(b"v".to_vec()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_backend_times_out() {
        let store = CacheStore::new(Arc::new(StalledBackend), Duration::from_millis(50));

        assert_eq!(store.get("k").await, None);
        assert!(!store.set("k", b"v", TTL).await);
        assert_eq!(store.failures(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_multi_round_trip_prefix_delete_completes() {
        // 20 pages of 20ms each: well past the single-call bound
        let backend = Arc::new(SlowScanBackend::new(20, Duration::from_millis(20)));
        let store = CacheStore::new(backend.clone(), DEFAULT_OP_TIMEOUT);
        for page in 1..=5 {
            store.set(&format!("products:list:{}", page), b"page", TTL).await;
        }

        assert!(store.delete_by_prefix("products:list:").await);
        for page in 1..=5 {
            assert_eq!(store.get(&format!("products:list:{}", page)).await, None);
        }
        assert_eq!(store.failures(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_prefix_delete_still_bounded() {
        let backend = Arc::new(SlowScanBackend::new(20, Duration::from_millis(20)));
        let store = CacheStore::new(backend, Duration::from_millis(50))
            .with_prefix_timeout(Duration::from_millis(100));

        assert!(!store.delete_by_prefix("products:list:").await);
        assert_eq!(store.failures(), 1);
    }

    #[tokio::test]
    async fn test_oversized_key_is_not_a_backend_failure() {
        let store = memory_store();
        let key = format!("products:search:{}", "q".repeat(crate::cache::MAX_KEY_LENGTH));

        assert!(!store.set(&key, b"v", TTL).await);
        assert_eq!(store.get(&key).await, None);
        assert_eq!(store.failures(), 0);
    }
}
