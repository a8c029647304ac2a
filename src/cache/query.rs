//! Query Cache Module
//!
//! Cache-aside orchestration for read handlers.

use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::{CacheKey, CacheStats, CacheStore, KeyCodec, QueryCounters, QueryParams, TtlClass, TtlPolicy};
use crate::error::CacheError;

// == Query Cache ==
/// Serves reads from the cache and falls through to the authoritative query on a miss.
///
/// Concurrent misses on the same key are not coalesced: each runs its query
/// and each populates the cache. Every writer stores a snapshot of the same
/// store, so this costs duplicate work but never correctness.
pub struct QueryCache {
    store: Arc<CacheStore>,
    policy: TtlPolicy,
    counters: QueryCounters,
}

impl QueryCache {
    pub fn new(store: Arc<CacheStore>, policy: TtlPolicy) -> Self {
        Self {
            store,
            policy,
            counters: QueryCounters::default(),
        }
    }

    // == Fetch ==
    /// Returns the cached result for `key`, or runs `query_fn` and caches its result.
    ///
    /// A failing `query_fn` is returned to the caller unchanged and nothing is cached.
    /// A cached payload that no longer decodes as `T` counts as a miss and is overwritten.
    pub async fn fetch<T, E, F, Fut>(&self, key: &CacheKey, class: TtlClass, query_fn: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(bytes) = self.store.get(key.as_str()).await {
            match serde_json::from_slice::<T>(&bytes) {
                Ok(value) => {
                    self.counters.record_hit();
                    debug!(%key, "cache hit");
                    return Ok(value);
                }
                Err(err) => {
                    self.counters.record_decode_error();
                    warn!(%key, error = %CacheError::Decode(err), "discarding undecodable cache entry");
                }
            }
        }

        self.counters.record_miss();
        debug!(%key, "cache miss");

        let value = query_fn().await?;

        match serde_json::to_vec(&value) {
            Ok(bytes) => {
                if self.store.set(key.as_str(), &bytes, self.policy.ttl(class)).await {
                    self.counters.record_populate();
                }
            }
            Err(err) => warn!(%key, error = %CacheError::Encode(err), "result not cached"),
        }

        Ok(value)
    }

    /// Builds the key for `params` and fetches under the operation's TTL class.
    pub async fn fetch_query<T, E, F, Fut>(&self, entity: &str, params: &QueryParams, query_fn: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let key = KeyCodec::build_key(entity, params);
        self.fetch(&key, params.operation().ttl_class(), query_fn).await
    }

    pub fn policy(&self) -> &TtlPolicy {
        &self.policy
    }

    pub fn store(&self) -> &Arc<CacheStore> {
        &self.store
    }

    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot(self.store.failures())
    }
}
