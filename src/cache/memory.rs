//! Memory Backend Module
//!
//! In-process cache backend: HashMap storage with LRU-bounded capacity and
//! TTL expiration. Expired entries are treated as absent on read and are
//! reclaimed by the cleanup task.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::cache::{CacheBackend, CacheEntry, LruTracker, MAX_KEY_LENGTH, MAX_VALUE_SIZE};
use crate::error::{CacheError, CacheResult};

#[derive(Debug, Default)]
struct MemoryState {
    entries: HashMap<String, CacheEntry>,
    lru: LruTracker,
    evictions: u64,
}

impl MemoryState {
    fn remove(&mut self, key: &str) -> bool {
        self.lru.remove(key);
        self.entries.remove(key).is_some()
    }
}

// == Memory Backend ==
/// In-memory key-value store with TTL and LRU eviction.
#[derive(Debug)]
pub struct MemoryBackend {
    state: RwLock<MemoryState>,
    max_entries: usize,
}

impl MemoryBackend {
    // == Constructor ==
    /// Creates a backend holding at most `max_entries` entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            state: RwLock::new(MemoryState::default()),
            max_entries: max_entries.max(1),
        }
    }

    // == Cleanup Expired ==
    /// Removes all expired entries. Returns the number removed.
    pub async fn cleanup_expired(&self) -> usize {
        let mut state = self.state.write().await;
        let now = Instant::now();
        let expired: Vec<String> = state
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            state.remove(key);
        }
        expired.len()
    }

    /// Number of stored entries, expired ones included until swept.
    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Entries evicted to stay within capacity.
    pub async fn evictions(&self) -> u64 {
        self.state.read().await.evictions
    }

    /// Remaining lifetime of `key`, if present and fresh.
    pub async fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        let state = self.state.read().await;
        state
            .entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(CacheEntry::ttl_remaining)
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    // == Get ==
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        // write lock: LRU touch and lazy removal of expired entries
        let mut state = self.state.write().await;

        let expired = match state.entries.get(key) {
            None => return Ok(None),
            Some(entry) => entry.is_expired(),
        };
        if expired {
            state.remove(key);
            return Ok(None);
        }

        state.lru.touch(key);
        Ok(state.entries.get(key).map(|entry| entry.value.clone()))
    }

    // == Set ==
    async fn set_ex(&self, key: &str, value: &[u8], ttl: Duration) -> CacheResult<()> {
        if key.is_empty() || key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::InvalidKey(format!(
                "key length must be between 1 and {} bytes",
                MAX_KEY_LENGTH
            )));
        }
        if value.len() > MAX_VALUE_SIZE {
            return Err(CacheError::PayloadTooLarge(value.len()));
        }

        let mut state = self.state.write().await;

        if !state.entries.contains_key(key) && state.entries.len() >= self.max_entries {
            if let Some(evicted) = state.lru.evict_oldest() {
                state.entries.remove(&evicted);
                state.evictions += 1;
            }
        }

        state
            .entries
            .insert(key.to_string(), CacheEntry::new(value.to_vec(), ttl));
        state.lru.touch(key);
        Ok(())
    }

    // == Delete ==
    async fn delete(&self, key: &str) -> CacheResult<bool> {
        Ok(self.state.write().await.remove(key))
    }

    // == Delete Prefix ==
    async fn delete_prefix(&self, prefix: &str) -> CacheResult<usize> {
        let mut state = self.state.write().await;
        if prefix.is_empty() {
            let count = state.entries.len();
            state.entries.clear();
            state.lru.clear();
            return Ok(count);
        }

        let matching: Vec<String> = state
            .entries
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect();

        for key in &matching {
            state.remove(key);
        }
        Ok(matching.len())
    }
}
