//! Cache Statistics Module
//!
//! Hit/miss accounting for the query cache.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

// == Cache Stats ==
/// Point-in-time snapshot of cache counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Reads answered from the cache
    pub hits: u64,
    /// Reads that fell through to the underlying store
    pub misses: u64,
    /// Cached payloads that could not be decoded (counted as misses too)
    pub decode_errors: u64,
    /// Successful cache populations
    pub populates: u64,
    /// Backend calls that failed or timed out
    pub backend_failures: u64,
}

impl CacheStats {
    /// hits / (hits + misses), or 0.0 before any read.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Counters ==
/// Lock-free counters shared by concurrent fetches.
#[derive(Debug, Default)]
pub struct QueryCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    decode_errors: AtomicU64,
    populates: AtomicU64,
}

impl QueryCounters {
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_decode_error(&self) {
        self.decode_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_populate(&self) {
        self.populates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self, backend_failures: u64) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            decode_errors: self.decode_errors.load(Ordering::Relaxed),
            populates: self.populates.load(Ordering::Relaxed),
            backend_failures,
        }
    }
}
