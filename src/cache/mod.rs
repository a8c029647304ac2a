//! Cache Module
//!
//! Cache-aside layer between query handlers and the product store:
//! key derivation, TTL policy, the resilient store front, read-through
//! fetching and mutation-driven invalidation.

mod backend;
mod entry;
mod invalidation;
mod keys;
mod lru;
mod memory;
mod policy;
mod query;
mod remote;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use backend::CacheBackend;
pub use entry::CacheEntry;
pub use invalidation::{InvalidationCoordinator, InvalidationReport, InvalidationTarget, MutationKind};
pub use keys::{CacheKey, KeyCodec, Operation, QueryParams, FEATURED, PRODUCTS};
pub use lru::LruTracker;
pub use memory::MemoryBackend;
pub use policy::{TtlClass, TtlPolicy};
pub use query::QueryCache;
pub use remote::RedisBackend;
pub use stats::{CacheStats, QueryCounters};
pub use store::{CacheStore, DEFAULT_OP_TIMEOUT, DEFAULT_PREFIX_TIMEOUT};

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 1024;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB
