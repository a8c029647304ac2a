//! Invalidation Module
//!
//! Maps an entity mutation to the key families it may have made stale and
//! clears them before the write is acknowledged.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::{CacheKey, CacheStore, KeyCodec, Operation};

// == Mutation Kind ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

// == Invalidation Target ==
/// One unit of invalidation: a single key or a whole family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidationTarget {
    Key(CacheKey),
    Family(String),
}

impl fmt::Display for InvalidationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidationTarget::Key(key) => write!(f, "{}", key),
            InvalidationTarget::Family(prefix) => write!(f, "{}*", prefix),
        }
    }
}

// == Invalidation Report ==
/// Outcome of one `on_mutation` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvalidationReport {
    /// Targets issued to the cache
    pub attempted: usize,
    /// Targets the cache did not acknowledge; these may serve stale data until their TTL runs out
    pub failed: Vec<InvalidationTarget>,
}

impl InvalidationReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

// == Invalidation Coordinator ==
pub struct InvalidationCoordinator {
    store: Arc<CacheStore>,
}

impl InvalidationCoordinator {
    pub fn new(store: Arc<CacheStore>) -> Self {
        Self { store }
    }

    /// Everything a mutation of `entity_id` may have made stale.
    ///
    /// A new row can land in any listing at any sorted position, and an
    /// update can move a row in or out of any filter or aggregate, so every
    /// collection family is cleared on every kind. Creates have no detail
    /// entry to clear.
    pub fn targets(entity: &str, entity_id: &str, kind: MutationKind) -> Vec<InvalidationTarget> {
        let mut targets = Vec::with_capacity(Operation::COLLECTIONS.len() + 1);

        if matches!(kind, MutationKind::Update | MutationKind::Delete) {
            targets.push(InvalidationTarget::Key(KeyCodec::detail_key(entity, entity_id)));
        }

        targets.extend(
            Operation::COLLECTIONS
                .iter()
                .map(|op| InvalidationTarget::Family(KeyCodec::family_prefix(entity, *op))),
        );
        targets
    }

    // == On Mutation ==
    /// Clears every family affected by the mutation.
    ///
    /// Completes all deletes before returning. Never fails: targets the
    /// cache did not acknowledge are logged and reported, and the write
    /// itself stands.
    pub async fn on_mutation(&self, entity: &str, entity_id: &str, kind: MutationKind) -> InvalidationReport {
        let targets = Self::targets(entity, entity_id, kind);
        let mut report = InvalidationReport {
            attempted: targets.len(),
            failed: Vec::new(),
        };

        for target in targets {
            let acknowledged = match &target {
                InvalidationTarget::Key(key) => self.store.delete(key.as_str()).await,
                InvalidationTarget::Family(prefix) => self.store.delete_by_prefix(prefix).await,
            };
            if !acknowledged {
                report.failed.push(target);
            }
        }

        if report.is_complete() {
            debug!(entity, id = entity_id, ?kind, targets = report.attempted, "cache invalidated");
        } else {
            let failed: Vec<String> = report.failed.iter().map(ToString::to_string).collect();
            warn!(
                entity,
                id = entity_id,
                ?kind,
                failed = ?failed,
                "partial cache invalidation, stale entries expire with their TTL"
            );
        }

        report
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::cache::backend::testing::{FlakyBackend, SlowScanBackend};
    use crate::cache::{MemoryBackend, QueryCache, TtlClass, TtlPolicy, DEFAULT_OP_TIMEOUT, PRODUCTS};
    use crate::params::{ListParams, SearchParams};

    const TTL: Duration = Duration::from_secs(300);

    #[test]
    fn test_create_targets_collections_only() {
        let targets = InvalidationCoordinator::targets(PRODUCTS, "x", MutationKind::Create);
        assert_eq!(
            targets,
            vec![
                InvalidationTarget::Family("products:list:".to_string()),
                InvalidationTarget::Family("products:search:".to_string()),
                InvalidationTarget::Family("products:curated:".to_string()),
            ]
        );
    }

    #[test]
    fn test_update_and_delete_include_detail_key() {
        for kind in [MutationKind::Update, MutationKind::Delete] {
            let targets = InvalidationCoordinator::targets(PRODUCTS, "x", kind);
            assert_eq!(targets.len(), 4);
            assert_eq!(
                targets[0],
                InvalidationTarget::Key(KeyCodec::detail_key(PRODUCTS, "x"))
            );
        }
    }

    #[tokio::test]
    async fn test_update_clears_detail_and_every_family() {
        let backend = Arc::new(MemoryBackend::new(100));
        let store = Arc::new(CacheStore::new(backend.clone(), DEFAULT_OP_TIMEOUT));
        let coordinator = InvalidationCoordinator::new(store.clone());

        let detail = KeyCodec::detail_key(PRODUCTS, "x");
        let other_detail = KeyCodec::detail_key(PRODUCTS, "y");
        let list = KeyCodec::list_key(PRODUCTS, &ListParams::default().with_category("accessories"));
        let search = KeyCodec::search_key(PRODUCTS, &SearchParams::default().with_query("bottle"));
        let featured = KeyCodec::curated_key(PRODUCTS, "featured");
        for key in [&detail, &other_detail, &list, &search, &featured] {
            store.set(key.as_str(), b"cached", TTL).await;
        }

        let report = coordinator.on_mutation(PRODUCTS, "x", MutationKind::Update).await;
        assert!(report.is_complete());
        assert_eq!(report.attempted, 4);

        for key in [&detail, &list, &search, &featured] {
            assert_eq!(store.get(key.as_str()).await, None, "{} survived", key);
        }
        assert!(store.get(other_detail.as_str()).await.is_some());
    }

    #[tokio::test]
    async fn test_other_entity_types_are_untouched() {
        let backend = Arc::new(MemoryBackend::new(100));
        let store = Arc::new(CacheStore::new(backend, DEFAULT_OP_TIMEOUT));
        let coordinator = InvalidationCoordinator::new(store.clone());

        let reviews = KeyCodec::list_key("reviews", &ListParams::default());
        store.set(reviews.as_str(), b"cached", TTL).await;

        coordinator.on_mutation(PRODUCTS, "x", MutationKind::Create).await;
        assert!(store.get(reviews.as_str()).await.is_some());
    }

    #[tokio::test]
    async fn test_failed_invalidation_is_reported_not_raised() {
        let backend = Arc::new(FlakyBackend::new());
        backend.set_down(true);
        let store = Arc::new(CacheStore::new(backend, DEFAULT_OP_TIMEOUT));
        let coordinator = InvalidationCoordinator::new(store);

        let report = coordinator.on_mutation(PRODUCTS, "x", MutationKind::Delete).await;
        assert!(!report.is_complete());
        assert_eq!(report.attempted, 4);
        assert_eq!(report.failed.len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_family_scan_still_invalidates() {
        let backend = Arc::new(SlowScanBackend::new(20, Duration::from_millis(20)));
        let store = Arc::new(CacheStore::new(backend, DEFAULT_OP_TIMEOUT));
        let cache = QueryCache::new(store.clone(), TtlPolicy::default());
        let coordinator = InvalidationCoordinator::new(store);
        let key = KeyCodec::list_key(PRODUCTS, &ListParams::default());

        let first: Result<u32, String> = cache.fetch(&key, TtlClass::Volatile, || async { Ok(1) }).await;
        assert_eq!(first, Ok(1));

        let report = coordinator.on_mutation(PRODUCTS, "x", MutationKind::Create).await;
        assert!(report.is_complete(), "failed: {:?}", report.failed);

        let after: Result<u32, String> = cache.fetch(&key, TtlClass::Volatile, || async { Ok(2) }).await;
        assert_eq!(after, Ok(2));
    }

    #[test]
    fn test_target_display() {
        let family = InvalidationTarget::Family("products:list:".to_string());
        assert_eq!(family.to_string(), "products:list:*");
    }
}
