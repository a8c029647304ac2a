//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check key derivation and cache-aside behaviour over
//! generated inputs.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use proptest::prelude::*;

use crate::cache::{
    CacheStore, InvalidationCoordinator, KeyCodec, MemoryBackend, MutationKind, Operation,
    QueryCache, QueryParams, TtlClass, TtlPolicy, DEFAULT_OP_TIMEOUT, PRODUCTS,
};
use crate::params::{ListParams, SearchParams};

// == Strategies ==
/// Filter strings deliberately include the key delimiter, sentinel and escape characters
fn filter_strategy() -> impl Strategy<Value = Option<String>> {
    prop::option::of("[a-zA-Z0-9:~% -]{0,8}")
}

fn direction_strategy() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop_oneof![
        Just("asc".to_string()),
        Just("desc".to_string()),
        Just("DESC".to_string()),
        Just("".to_string()),
    ])
}

fn field_strategy() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop_oneof![
        Just("createdAt".to_string()),
        Just("price".to_string()),
        Just("rating".to_string()),
        Just(String::new()),
    ])
}

fn count_strategy() -> impl Strategy<Value = Option<u32>> {
    prop::option::of(0u32..150)
}

fn price_strategy() -> impl Strategy<Value = Option<f64>> {
    prop::option::of(prop_oneof![
        Just(0.0),
        Just(-0.0),
        Just(9.99),
        Just(10.0),
        Just(49.99),
        -1000.0f64..1000.0,
    ])
}

fn list_params_strategy() -> impl Strategy<Value = ListParams> {
    (
        count_strategy(),
        count_strategy(),
        filter_strategy(),
        field_strategy(),
        direction_strategy(),
    )
        .prop_map(|(page, limit, category, field, direction)| {
            ListParams::new(
                page,
                limit,
                category.as_deref(),
                field.as_deref(),
                direction.as_deref(),
            )
        })
}

fn search_params_strategy() -> impl Strategy<Value = SearchParams> {
    (
        filter_strategy(),
        filter_strategy(),
        price_strategy(),
        price_strategy(),
        field_strategy(),
        direction_strategy(),
        count_strategy(),
        count_strategy(),
    )
        .prop_map(|(q, category, min, max, field, direction, page, limit)| {
            SearchParams::new(
                q.as_deref(),
                category.as_deref(),
                min,
                max,
                field.as_deref(),
                direction.as_deref(),
                page,
                limit,
            )
        })
}

fn query_params_strategy() -> impl Strategy<Value = QueryParams> {
    prop_oneof![
        list_params_strategy().prop_map(QueryParams::List),
        search_params_strategy().prop_map(QueryParams::Search),
        "[a-zA-Z0-9:~%-]{1,12}".prop_map(|id| QueryParams::Detail { id }),
        "[a-z:~]{1,8}".prop_map(|name| QueryParams::Curated { name }),
    ]
}

fn memory_cache() -> (QueryCache, InvalidationCoordinator) {
    let backend = Arc::new(MemoryBackend::new(10_000));
    let store = Arc::new(CacheStore::new(backend, DEFAULT_OP_TIMEOUT));
    (
        QueryCache::new(store.clone(), TtlPolicy::default()),
        InvalidationCoordinator::new(store),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Identical normalized inputs always yield an identical key.
    #[test]
    fn prop_build_key_is_pure(params in query_params_strategy()) {
        let first = KeyCodec::build_key(PRODUCTS, &params);
        let second = KeyCodec::build_key(PRODUCTS, &params.clone());
        prop_assert_eq!(first, second);
    }

    // Two parameter sets map to the same key exactly when they are equal after normalization.
    #[test]
    fn prop_no_collisions_across_corpus(corpus in prop::collection::vec(query_params_strategy(), 1..60)) {
        let mut seen: HashMap<String, QueryParams> = HashMap::new();
        for params in corpus {
            let key = KeyCodec::build_key(PRODUCTS, &params).into_string();
            if let Some(previous) = seen.get(&key) {
                prop_assert_eq!(previous, &params, "collision on {}", key);
            } else {
                seen.insert(key, params);
            }
        }
    }

    // Every key starts with the prefix of its own family and no other.
    #[test]
    fn prop_key_belongs_to_exactly_one_family(params in query_params_strategy()) {
        let key = KeyCodec::build_key(PRODUCTS, &params);
        for op in [Operation::List, Operation::Detail, Operation::Search, Operation::Curated] {
            let prefix = KeyCodec::family_prefix(PRODUCTS, op);
            prop_assert_eq!(key.has_prefix(&prefix), op == params.operation());
        }
    }

    // After a populate, the next fetch returns the same value without running the query.
    #[test]
    fn prop_fetch_then_hit(params in query_params_strategy(), payload in prop::collection::vec(any::<i64>(), 0..20)) {
        let (cache, _) = memory_cache();
        let calls = AtomicUsize::new(0);
        let counter = &calls;

        let (first, second) = tokio_test::block_on(async {
            let first: Result<Vec<i64>, String> = cache
                .fetch_query(PRODUCTS, &params, move || {
                    let payload = payload.clone();
                    async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                        Ok(payload)
                    }
                })
                .await;
            let second: Result<Vec<i64>, String> = cache
                .fetch_query(PRODUCTS, &params, move || async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(Vec::new())
                })
                .await;
            (first, second)
        });

        prop_assert_eq!(first.unwrap(), second.unwrap());
        prop_assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    // After an update of any id, no collection view of the entity type survives.
    #[test]
    fn prop_update_invalidates_all_collections(
        views in prop::collection::vec(query_params_strategy(), 1..20),
        id in "[a-z0-9]{1,8}"
    ) {
        let (cache, coordinator) = memory_cache();
        let calls = AtomicUsize::new(0);
        let counter = &calls;

        tokio_test::block_on(async {
            for params in &views {
                let _: Result<u8, String> = cache.fetch_query(PRODUCTS, params, || async { Ok(1) }).await;
            }
            coordinator.on_mutation(PRODUCTS, &id, MutationKind::Update).await;

            for params in &views {
                let _: Result<u8, String> = cache
                    .fetch_query(PRODUCTS, params, move || async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                        Ok(2)
                    })
                    .await;
            }
        });

        // only details of other ids may still be served from cache
        let must_miss: HashSet<String> = views
            .iter()
            .filter(|p| match p {
                QueryParams::Detail { id: other } => other == &id,
                _ => true,
            })
            .map(|p| KeyCodec::build_key(PRODUCTS, p).into_string())
            .collect();
        prop_assert!(calls.load(Ordering::SeqCst) >= must_miss.len());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // TTL classes never change the value served, only its lifetime.
    #[test]
    fn prop_ttl_class_does_not_affect_value(value in any::<u32>()) {
        let (cache, _) = memory_cache();
        let key = KeyCodec::detail_key(PRODUCTS, "ttl");

        let served = tokio_test::block_on(async {
            for class in [TtlClass::Volatile, TtlClass::Semistable, TtlClass::Curated] {
                let _: Result<u32, String> = cache.fetch(&key, class, || async { Ok(value) }).await;
            }
            let out: Result<u32, String> = cache.fetch(&key, TtlClass::Volatile, || async { Ok(0) }).await;
            out
        });
        prop_assert_eq!(served.unwrap(), value);
    }
}
