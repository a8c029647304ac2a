//! API Handlers
//!
//! Read handlers go through the query cache. Write handlers run the store
//! mutation, then invalidate, then respond.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::cache::{
    CacheStore, InvalidationCoordinator, MutationKind, QueryCache, QueryParams, TtlPolicy,
    FEATURED, PRODUCTS,
};
use crate::catalog::{NewProduct, ProductPatch, ProductStore};
use crate::error::{ApiError, Result};
use crate::models::{
    DeleteResponse, FeaturedResponse, HealthResponse, ListQuery, ProductListResponse,
    ProductResponse, SearchQuery, SearchResponse, StatsResponse,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Authoritative product store
    pub products: Arc<dyn ProductStore>,
    /// Read-through cache in front of `products`
    pub cache: Arc<QueryCache>,
    /// Clears cached views after writes
    pub invalidator: Arc<InvalidationCoordinator>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(products: Arc<dyn ProductStore>, store: Arc<CacheStore>, policy: TtlPolicy) -> Self {
        Self {
            products,
            cache: Arc::new(QueryCache::new(store.clone(), policy)),
            invalidator: Arc::new(InvalidationCoordinator::new(store)),
            started_at: Instant::now(),
        }
    }
}

/// Unparseable ids cannot name a stored product.
fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound("Product not found".to_string()))
}

/// Handler for GET /api/products
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ProductListResponse>> {
    let params = query.into_params();
    let products = state.products.clone();
    let key_params = QueryParams::List(params.clone());

    let response = state
        .cache
        .fetch_query(PRODUCTS, &key_params, move || async move {
            products
                .list(&params)
                .await
                .map(|page| ProductListResponse::new(page, &params.paging))
        })
        .await?;

    Ok(Json(response))
}

/// Handler for GET /api/products/:id
pub async fn get_product(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<ProductResponse>> {
    let id = parse_id(&raw_id)?;
    let products = state.products.clone();
    let key_params = QueryParams::Detail { id: id.to_string() };

    let response = state
        .cache
        .fetch_query(PRODUCTS, &key_params, move || async move {
            products.find_by_id(id).await.map(ProductResponse::new)
        })
        .await?;

    Ok(Json(response))
}

/// Handler for GET /api/products/featured
pub async fn featured_products(State(state): State<AppState>) -> Result<Json<FeaturedResponse>> {
    let products = state.products.clone();
    let key_params = QueryParams::Curated {
        name: FEATURED.to_string(),
    };

    let response = state
        .cache
        .fetch_query(PRODUCTS, &key_params, move || async move {
            products.featured().await.map(FeaturedResponse::new)
        })
        .await?;

    Ok(Json(response))
}

/// Handler for GET /api/products/search
pub async fn search_products(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>> {
    let params = query.into_params();
    let products = state.products.clone();
    let key_params = QueryParams::Search(params.clone());

    let response = state
        .cache
        .fetch_query(PRODUCTS, &key_params, move || async move {
            products
                .search(&params)
                .await
                .map(|page| SearchResponse::new(page, &params))
        })
        .await?;

    Ok(Json(response))
}

/// Handler for POST /api/products
pub async fn create_product(
    State(state): State<AppState>,
    Json(new_product): Json<NewProduct>,
) -> Result<(StatusCode, Json<ProductResponse>)> {
    if let Some(msg) = new_product.validate() {
        return Err(ApiError::InvalidRequest(msg));
    }

    let product = state.products.create(new_product).await?;
    state
        .invalidator
        .on_mutation(PRODUCTS, &product.id.to_string(), MutationKind::Create)
        .await;

    Ok((StatusCode::CREATED, Json(ProductResponse::new(product))))
}

/// Handler for PUT /api/products/:id
pub async fn update_product(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<ProductResponse>> {
    let id = parse_id(&raw_id)?;

    let product = state.products.update(id, patch).await?;
    state
        .invalidator
        .on_mutation(PRODUCTS, &id.to_string(), MutationKind::Update)
        .await;

    Ok(Json(ProductResponse::new(product)))
}

/// Handler for DELETE /api/products/:id
pub async fn delete_product(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let id = parse_id(&raw_id)?;

    state.products.delete(id).await?;
    state
        .invalidator
        .on_mutation(PRODUCTS, &id.to_string(), MutationKind::Delete)
        .await;

    Ok(Json(DeleteResponse::deleted()))
}

/// Handler for GET /cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::new(
        state.cache.store().backend_name(),
        state.cache.stats(),
    ))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(
        state.started_at.elapsed().as_secs(),
        state.cache.store().backend_name(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{KeyCodec, MemoryBackend, DEFAULT_OP_TIMEOUT};
    use crate::catalog::{sample_products, InMemoryProductStore};

    async fn test_state() -> AppState {
        let products = Arc::new(InMemoryProductStore::new());
        for product in sample_products() {
            products.create(product).await.unwrap();
        }
        let store = Arc::new(CacheStore::new(
            Arc::new(MemoryBackend::new(100)),
            DEFAULT_OP_TIMEOUT,
        ));
        AppState::new(products, store, TtlPolicy::default())
    }

    #[tokio::test]
    async fn test_list_is_served_from_cache_on_second_read() {
        let state = test_state().await;

        let first = list_products(State(state.clone()), Query(ListQuery::default()))
            .await
            .unwrap();
        let second = list_products(State(state.clone()), Query(ListQuery::default()))
            .await
            .unwrap();

        assert_eq!(first.0, second.0);
        let stats = state.cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
    }

    #[tokio::test]
    async fn test_get_product_with_malformed_id() {
        let state = test_state().await;

        let result = get_product(State(state), Path("not-a-uuid".to_string())).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_missing_product_is_not_cached() {
        let state = test_state().await;
        let id = Uuid::new_v4();

        let result = get_product(State(state.clone()), Path(id.to_string())).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));

        let key = KeyCodec::detail_key(PRODUCTS, &id.to_string());
        assert_eq!(state.cache.store().get(key.as_str()).await, None);
    }

    #[tokio::test]
    async fn test_update_invalidates_detail() {
        let state = test_state().await;
        let listing = list_products(State(state.clone()), Query(ListQuery::default()))
            .await
            .unwrap();
        let id = listing.0.data[0].id.to_string();

        get_product(State(state.clone()), Path(id.clone())).await.unwrap();

        let patch = ProductPatch {
            price: Some(1.5),
            ..ProductPatch::default()
        };
        update_product(State(state.clone()), Path(id.clone()), Json(patch))
            .await
            .unwrap();

        let fresh = get_product(State(state), Path(id)).await.unwrap();
        assert_eq!(fresh.0.data.price, 1.5);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_product() {
        let state = test_state().await;
        let mut product = sample_products().remove(0);
        product.description = "tiny".to_string();

        let result = create_product(State(state), Json(product)).await;
        assert!(matches!(result, Err(ApiError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_health_handler() {
        let state = test_state().await;
        let response = health_handler(State(state)).await;
        assert_eq!(response.status, "healthy");
        assert_eq!(response.cache_backend, "memory");
    }
}
