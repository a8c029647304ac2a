//! API Routes
//!
//! Configures the Axum router with the product and service endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    create_product, delete_product, featured_products, get_product, health_handler, list_products,
    search_products, stats_handler, update_product, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /api/products` - Paginated listing
/// - `POST /api/products` - Create a product
/// - `GET /api/products/featured` - Featured products
/// - `GET /api/products/search` - Search with filters
/// - `GET|PUT|DELETE /api/products/:id` - Single product
/// - `GET /cache/stats` - Cache counters
/// - `GET /health` - Health check
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/products", get(list_products).post(create_product))
        .route("/api/products/featured", get(featured_products))
        .route("/api/products/search", get(search_products))
        .route(
            "/api/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/cache/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
