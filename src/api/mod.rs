//! API Module
//!
//! HTTP handlers and routing for the product REST API.
//!
//! # Endpoints
//! - `GET /api/products` - Paginated product listing
//! - `GET /api/products/featured` - Featured products
//! - `GET /api/products/search` - Product search
//! - `GET /api/products/:id` - Single product
//! - `POST /api/products`, `PUT|DELETE /api/products/:id` - Writes
//! - `GET /cache/stats` - Cache counters
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
