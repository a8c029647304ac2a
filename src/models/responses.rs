//! Response DTOs for the product API
//!
//! Read responses derive `Deserialize` as well: they are what the cache stores.

use serde::{Deserialize, Serialize};

use crate::cache::CacheStats;
use crate::catalog::{Product, ProductPage};
use crate::params::{Paging, SearchParams};

/// Body of `GET /api/products`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductListResponse {
    pub success: bool,
    pub count: usize,
    pub total: usize,
    pub page: u32,
    pub pages: usize,
    pub data: Vec<Product>,
}

impl ProductListResponse {
    pub fn new(page: ProductPage, paging: &Paging) -> Self {
        Self {
            success: true,
            count: page.products.len(),
            total: page.total,
            page: paging.page,
            pages: paging.pages(page.total),
            data: page.products,
        }
    }
}

/// Body of single-product responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductResponse {
    pub success: bool,
    pub data: Product,
}

impl ProductResponse {
    pub fn new(product: Product) -> Self {
        Self {
            success: true,
            data: product,
        }
    }
}

/// Body of `GET /api/products/featured`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturedResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<Product>,
}

impl FeaturedResponse {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            success: true,
            count: products.len(),
            data: products,
        }
    }
}

/// Search filters echoed back to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEcho {
    pub q: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

/// Body of `GET /api/products/search`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    pub count: usize,
    pub total: usize,
    pub page: u32,
    pub pages: usize,
    pub query: SearchEcho,
    pub data: Vec<Product>,
}

impl SearchResponse {
    pub fn new(page: ProductPage, params: &SearchParams) -> Self {
        Self {
            success: true,
            count: page.products.len(),
            total: page.total,
            page: params.paging.page,
            pages: params.paging.pages(page.total),
            query: SearchEcho {
                q: params.query.clone(),
                category: params.category.clone(),
                min_price: params.min_price,
                max_price: params.max_price,
            },
            data: page.products,
        }
    }
}

/// Body of `DELETE /api/products/:id`
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

impl DeleteResponse {
    pub fn deleted() -> Self {
        Self {
            success: true,
            message: "Product deleted successfully".to_string(),
        }
    }
}

/// Body of `GET /health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub uptime_secs: u64,
    pub cache_backend: String,
}

impl HealthResponse {
    pub fn healthy(uptime_secs: u64, cache_backend: &str) -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            uptime_secs,
            cache_backend: cache_backend.to_string(),
        }
    }
}

/// Body of `GET /cache/stats`
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub backend: String,
    pub hits: u64,
    pub misses: u64,
    pub decode_errors: u64,
    pub populates: u64,
    pub backend_failures: u64,
    pub hit_rate: f64,
}

impl StatsResponse {
    pub fn new(backend: &str, stats: CacheStats) -> Self {
        Self {
            backend: backend.to_string(),
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            decode_errors: stats.decode_errors,
            populates: stats.populates,
            backend_failures: stats.backend_failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_response_page_count() {
        let page = ProductPage {
            products: vec![],
            total: 21,
        };
        let resp = ProductListResponse::new(page, &Paging::new(Some(3), Some(10)));
        assert_eq!(resp.pages, 3);
        assert_eq!(resp.page, 3);
        assert_eq!(resp.count, 0);
    }

    #[test]
    fn test_search_response_echoes_filters() {
        let params = SearchParams::new(Some("steel"), None, Some(5.0), None, None, None, None, None);
        let resp = SearchResponse::new(ProductPage { products: vec![], total: 0 }, &params);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["query"]["q"], "steel");
        assert_eq!(json["query"]["minPrice"], 5.0);
        assert_eq!(json["pages"], 0);
    }

    #[test]
    fn test_stats_response_hit_rate() {
        let stats = CacheStats {
            hits: 8,
            misses: 2,
            ..CacheStats::default()
        };
        let resp = StatsResponse::new("memory", stats);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
    }

    #[test]
    fn test_health_response_serialize() {
        let json = serde_json::to_string(&HealthResponse::healthy(5, "redis")).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("redis"));
    }
}
