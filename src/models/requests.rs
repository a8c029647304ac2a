//! Request DTOs for the product API
//!
//! Query strings arrive as raw strings so that malformed numbers fall back
//! to defaults instead of rejecting the request.

use serde::Deserialize;

use crate::params::{ListParams, SearchParams};

fn parse_count(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|v| v.trim().parse().ok())
}

fn parse_price(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|v| v.trim().parse().ok())
}

/// Query string of `GET /api/products`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub category: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl ListQuery {
    pub fn into_params(self) -> ListParams {
        ListParams::new(
            parse_count(self.page.as_deref()),
            parse_count(self.limit.as_deref()),
            self.category.as_deref(),
            self.sort_by.as_deref(),
            self.sort_order.as_deref(),
        )
    }
}

/// Query string of `GET /api/products/search`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl SearchQuery {
    pub fn into_params(self) -> SearchParams {
        SearchParams::new(
            self.q.as_deref(),
            self.category.as_deref(),
            parse_price(self.min_price.as_deref()),
            parse_price(self.max_price.as_deref()),
            self.sort_by.as_deref(),
            self.sort_order.as_deref(),
            parse_count(self.page.as_deref()),
            parse_count(self.limit.as_deref()),
        )
    }
}
