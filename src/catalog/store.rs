//! Product Store Module
//!
//! The authoritative document store behind the cache, and an in-memory
//! implementation of it.

use std::cmp::Ordering;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::catalog::{NewProduct, Product, ProductPatch};
use crate::error::StoreError;
use crate::params::{ListParams, Paging, SearchParams, Sort, SortDirection};

/// Upper bound on the featured aggregate
pub const FEATURED_LIMIT: usize = 8;

// == Product Page ==
/// One page of matching products plus the total match count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total: usize,
}

// == Product Store ==
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Product, StoreError>;

    async fn list(&self, params: &ListParams) -> Result<ProductPage, StoreError>;

    async fn search(&self, params: &SearchParams) -> Result<ProductPage, StoreError>;

    /// In-stock featured products, best rated first.
    async fn featured(&self) -> Result<Vec<Product>, StoreError>;

    async fn create(&self, product: NewProduct) -> Result<Product, StoreError>;

    async fn update(&self, id: Uuid, patch: ProductPatch) -> Result<Product, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<Product, StoreError>;
}

// == In-Memory Store ==
/// Products kept in insertion order behind a read-write lock.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    products: RwLock<Vec<Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn compare_by(field: &str, a: &Product, b: &Product) -> Ordering {
    match field {
        "createdAt" => a.created_at.cmp(&b.created_at),
        "updatedAt" => a.updated_at.cmp(&b.updated_at),
        "price" => a.price.total_cmp(&b.price),
        "rating" => a.rating.total_cmp(&b.rating),
        "name" => a.name.cmp(&b.name),
        "numReviews" => a.num_reviews.cmp(&b.num_reviews),
        "stockQuantity" => a.stock_quantity.cmp(&b.stock_quantity),
        // unknown fields leave insertion order untouched
        _ => Ordering::Equal,
    }
}

fn sort_products(products: &mut [Product], sort: &Sort) {
    products.sort_by(|a, b| {
        let ordering = compare_by(&sort.field, a, b);
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

fn paginate(mut matching: Vec<Product>, sort: &Sort, paging: &Paging) -> ProductPage {
    sort_products(&mut matching, sort);
    let total = matching.len();
    let products = matching
        .into_iter()
        .skip(paging.offset())
        .take(paging.limit as usize)
        .collect();
    ProductPage { products, total }
}

/// Any whitespace-separated term found in the name or description.
fn matches_text(product: &Product, query: &str) -> bool {
    let name = product.name.to_lowercase();
    let description = product.description.to_lowercase();
    query
        .split_whitespace()
        .map(str::to_lowercase)
        .any(|term| name.contains(&term) || description.contains(&term))
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Product, StoreError> {
        self.products
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn list(&self, params: &ListParams) -> Result<ProductPage, StoreError> {
        let products = self.products.read().await;
        let matching: Vec<Product> = products
            .iter()
            .filter(|p| {
                params
                    .category
                    .as_deref()
                    .map_or(true, |c| p.category.as_str() == c)
            })
            .cloned()
            .collect();
        Ok(paginate(matching, &params.sort, &params.paging))
    }

    async fn search(&self, params: &SearchParams) -> Result<ProductPage, StoreError> {
        let products = self.products.read().await;
        let matching: Vec<Product> = products
            .iter()
            .filter(|p| p.in_stock)
            .filter(|p| params.query.as_deref().map_or(true, |q| matches_text(p, q)))
            .filter(|p| {
                params
                    .category
                    .as_deref()
                    .map_or(true, |c| p.category.as_str() == c)
            })
            .filter(|p| params.min_price.map_or(true, |min| p.price >= min))
            .filter(|p| params.max_price.map_or(true, |max| p.price <= max))
            .cloned()
            .collect();
        Ok(paginate(matching, &params.sort, &params.paging))
    }

    async fn featured(&self) -> Result<Vec<Product>, StoreError> {
        let products = self.products.read().await;
        let mut featured: Vec<Product> = products
            .iter()
            .filter(|p| p.is_featured && p.in_stock)
            .cloned()
            .collect();
        featured.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        featured.truncate(FEATURED_LIMIT);
        Ok(featured)
    }

    async fn create(&self, product: NewProduct) -> Result<Product, StoreError> {
        let product = product.into_product()?;
        self.products.write().await.push(product.clone());
        Ok(product)
    }

    async fn update(&self, id: Uuid, patch: ProductPatch) -> Result<Product, StoreError> {
        let mut products = self.products.write().await;
        let slot = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let updated = patch.apply(slot)?;
        *slot = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<Product, StoreError> {
        let mut products = self.products.write().await;
        let index = products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        Ok(products.remove(index))
    }
}
