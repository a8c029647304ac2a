//! Product documents and their write-side shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;

// == Category ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    WaterBottles,
    Accessories,
    GiftSets,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::WaterBottles => "water-bottles",
            Category::Accessories => "accessories",
            Category::GiftSets => "gift-sets",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Specifications {
    pub capacity: String,
    pub material: String,
    pub dimensions: String,
    pub weight: String,
    pub color: String,
}

// == Product ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    pub images: Vec<String>,
    pub category: Category,
    pub in_stock: bool,
    pub stock_quantity: u32,
    pub rating: f64,
    pub num_reviews: u32,
    pub features: Vec<String>,
    pub specifications: Specifications,
    pub is_featured: bool,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// == New Product ==
/// Fields supplied when creating a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub original_price: Option<f64>,
    #[serde(default)]
    pub images: Vec<String>,
    pub category: Category,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    pub stock_quantity: u32,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub num_reviews: u32,
    #[serde(default)]
    pub features: Vec<String>,
    pub specifications: Specifications,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_in_stock() -> bool {
    true
}

impl NewProduct {
    /// Checks the document rules. Returns a message describing the first violation.
    pub fn validate(&self) -> Option<String> {
        if self.name.trim().is_empty() {
            return Some("Product name is required".to_string());
        }
        if self.name.chars().count() > 100 {
            return Some("Product name cannot be more than 100 characters".to_string());
        }
        if self.description.trim().chars().count() < 10 {
            return Some("Description must be at least 10 characters".to_string());
        }
        if self.description.chars().count() > 1000 {
            return Some("Description cannot be more than 1000 characters".to_string());
        }
        validate_price(self.price, self.original_price)
            .or_else(|| validate_rating(self.rating))
    }

    /// Materializes the document with a fresh id and timestamps.
    pub fn into_product(self) -> Result<Product, StoreError> {
        if let Some(msg) = self.validate() {
            return Err(StoreError::Invalid(msg));
        }

        let now = Utc::now();
        Ok(Product {
            id: Uuid::new_v4(),
            name: self.name.trim().to_string(),
            description: self.description,
            price: self.price,
            original_price: self.original_price,
            images: self.images,
            category: self.category,
            in_stock: self.in_stock,
            stock_quantity: self.stock_quantity,
            rating: self.rating,
            num_reviews: self.num_reviews,
            features: self.features,
            specifications: self.specifications,
            is_featured: self.is_featured,
            tags: self.tags,
            created_at: now,
            updated_at: now,
        })
    }
}

// == Product Patch ==
/// Partial update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub original_price: Option<f64>,
    pub images: Option<Vec<String>>,
    pub category: Option<Category>,
    pub in_stock: Option<bool>,
    pub stock_quantity: Option<u32>,
    pub rating: Option<f64>,
    pub num_reviews: Option<u32>,
    pub features: Option<Vec<String>>,
    pub specifications: Option<Specifications>,
    pub is_featured: Option<bool>,
    pub tags: Option<Vec<String>>,
}

impl ProductPatch {
    /// Applies the patch, re-checking the document rules on the result.
    pub fn apply(self, product: &Product) -> Result<Product, StoreError> {
        let mut updated = product.clone();

        if let Some(name) = self.name {
            updated.name = name.trim().to_string();
        }
        if let Some(description) = self.description {
            updated.description = description;
        }
        if let Some(price) = self.price {
            updated.price = price;
        }
        if self.original_price.is_some() {
            updated.original_price = self.original_price;
        }
        if let Some(images) = self.images {
            updated.images = images;
        }
        if let Some(category) = self.category {
            updated.category = category;
        }
        if let Some(in_stock) = self.in_stock {
            updated.in_stock = in_stock;
        }
        if let Some(quantity) = self.stock_quantity {
            updated.stock_quantity = quantity;
        }
        if let Some(rating) = self.rating {
            updated.rating = rating;
        }
        if let Some(reviews) = self.num_reviews {
            updated.num_reviews = reviews;
        }
        if let Some(features) = self.features {
            updated.features = features;
        }
        if let Some(specifications) = self.specifications {
            updated.specifications = specifications;
        }
        if let Some(featured) = self.is_featured {
            updated.is_featured = featured;
        }
        if let Some(tags) = self.tags {
            updated.tags = tags;
        }

        if updated.name.is_empty() {
            return Err(StoreError::Invalid("Product name is required".to_string()));
        }
        if let Some(msg) = validate_price(updated.price, updated.original_price)
            .or_else(|| validate_rating(updated.rating))
        {
            return Err(StoreError::Invalid(msg));
        }

        updated.updated_at = Utc::now();
        Ok(updated)
    }
}

fn validate_price(price: f64, original_price: Option<f64>) -> Option<String> {
    if !price.is_finite() || price < 0.0 {
        return Some("Price cannot be negative".to_string());
    }
    match original_price {
        Some(original) if !original.is_finite() || original < 0.0 => {
            Some("Original price cannot be negative".to_string())
        }
        _ => None,
    }
}

fn validate_rating(rating: f64) -> Option<String> {
    if !(0.0..=5.0).contains(&rating) {
        return Some("Rating must be between 0 and 5".to_string());
    }
    None
}
