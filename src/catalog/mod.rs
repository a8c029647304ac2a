//! Catalog Module
//!
//! The authoritative product store that the cache sits in front of.

mod product;
mod seed;
mod store;

pub use product::{Category, NewProduct, Product, ProductPatch, Specifications};
pub use seed::sample_products;
pub use store::{InMemoryProductStore, ProductPage, ProductStore, FEATURED_LIMIT};
