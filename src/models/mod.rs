//! Request and Response models for the product API
//!
//! DTOs used for serializing/deserializing HTTP query strings and bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{ListQuery, SearchQuery};
pub use responses::{
    DeleteResponse, FeaturedResponse, HealthResponse, ProductListResponse, ProductResponse,
    SearchEcho, SearchResponse, StatsResponse,
};
