//! Product Cache - cache-aside layer for a product catalog API
//!
//! Deterministic cache keys, TTL classes per query shape, a cache front that
//! degrades to the authoritative store when the backend is down, and
//! mutation-driven invalidation of every affected key family.

pub mod api;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod params;
pub mod tasks;

pub use api::{create_router, AppState};
pub use config::Config;
pub use tasks::spawn_cleanup_task;
