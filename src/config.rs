//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use redis::{ConnectionAddr, ConnectionInfo, RedisConnectionInfo};

use crate::cache::TtlPolicy;

/// Which cache backend the store front talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackendKind {
    Memory,
    Redis,
}

impl FromStr for CacheBackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(CacheBackendKind::Memory),
            "redis" => Ok(CacheBackendKind::Redis),
            other => Err(format!("unknown cache backend '{}'", other)),
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Cache backend selection
    pub cache_backend: CacheBackendKind,
    pub redis_host: String,
    pub redis_port: u16,
    pub redis_password: Option<String>,
    /// Capacity of the memory backend
    pub max_entries: usize,
    /// Upper bound on a single cache call, in milliseconds
    pub op_timeout_ms: u64,
    /// Upper bound on clearing one key family, in milliseconds
    pub prefix_timeout_ms: u64,
    /// Memory backend sweep interval in seconds
    pub cleanup_interval: u64,
    pub ttl_volatile_secs: u64,
    pub ttl_semistable_secs: u64,
    pub ttl_curated_secs: u64,
    /// Load the sample catalog at start-up
    pub seed_catalog: bool,
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 5000)
    /// - `CACHE_BACKEND` - `memory` or `redis` (default: memory)
    /// - `REDIS_HOST` / `REDIS_PORT` / `REDIS_PASSWORD` (default: localhost / 6379 / none)
    /// - `CACHE_MAX_ENTRIES` - Memory backend capacity (default: 10000)
    /// - `CACHE_OP_TIMEOUT_MS` - Per-call cache timeout (default: 250)
    /// - `CACHE_PREFIX_TIMEOUT_MS` - Whole-family delete timeout (default: 5000)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 1)
    /// - `TTL_VOLATILE_SECS` / `TTL_SEMISTABLE_SECS` / `TTL_CURATED_SECS` (default: 300 / 600 / 900)
    /// - `SEED_CATALOG` - Load sample products (default: true)
    ///
    /// Unparseable values fall back to their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cache_backend: env_or("CACHE_BACKEND", defaults.cache_backend),
            redis_host: env_or("REDIS_HOST", defaults.redis_host),
            redis_port: env_or("REDIS_PORT", defaults.redis_port),
            redis_password: env::var("REDIS_PASSWORD").ok().filter(|p| !p.is_empty()),
            max_entries: env_or("CACHE_MAX_ENTRIES", defaults.max_entries),
            op_timeout_ms: env_or("CACHE_OP_TIMEOUT_MS", defaults.op_timeout_ms),
            prefix_timeout_ms: env_or("CACHE_PREFIX_TIMEOUT_MS", defaults.prefix_timeout_ms),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
            ttl_volatile_secs: env_or("TTL_VOLATILE_SECS", defaults.ttl_volatile_secs),
            ttl_semistable_secs: env_or("TTL_SEMISTABLE_SECS", defaults.ttl_semistable_secs),
            ttl_curated_secs: env_or("TTL_CURATED_SECS", defaults.ttl_curated_secs),
            seed_catalog: env_or("SEED_CATALOG", defaults.seed_catalog),
        }
    }

    /// Redis connection settings. The password is passed as a field, never
    /// spliced into a URL, so it may contain any character.
    pub fn redis_connection_info(&self) -> ConnectionInfo {
        ConnectionInfo {
            addr: ConnectionAddr::Tcp(self.redis_host.clone(), self.redis_port),
            redis: RedisConnectionInfo {
                password: self.redis_password.clone(),
                ..RedisConnectionInfo::default()
            },
        }
    }

    pub fn op_timeout(&self) -> Duration {
        Duration::from_millis(self.op_timeout_ms)
    }

    pub fn prefix_timeout(&self) -> Duration {
        Duration::from_millis(self.prefix_timeout_ms)
    }

    pub fn ttl_policy(&self) -> TtlPolicy {
        TtlPolicy::from_secs(
            self.ttl_volatile_secs,
            self.ttl_semistable_secs,
            self.ttl_curated_secs,
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 5000,
            cache_backend: CacheBackendKind::Memory,
            redis_host: "localhost".to_string(),
            redis_port: 6379,
            redis_password: None,
            max_entries: 10_000,
            op_timeout_ms: 250,
            prefix_timeout_ms: 5000,
            cleanup_interval: 1,
            ttl_volatile_secs: 300,
            ttl_semistable_secs: 600,
            ttl_curated_secs: 900,
            seed_catalog: true,
        }
    }
}
