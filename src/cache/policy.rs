//! TTL Policy Module
//!
//! Maps freshness classes to concrete time-to-live durations.

use std::time::Duration;

use serde::Serialize;

// == Default TTLs ==
/// Default TTL in seconds for listings and search results
pub const DEFAULT_VOLATILE_TTL: u64 = 300;

/// Default TTL in seconds for single-entity detail reads
pub const DEFAULT_SEMISTABLE_TTL: u64 = 600;

/// Default TTL in seconds for curated aggregates
pub const DEFAULT_CURATED_TTL: u64 = 900;

// == TTL Class ==
/// Freshness class of a cached query result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TtlClass {
    /// Paginated or sorted listings and search results
    Volatile,
    /// Single-entity detail reads
    Semistable,
    /// Editorially curated aggregates such as "featured"
    Curated,
}

// == TTL Policy ==
/// TTL table, fixed at start-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    pub volatile: Duration,
    pub semistable: Duration,
    pub curated: Duration,
}

impl TtlPolicy {
    /// Builds a policy from per-class TTLs in seconds.
    pub fn from_secs(volatile: u64, semistable: u64, curated: u64) -> Self {
        Self {
            volatile: Duration::from_secs(volatile),
            semistable: Duration::from_secs(semistable),
            curated: Duration::from_secs(curated),
        }
    }

    pub fn ttl(&self, class: TtlClass) -> Duration {
        match class {
            TtlClass::Volatile => self.volatile,
            TtlClass::Semistable => self.semistable,
            TtlClass::Curated => self.curated,
        }
    }
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self::from_secs(
            DEFAULT_VOLATILE_TTL,
            DEFAULT_SEMISTABLE_TTL,
            DEFAULT_CURATED_TTL,
        )
    }
}
