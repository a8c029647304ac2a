//! Cache Key Module
//!
//! Derives deterministic cache keys from normalized query parameters.
//!
//! Layout: `<entity>:<operation>:<field>:<field>...`, fields in a fixed
//! per-operation order. Field values are escaped so that neither the `:`
//! delimiter nor the `~` absent-sentinel can appear inside a value, which
//! makes every key family a clean string prefix.

use std::borrow::Cow;
use std::fmt;

use crate::cache::TtlClass;
use crate::params::{ListParams, Paging, SearchParams, Sort};

// == Key Syntax ==
const DELIMITER: char = ':';
const ABSENT: &str = "~";

/// Entity type under which all product keys live.
pub const PRODUCTS: &str = "products";

/// Name of the curated "featured products" aggregate.
pub const FEATURED: &str = "featured";

// == Operation ==
/// Kind of query a key belongs to. Each operation is one key family per entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Detail,
    Search,
    Curated,
}

impl Operation {
    /// Families whose contents may change whenever any entity of the type changes.
    pub const COLLECTIONS: [Operation; 3] = [Operation::List, Operation::Search, Operation::Curated];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::Detail => "detail",
            Operation::Search => "search",
            Operation::Curated => "curated",
        }
    }

    /// Static freshness policy for this operation.
    pub fn ttl_class(&self) -> TtlClass {
        match self {
            Operation::List | Operation::Search => TtlClass::Volatile,
            Operation::Detail => TtlClass::Semistable,
            Operation::Curated => TtlClass::Curated,
        }
    }
}

// == Query Params ==
/// Parameters of one logical query, tagged by operation.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryParams {
    List(ListParams),
    Detail { id: String },
    Search(SearchParams),
    Curated { name: String },
}

impl QueryParams {
    pub fn operation(&self) -> Operation {
        match self {
            QueryParams::List(_) => Operation::List,
            QueryParams::Detail { .. } => Operation::Detail,
            QueryParams::Search(_) => Operation::Search,
            QueryParams::Curated { .. } => Operation::Curated,
        }
    }
}

// == Cache Key ==
/// An opaque, fully-qualified cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Whether this key belongs to the family rooted at `prefix`.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// == Key Codec ==
/// Builds cache keys and family prefixes.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyCodec;

impl KeyCodec {
    /// Builds the key for a query against `entity`.
    pub fn build_key(entity: &str, params: &QueryParams) -> CacheKey {
        let mut key = Self::family_prefix(entity, params.operation());

        match params {
            QueryParams::List(list) => {
                push_paging(&mut key, &list.paging);
                push_field(&mut key, list.category.as_deref());
                push_sort(&mut key, &list.sort);
            }
            QueryParams::Detail { id } => push_field(&mut key, Some(id)),
            QueryParams::Search(search) => {
                push_field(&mut key, search.query.as_deref());
                push_field(&mut key, search.category.as_deref());
                push_field(&mut key, search.min_price.map(canonical_f64).as_deref());
                push_field(&mut key, search.max_price.map(canonical_f64).as_deref());
                push_sort(&mut key, &search.sort);
                push_paging(&mut key, &search.paging);
            }
            QueryParams::Curated { name } => push_field(&mut key, Some(name)),
        }

        // every field pushed a trailing delimiter
        key.pop();
        CacheKey(key)
    }

    /// Prefix shared by every key of `operation` on `entity`, whatever the parameters.
    pub fn family_prefix(entity: &str, operation: Operation) -> String {
        let mut prefix = String::with_capacity(entity.len() + 16);
        prefix.push_str(&escape(entity));
        prefix.push(DELIMITER);
        prefix.push_str(operation.as_str());
        prefix.push(DELIMITER);
        prefix
    }

    /// Key of a single-entity lookup.
    pub fn detail_key(entity: &str, id: &str) -> CacheKey {
        Self::build_key(entity, &QueryParams::Detail { id: id.to_string() })
    }

    pub fn list_key(entity: &str, params: &ListParams) -> CacheKey {
        Self::build_key(entity, &QueryParams::List(params.clone()))
    }

    pub fn search_key(entity: &str, params: &SearchParams) -> CacheKey {
        Self::build_key(entity, &QueryParams::Search(params.clone()))
    }

    pub fn curated_key(entity: &str, name: &str) -> CacheKey {
        Self::build_key(entity, &QueryParams::Curated { name: name.to_string() })
    }
}

fn push_field(key: &mut String, value: Option<&str>) {
    match value {
        Some(v) => key.push_str(&escape(v)),
        None => key.push_str(ABSENT),
    }
    key.push(DELIMITER);
}

fn push_paging(key: &mut String, paging: &Paging) {
    push_field(key, Some(&paging.page.to_string()));
    push_field(key, Some(&paging.limit.to_string()));
}

fn push_sort(key: &mut String, sort: &Sort) {
    push_field(key, Some(&sort.field));
    push_field(key, Some(sort.direction.as_str()));
}

/// Shortest round-trip decimal, with `-0` folded into `0`.
fn canonical_f64(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}

/// Percent-escapes the characters that carry meaning in the key syntax.
fn escape(value: &str) -> Cow<'_, str> {
    if !value.contains(['%', ':', '~']) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '%' => escaped.push_str("%25"),
            ':' => escaped.push_str("%3A"),
            '~' => escaped.push_str("%7E"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}
