//! Query Parameters Module
//!
//! Normalized parameter sets for product queries. Every constructor applies
//! the same canonicalization, so two requests that mean the same query end
//! up with equal values (and therefore equal cache keys).

use serde::{Deserialize, Serialize};

// == Public Constants ==
/// Page used when the caller gives none (or an invalid one)
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when the caller gives none (or an invalid one)
pub const DEFAULT_LIMIT: u32 = 10;

/// Largest page size a single query may request
pub const MAX_LIMIT: u32 = 100;

/// Default sort field for paginated listings
pub const DEFAULT_LIST_SORT: &str = "createdAt";

/// Default sort field for search results
pub const DEFAULT_SEARCH_SORT: &str = "rating";

// == Sort Direction ==
/// Ordering applied to the sort field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Parses a raw direction string.
    ///
    /// Absent means descending. Anything other than `desc` (any case)
    /// means ascending.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => SortDirection::Desc,
            Some(value) if value.eq_ignore_ascii_case("desc") => SortDirection::Desc,
            Some(_) => SortDirection::Asc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

// == Sort ==
/// Sort field plus direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Sort {
    /// Builds a sort spec, falling back to `default_field` when the field is blank.
    pub fn new(field: Option<&str>, direction: Option<&str>, default_field: &str) -> Self {
        let field = match field.map(str::trim) {
            Some(f) if !f.is_empty() => f.to_string(),
            _ => default_field.to_string(),
        };
        Self {
            field,
            direction: SortDirection::parse(direction),
        }
    }
}

// == Paging ==
/// Normalized page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Paging {
    pub page: u32,
    pub limit: u32,
}

impl Paging {
    /// Zero or missing values fall back to the defaults; the limit is capped.
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        let page = page.filter(|p| *p >= 1).unwrap_or(DEFAULT_PAGE);
        let limit = limit
            .filter(|l| *l >= 1)
            .unwrap_or(DEFAULT_LIMIT)
            .min(MAX_LIMIT);
        Self { page, limit }
    }

    /// Number of documents to skip before this page.
    pub fn offset(&self) -> usize {
        (self.page as usize - 1) * self.limit as usize
    }

    /// Total page count for `total` matching documents.
    pub fn pages(&self, total: usize) -> usize {
        total.div_ceil(self.limit as usize)
    }
}

impl Default for Paging {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Treats blank optional filters as absent.
pub fn normalize_filter(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| v.to_string())
}

/// Drops non-finite price bounds and folds `-0` into `0`.
fn normalize_price(value: Option<f64>) -> Option<f64> {
    value
        .filter(|v| v.is_finite())
        .map(|v| if v == 0.0 { 0.0 } else { v })
}

// == List Params ==
/// Parameters of a paginated, optionally filtered listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListParams {
    pub paging: Paging,
    pub category: Option<String>,
    pub sort: Sort,
}

impl ListParams {
    pub fn new(
        page: Option<u32>,
        limit: Option<u32>,
        category: Option<&str>,
        sort_field: Option<&str>,
        sort_direction: Option<&str>,
    ) -> Self {
        Self {
            paging: Paging::new(page, limit),
            category: normalize_filter(category),
            sort: Sort::new(sort_field, sort_direction, DEFAULT_LIST_SORT),
        }
    }

    /// Restricts the listing to one category.
    pub fn with_category(mut self, category: &str) -> Self {
        self.category = normalize_filter(Some(category));
        self
    }
}

impl Default for ListParams {
    fn default() -> Self {
        Self::new(None, None, None, None, None)
    }
}

// == Search Params ==
/// Parameters of a search with optional text, category and price range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub sort: Sort,
    pub paging: Paging,
}

impl SearchParams {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        query: Option<&str>,
        category: Option<&str>,
        min_price: Option<f64>,
        max_price: Option<f64>,
        sort_field: Option<&str>,
        sort_direction: Option<&str>,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Self {
        Self {
            query: normalize_filter(query),
            category: normalize_filter(category),
            min_price: normalize_price(min_price),
            max_price: normalize_price(max_price),
            sort: Sort::new(sort_field, sort_direction, DEFAULT_SEARCH_SORT),
            paging: Paging::new(page, limit),
        }
    }

    /// Sets the free-text part of the search.
    pub fn with_query(mut self, query: &str) -> Self {
        self.query = normalize_filter(Some(query));
        self
    }
}

impl Default for SearchParams {
    fn default() -> Self {
        Self::new(None, None, None, None, None, None, None, None)
    }
}
