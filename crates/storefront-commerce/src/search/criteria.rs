//! Filter criteria for catalog queries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ids::{CategoryId, SubCategoryId};
use crate::money::Money;

/// Default number of products per page.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Sort options for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Keep catalog order.
    #[default]
    Default,
    /// Sort by price, low to high.
    PriceAsc,
    /// Sort by price, high to low.
    PriceDesc,
    /// Sort by name A-Z.
    NameAsc,
    /// Sort by name Z-A.
    NameDesc,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Default => "default",
            SortKey::PriceAsc => "price-asc",
            SortKey::PriceDesc => "price-desc",
            SortKey::NameAsc => "name-asc",
            SortKey::NameDesc => "name-desc",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortKey::Default => "Featured",
            SortKey::PriceAsc => "Price: Low to High",
            SortKey::PriceDesc => "Price: High to Low",
            SortKey::NameAsc => "Name: A-Z",
            SortKey::NameDesc => "Name: Z-A",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" | "" => Ok(SortKey::Default),
            "price-asc" | "price_asc" => Ok(SortKey::PriceAsc),
            "price-desc" | "price_desc" => Ok(SortKey::PriceDesc),
            "name-asc" | "name_asc" => Ok(SortKey::NameAsc),
            "name-desc" | "name_desc" => Ok(SortKey::NameDesc),
            other => Err(format!("unknown sort key: {other}")),
        }
    }
}

/// Which subset, ordering and page of the catalog to return.
///
/// All defaults are resolved here: empty search text, no category or price
/// constraints, catalog order, first page of [`DEFAULT_PAGE_SIZE`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    /// Case-insensitive substring matched against name and description.
    pub search_text: String,
    /// Exact category filter.
    pub category_id: Option<CategoryId>,
    /// Sub-category filter, resolved through its owning category.
    pub sub_category_id: Option<SubCategoryId>,
    /// Inclusive lower price bound.
    pub min_price: Option<Money>,
    /// Inclusive upper price bound.
    pub max_price: Option<Money>,
    /// Only products with `stock > 0`.
    pub in_stock_only: bool,
    /// Result ordering.
    pub sort: SortKey,
    /// Page number (1-indexed). Values below 1 are treated as 1.
    pub page: i64,
    /// Items per page. Values below 1 are treated as 1.
    pub page_size: i64,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            category_id: None,
            sub_category_id: None,
            min_price: None,
            max_price: None,
            in_stock_only: false,
            sort: SortKey::Default,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    pub fn with_category(mut self, id: impl Into<CategoryId>) -> Self {
        self.category_id = Some(id.into());
        self
    }

    pub fn with_sub_category(mut self, id: impl Into<SubCategoryId>) -> Self {
        self.sub_category_id = Some(id.into());
        self
    }

    pub fn with_price_range(mut self, min: Option<Money>, max: Option<Money>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn in_stock_only(mut self) -> Self {
        self.in_stock_only = true;
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_pagination(mut self, page: i64, page_size: i64) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    /// Page number after clamping.
    pub fn effective_page(&self) -> usize {
        clamp_positive(self.page)
    }

    /// Page size after clamping.
    pub fn effective_page_size(&self) -> usize {
        clamp_positive(self.page_size)
    }

    /// Index of the first item on the requested page.
    pub fn offset(&self) -> usize {
        (self.effective_page() - 1).saturating_mul(self.effective_page_size())
    }

    /// Check if the criteria constrain the result set at all.
    pub fn is_unfiltered(&self) -> bool {
        self.search_text.is_empty()
            && self.category_id.is_none()
            && self.sub_category_id.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
            && !self.in_stock_only
    }
}

fn clamp_positive(value: i64) -> usize {
    usize::try_from(value.max(1)).unwrap_or(usize::MAX)
}
