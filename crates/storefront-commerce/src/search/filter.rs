//! Product predicates derived from filter criteria.

use crate::catalog::{Catalog, Product};
use crate::ids::CategoryId;
use crate::money::Money;
use crate::search::FilterCriteria;

/// A single conjunctive filter over products.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Case-insensitive substring of name or description. Holds the
    /// lowercased needle.
    Text(String),
    /// Exact category match.
    Category(CategoryId),
    /// Inclusive price bounds; an absent bound is unconstrained.
    PriceRange {
        min: Option<Money>,
        max: Option<Money>,
    },
    /// `stock > 0`.
    InStock,
    /// Matches nothing. Produced for a sub-category id that does not resolve.
    Nothing,
}

impl Filter {
    /// Create a text filter.
    pub fn text(query: &str) -> Self {
        Filter::Text(query.to_lowercase())
    }

    /// Build the filter list for `criteria`, in evaluation order.
    ///
    /// Empty search text and absent bounds produce no filter at all.
    pub fn from_criteria(catalog: &Catalog, criteria: &FilterCriteria) -> Vec<Filter> {
        let mut filters = Vec::new();

        if !criteria.search_text.is_empty() {
            filters.push(Filter::text(&criteria.search_text));
        }

        if let Some(id) = &criteria.category_id {
            filters.push(Filter::Category(id.clone()));
        }

        if let Some(sub_id) = &criteria.sub_category_id {
            match catalog.resolve_sub_category(sub_id) {
                Some(category_id) => filters.push(Filter::Category(category_id.clone())),
                None => {
                    tracing::debug!(sub_category = %sub_id, "unknown sub-category, query matches nothing");
                    filters.push(Filter::Nothing);
                }
            }
        }

        if criteria.min_price.is_some() || criteria.max_price.is_some() {
            filters.push(Filter::PriceRange {
                min: criteria.min_price,
                max: criteria.max_price,
            });
        }

        if criteria.in_stock_only {
            filters.push(Filter::InStock);
        }

        filters
    }

    /// Check if `product` passes this filter.
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Filter::Text(needle) => {
                product.name.to_lowercase().contains(needle.as_str())
                    || product.description.to_lowercase().contains(needle.as_str())
            }
            Filter::Category(id) => &product.category_id == id,
            Filter::PriceRange { min, max } => {
                // A bound in another currency can't be compared, so it
                // excludes the product.
                let above_min = min.map_or(true, |min| {
                    product.price.cmp_amount(&min).is_some_and(|ord| ord.is_ge())
                });
                let below_max = max.map_or(true, |max| {
                    product.price.cmp_amount(&max).is_some_and(|ord| ord.is_le())
                });
                above_min && below_max
            }
            Filter::InStock => product.is_in_stock(),
            Filter::Nothing => false,
        }
    }

    /// Check if `product` passes every filter.
    pub fn matches_all(filters: &[Filter], product: &Product) -> bool {
        filters.iter().all(|f| f.matches(product))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SubCategory;
    use crate::money::Currency;

    fn xof(amount: i64) -> Money {
        Money::new(amount, Currency::XOF)
    }

    fn shirt() -> Product {
        Product::new("3", "T-shirt Premium", xof(25000), 50, "2")
            .with_description("Organic cotton, regular fit")
    }

    #[test]
    fn test_text_filter_is_case_insensitive() {
        assert!(Filter::text("SHIRT").matches(&shirt()));
        assert!(Filter::text("cotton").matches(&shirt()));
        assert!(!Filter::text("phone").matches(&shirt()));
    }

    #[test]
    fn test_price_range_is_inclusive() {
        let exact = Filter::PriceRange {
            min: Some(xof(25000)),
            max: Some(xof(25000)),
        };
        assert!(exact.matches(&shirt()));

        let above = Filter::PriceRange {
            min: Some(xof(25001)),
            max: None,
        };
        assert!(!above.matches(&shirt()));

        let foreign = Filter::PriceRange {
            min: Some(Money::new(1, Currency::EUR)),
            max: None,
        };
        assert!(!foreign.matches(&shirt()));
    }

    #[test]
    fn test_in_stock_filter() {
        let mut product = shirt();
        assert!(Filter::InStock.matches(&product));
        product.stock = 0;
        assert!(!Filter::InStock.matches(&product));
    }

    #[test]
    fn test_from_criteria_resolves_sub_category() {
        let catalog = Catalog::new(
            Currency::XOF,
            vec![shirt()],
            vec![],
            vec![SubCategory::new("21", "Shirts", "2")],
        )
        .unwrap();

        let filters = Filter::from_criteria(&catalog, &FilterCriteria::new().with_sub_category("21"));
        assert_eq!(filters, vec![Filter::Category(CategoryId::new("2"))]);

        let filters = Filter::from_criteria(&catalog, &FilterCriteria::new().with_sub_category("99"));
        assert_eq!(filters, vec![Filter::Nothing]);
    }

    #[test]
    fn test_from_criteria_unfiltered_is_empty() {
        let catalog = Catalog::empty(Currency::XOF);
        assert!(Filter::from_criteria(&catalog, &FilterCriteria::new()).is_empty());
    }
}
