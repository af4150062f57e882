//! The catalog query engine: filter, sort, paginate.
//!
//! Pure functions over a [`Catalog`]. The same catalog and criteria always
//! produce the same page.

use std::cmp::Ordering;

use crate::catalog::{Catalog, Product};
use crate::search::{Filter, FilterCriteria, Page, SortKey};

/// Run `criteria` against `catalog`.
///
/// Never fails: criteria that match nothing, or ask for a page past the end,
/// yield an empty page with the correct `total_matching`.
pub fn query(catalog: &Catalog, criteria: &FilterCriteria) -> Page<Product> {
    let page = criteria.effective_page();
    let page_size = criteria.effective_page_size();

    let mut matching = matching_products(catalog, criteria);
    sort_products(&mut matching, criteria.sort);

    let total_matching = matching.len();
    let items: Vec<Product> = matching
        .into_iter()
        .skip(criteria.offset())
        .take(page_size)
        .cloned()
        .collect();

    tracing::trace!(
        total_matching,
        returned = items.len(),
        page,
        page_size,
        sort = %criteria.sort,
        "catalog query"
    );

    Page::new(items, total_matching, page, page_size)
}

/// Count matches without building a page.
pub fn count(catalog: &Catalog, criteria: &FilterCriteria) -> usize {
    let filters = Filter::from_criteria(catalog, criteria);
    catalog
        .products()
        .iter()
        .filter(|p| Filter::matches_all(&filters, p))
        .count()
}

/// Products passing every filter, in catalog order.
pub fn matching_products<'a>(catalog: &'a Catalog, criteria: &FilterCriteria) -> Vec<&'a Product> {
    let filters = Filter::from_criteria(catalog, criteria);
    catalog
        .products()
        .iter()
        .filter(|p| Filter::matches_all(&filters, p))
        .collect()
}

/// Stable in-place sort. `SortKey::Default` leaves the order untouched.
pub fn sort_products(products: &mut [&Product], sort: SortKey) {
    match sort {
        SortKey::Default => {}
        SortKey::PriceAsc => products.sort_by(|a, b| a.price.amount.cmp(&b.price.amount)),
        SortKey::PriceDesc => products.sort_by(|a, b| b.price.amount.cmp(&a.price.amount)),
        SortKey::NameAsc => products.sort_by(|a, b| compare_names(&a.name, &b.name)),
        SortKey::NameDesc => products.sort_by(|a, b| compare_names(&b.name, &a.name)),
    }
}

/// Locale-style name ordering.
///
/// Letters compare without regard to case or Latin accents ("éclair" sorts
/// with "eclair", before "Fraise"). Names equal under folding fall back to
/// plain code-point order so the result is a total order.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

fn collation_key(s: &str) -> String {
    let mut key = String::with_capacity(s.len());
    for c in s.chars().flat_map(char::to_lowercase) {
        match fold_latin(c) {
            Some(folded) => key.push_str(folded),
            None => key.push(c),
        }
    }
    key
}

fn fold_latin(c: char) -> Option<&'static str> {
    let folded = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => "a",
        'æ' => "ae",
        'ç' => "c",
        'è' | 'é' | 'ê' | 'ë' => "e",
        'ì' | 'í' | 'î' | 'ï' => "i",
        'ñ' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => "o",
        'œ' => "oe",
        'ù' | 'ú' | 'û' | 'ü' => "u",
        'ý' | 'ÿ' => "y",
        'ß' => "ss",
        _ => return None,
    };
    Some(folded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, SubCategory};
    use crate::money::{Currency, Money};

    fn xof(amount: i64) -> Money {
        Money::new(amount, Currency::XOF)
    }

    fn scenario_catalog() -> Catalog {
        Catalog::new(
            Currency::XOF,
            vec![
                Product::new("1", "Smartphone XYZ", xof(67000), 15, "1"),
                Product::new("3", "T-shirt Premium", xof(25000), 50, "2"),
            ],
            vec![Category::new("1", "Electronics"), Category::new("2", "Fashion")],
            vec![],
        )
        .unwrap()
    }

    fn shop_catalog() -> Catalog {
        Catalog::new(
            Currency::XOF,
            vec![
                Product::new("1", "Smartphone XYZ", xof(67000), 15, "1")
                    .with_description("6.5 inch screen"),
                Product::new("2", "Laptop Pro", xof(450000), 0, "1"),
                Product::new("3", "T-shirt Premium", xof(25000), 50, "2"),
                Product::new("4", "écouteurs sans fil", xof(15000), 8, "1"),
                Product::new("5", "Jean Slim", xof(25000), 3, "2")
                    .with_description("Stretch denim, pairs with any shirt"),
                Product::new("6", "Casquette", xof(5000), 0, "2"),
            ],
            vec![
                Category::new("1", "Electronics").with_sub_category("11"),
                Category::new("2", "Fashion").with_sub_category("21"),
            ],
            vec![
                SubCategory::new("11", "Audio", "1"),
                SubCategory::new("21", "Shirts", "2"),
            ],
        )
        .unwrap()
    }

    fn ids(page: &Page<Product>) -> Vec<&str> {
        page.items.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_search_shirt_scenario() {
        let page = query(&scenario_catalog(), &FilterCriteria::new().with_search("shirt"));
        assert_eq!(ids(&page), vec!["3"]);
        assert_eq!(page.total_matching, 1);
    }

    #[test]
    fn test_search_matches_description() {
        let page = query(&shop_catalog(), &FilterCriteria::new().with_search("SHIRT"));
        assert_eq!(ids(&page), vec!["3", "5"]);
    }

    #[test]
    fn test_unfiltered_returns_whole_catalog() {
        let catalog = shop_catalog();
        let page = query(&catalog, &FilterCriteria::new());
        assert_eq!(page.total_matching, catalog.len());
        assert_eq!(ids(&page), vec!["1", "2", "3", "4", "5", "6"]);
    }

    #[test]
    fn test_category_filter() {
        let page = query(&shop_catalog(), &FilterCriteria::new().with_category("2"));
        assert_eq!(ids(&page), vec!["3", "5", "6"]);
    }

    #[test]
    fn test_sub_category_resolves_to_owning_category() {
        // "Shirts" lists every Fashion product, not only shirts.
        let page = query(&shop_catalog(), &FilterCriteria::new().with_sub_category("21"));
        assert_eq!(ids(&page), vec!["3", "5", "6"]);
    }

    #[test]
    fn test_unknown_sub_category_fails_closed() {
        let page = query(&shop_catalog(), &FilterCriteria::new().with_sub_category("404"));
        assert!(page.is_empty());
        assert_eq!(page.total_matching, 0);
    }

    #[test]
    fn test_category_and_sub_category_conflict_is_empty() {
        let criteria = FilterCriteria::new().with_category("1").with_sub_category("21");
        assert_eq!(query(&shop_catalog(), &criteria).total_matching, 0);
    }

    #[test]
    fn test_price_bounds_inclusive() {
        let criteria =
            FilterCriteria::new().with_price_range(Some(xof(15000)), Some(xof(67000)));
        let page = query(&shop_catalog(), &criteria);
        assert_eq!(ids(&page), vec!["1", "3", "4", "5"]);

        let only_max = FilterCriteria::new().with_price_range(None, Some(xof(15000)));
        assert_eq!(ids(&query(&shop_catalog(), &only_max)), vec!["4", "6"]);
    }

    #[test]
    fn test_in_stock_only() {
        let page = query(&shop_catalog(), &FilterCriteria::new().in_stock_only());
        assert_eq!(ids(&page), vec!["1", "3", "4", "5"]);
    }

    #[test]
    fn test_sort_price_is_stable_on_ties() {
        let asc = query(&shop_catalog(), &FilterCriteria::new().with_sort(SortKey::PriceAsc));
        assert_eq!(ids(&asc), vec!["6", "4", "3", "5", "1", "2"]);

        let desc = query(&shop_catalog(), &FilterCriteria::new().with_sort(SortKey::PriceDesc));
        assert_eq!(ids(&desc), vec!["2", "1", "3", "5", "4", "6"]);
    }

    #[test]
    fn test_sort_name_folds_case_and_accents() {
        let asc = query(&shop_catalog(), &FilterCriteria::new().with_sort(SortKey::NameAsc));
        assert_eq!(ids(&asc), vec!["6", "4", "5", "2", "1", "3"]);

        let desc = query(&shop_catalog(), &FilterCriteria::new().with_sort(SortKey::NameDesc));
        assert_eq!(ids(&desc), vec!["3", "1", "2", "5", "4", "6"]);
    }

    #[test]
    fn test_compare_names() {
        assert_eq!(compare_names("éclair", "Fraise"), Ordering::Less);
        assert_eq!(compare_names("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_names("Zèbre", "zebre"), Ordering::Less);
        assert_eq!(compare_names("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_pagination_slices() {
        let criteria = FilterCriteria::new().with_pagination(2, 4);
        let page = query(&shop_catalog(), &criteria);
        assert_eq!(ids(&page), vec!["5", "6"]);
        assert_eq!(page.total_matching, 6);
        assert_eq!(page.page, 2);
        assert_eq!(page.page_size, 4);
        assert!(!page.has_next());
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let page = query(&shop_catalog(), &FilterCriteria::new().with_pagination(9, 4));
        assert!(page.is_empty());
        assert_eq!(page.total_matching, 6);
    }

    #[test]
    fn test_invalid_pagination_clamps() {
        let page = query(&shop_catalog(), &FilterCriteria::new().with_pagination(0, 0));
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 1);
        assert_eq!(ids(&page), vec!["1"]);
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        let page = query(&shop_catalog(), &FilterCriteria::new().with_pagination(i64::MAX, i64::MAX));
        assert!(page.is_empty());
        assert_eq!(page.total_matching, 6);
    }

    #[test]
    fn test_count_matches_query_total() {
        let catalog = shop_catalog();
        let criteria = FilterCriteria::new().with_category("1").in_stock_only();
        assert_eq!(count(&catalog, &criteria), query(&catalog, &criteria).total_matching);
        assert_eq!(count(&catalog, &criteria), 2);
    }
}
