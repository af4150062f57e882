//! The read-only entity store queried by the search engine.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::{Category, Product, SubCategory};
use crate::error::CommerceError;
use crate::ids::{CategoryId, ProductId, SubCategoryId};
use crate::money::Currency;

/// On-disk shape of a catalog seed file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSeed {
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub sub_categories: Vec<SubCategory>,
}

/// Products, categories and sub-categories, fixed after construction.
///
/// Product order is the insertion order of the seed and is the order the
/// default sort preserves.
#[derive(Debug, Clone)]
pub struct Catalog {
    currency: Currency,
    products: Vec<Product>,
    categories: Vec<Category>,
    sub_categories: Vec<SubCategory>,
    product_index: HashMap<ProductId, usize>,
}

impl Catalog {
    /// Build a catalog, validating every record.
    ///
    /// Rejects duplicate ids, negative prices or stock, and prices in a
    /// currency other than `currency`. Dangling category references are
    /// allowed: they simply never match a category filter.
    pub fn new(
        currency: Currency,
        products: Vec<Product>,
        categories: Vec<Category>,
        sub_categories: Vec<SubCategory>,
    ) -> Result<Self, CommerceError> {
        let mut product_index = HashMap::with_capacity(products.len());
        for (position, product) in products.iter().enumerate() {
            product.validate().map_err(CommerceError::ValidationError)?;
            if product.price.currency != currency {
                return Err(CommerceError::CurrencyMismatch {
                    expected: currency.code().to_string(),
                    got: product.price.currency.code().to_string(),
                });
            }
            if product_index.insert(product.id.clone(), position).is_some() {
                return Err(CommerceError::DuplicateId {
                    kind: "product",
                    id: product.id.to_string(),
                });
            }
        }

        let mut seen = HashSet::new();
        for category in &categories {
            if !seen.insert(category.id.as_str()) {
                return Err(CommerceError::DuplicateId {
                    kind: "category",
                    id: category.id.to_string(),
                });
            }
        }

        let mut seen = HashSet::new();
        for sub in &sub_categories {
            if !seen.insert(sub.id.as_str()) {
                return Err(CommerceError::DuplicateId {
                    kind: "sub-category",
                    id: sub.id.to_string(),
                });
            }
        }

        Ok(Self {
            currency,
            products,
            categories,
            sub_categories,
            product_index,
        })
    }

    /// Create an empty catalog.
    pub fn empty(currency: Currency) -> Self {
        Self {
            currency,
            products: Vec::new(),
            categories: Vec::new(),
            sub_categories: Vec::new(),
            product_index: HashMap::new(),
        }
    }

    pub fn from_seed(seed: CatalogSeed) -> Result<Self, CommerceError> {
        Self::new(seed.currency, seed.products, seed.categories, seed.sub_categories)
    }

    /// Parse a JSON seed document.
    pub fn from_json_str(json: &str) -> Result<Self, CommerceError> {
        let seed: CatalogSeed = serde_json::from_str(json)?;
        Self::from_seed(seed)
    }

    /// Load a JSON seed file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CommerceError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| CommerceError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&content)
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// All products in store order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn sub_categories(&self) -> &[SubCategory] {
        &self.sub_categories
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.product_index
            .get(id)
            .and_then(|&position| self.products.get(position))
    }

    pub fn category(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| &c.id == id)
    }

    pub fn sub_category(&self, id: &SubCategoryId) -> Option<&SubCategory> {
        self.sub_categories.iter().find(|s| &s.id == id)
    }

    /// Sub-categories, optionally restricted to one owning category.
    pub fn sub_categories_of(&self, category_id: Option<&CategoryId>) -> Vec<&SubCategory> {
        self.sub_categories
            .iter()
            .filter(|s| category_id.map_or(true, |id| &s.category_id == id))
            .collect()
    }

    /// Resolve a sub-category to the category whose products it lists.
    pub fn resolve_sub_category(&self, id: &SubCategoryId) -> Option<&CategoryId> {
        self.sub_category(id).map(|s| &s.category_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn xof(amount: i64) -> Money {
        Money::new(amount, Currency::XOF)
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = Catalog::new(
            Currency::XOF,
            vec![
                Product::new("1", "Smartphone XYZ", xof(67000), 15, "1"),
                Product::new("3", "T-shirt Premium", xof(25000), 50, "2"),
            ],
            vec![Category::new("1", "Electronics"), Category::new("2", "Fashion")],
            vec![SubCategory::new("21", "Shirts", "2")],
        )
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.product(&"3".into()).unwrap().name, "T-shirt Premium");
        assert!(catalog.product(&"2".into()).is_none());
        assert_eq!(catalog.category(&"2".into()).unwrap().name, "Fashion");
        assert_eq!(
            catalog.resolve_sub_category(&"21".into()),
            Some(&CategoryId::new("2"))
        );
        assert!(catalog.resolve_sub_category(&"99".into()).is_none());
    }

    #[test]
    fn test_catalog_rejects_duplicate_products() {
        let result = Catalog::new(
            Currency::XOF,
            vec![
                Product::new("1", "A", xof(1), 1, "1"),
                Product::new("1", "B", xof(2), 1, "1"),
            ],
            vec![],
            vec![],
        );
        assert!(matches!(result, Err(CommerceError::DuplicateId { kind: "product", .. })));
    }

    #[test]
    fn test_catalog_rejects_negative_stock() {
        let result = Catalog::new(
            Currency::XOF,
            vec![Product::new("1", "A", xof(1), -1, "1")],
            vec![],
            vec![],
        );
        assert!(matches!(result, Err(CommerceError::ValidationError(_))));
    }

    #[test]
    fn test_catalog_rejects_foreign_currency() {
        let result = Catalog::new(
            Currency::XOF,
            vec![Product::new("1", "A", Money::new(1, Currency::EUR), 1, "1")],
            vec![],
            vec![],
        );
        assert!(matches!(result, Err(CommerceError::CurrencyMismatch { .. })));
    }

    #[test]
    fn test_sub_categories_of() {
        let catalog = Catalog::new(
            Currency::XOF,
            vec![],
            vec![],
            vec![
                SubCategory::new("11", "Phones", "1"),
                SubCategory::new("12", "Laptops", "1"),
                SubCategory::new("21", "Shirts", "2"),
            ],
        )
        .unwrap();

        assert_eq!(catalog.sub_categories_of(None).len(), 3);
        let electronics = catalog.sub_categories_of(Some(&"1".into()));
        assert_eq!(electronics.len(), 2);
        assert_eq!(electronics[1].id.as_str(), "12");
    }

    #[test]
    fn test_catalog_from_json() {
        let json = r#"{
            "currency": "XOF",
            "products": [
                {"id": "1", "name": "Smartphone XYZ", "price": {"amount": 67000, "currency": "XOF"}, "stock": 15, "categoryId": "1"}
            ],
            "categories": [{"id": "1", "name": "Electronics", "subCategoryIds": ["11"]}],
            "subCategories": [{"id": "11", "name": "Phones", "categoryId": "1"}]
        }"#;
        let catalog = Catalog::from_json_str(json).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.categories()[0].sub_category_ids.len(), 1);
    }

    #[test]
    fn test_catalog_from_bad_json() {
        assert!(matches!(
            Catalog::from_json_str("{not json"),
            Err(CommerceError::SerializationError(_))
        ));
    }
}
