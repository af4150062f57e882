//! Category and sub-category records.

use crate::ids::{CategoryId, SubCategoryId};
use serde::{Deserialize, Serialize};

/// A top-level product category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique category identifier.
    pub id: CategoryId,
    /// Category name.
    pub name: String,
    /// Sub-categories, in display order.
    #[serde(default)]
    pub sub_category_ids: Vec<SubCategoryId>,
    /// Icon or image URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Category {
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sub_category_ids: Vec::new(),
            icon: None,
        }
    }

    pub fn with_sub_category(mut self, id: impl Into<SubCategoryId>) -> Self {
        let id = id.into();
        if !self.sub_category_ids.contains(&id) {
            self.sub_category_ids.push(id);
        }
        self
    }

    pub fn has_sub_category(&self, id: &SubCategoryId) -> bool {
        self.sub_category_ids.contains(id)
    }
}

/// A sub-category.
///
/// Carries no product association of its own. Products belong to a
/// sub-category exactly when they belong to its owning category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubCategory {
    /// Unique sub-category identifier.
    pub id: SubCategoryId,
    /// Sub-category name.
    #[serde(default)]
    pub name: String,
    /// Owning category.
    pub category_id: CategoryId,
}

impl SubCategory {
    pub fn new(
        id: impl Into<SubCategoryId>,
        name: impl Into<String>,
        category_id: impl Into<CategoryId>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category_id: category_id.into(),
        }
    }
}
