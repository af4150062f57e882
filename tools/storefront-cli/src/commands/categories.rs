//! Category listing command.

use anyhow::{bail, Result};
use serde::Serialize;
use storefront_commerce::catalog::{Catalog, Category, SubCategory};
use storefront_commerce::ids::CategoryId;
use storefront_commerce::search::{self, FilterCriteria};

use super::CategoriesArgs;
use crate::context::Context;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CategoryListing {
    #[serde(flatten)]
    category: Category,
    sub_categories: Vec<SubCategory>,
    product_count: usize,
}

/// Run the categories command.
pub async fn run(args: CategoriesArgs, ctx: &Context) -> Result<()> {
    let store = ctx.storefront()?;

    let mut categories = store.get_categories().await;
    if let Some(id) = &args.category {
        categories.retain(|c| c.id.as_str() == id);
        if categories.is_empty() {
            bail!("Category not found: {}", id);
        }
    }

    let mut listings = Vec::with_capacity(categories.len());
    for category in categories {
        let sub_categories = store.get_sub_categories(Some(&category.id)).await;
        let product_count = count_in(store.catalog(), &category.id);
        listings.push(CategoryListing {
            category,
            sub_categories,
            product_count,
        });
    }

    if ctx.output.is_json() {
        ctx.output.json(&listings);
        return Ok(());
    }

    ctx.output.header("Categories");
    for listing in &listings {
        println!(
            "  {} {} ({} products)",
            console::style(listing.category.id.as_str()).dim(),
            console::style(&listing.category.name).bold(),
            listing.product_count
        );
        for sub in &listing.sub_categories {
            ctx.output.list_item(&format!("{} {}", sub.id, sub.name));
        }
    }

    Ok(())
}

fn count_in(catalog: &Catalog, id: &CategoryId) -> usize {
    search::count(catalog, &FilterCriteria::new().with_category(id.clone()))
}
