//! CLI command implementations.

pub mod cart_demo;
pub mod categories;
pub mod config;
pub mod product;
pub mod query;

use clap::{Args, Subcommand};
use storefront_commerce::money::{Currency, Money};
use storefront_commerce::search::{FilterCriteria, SortKey};

/// Arguments for the query command.
#[derive(Args)]
pub struct QueryArgs {
    /// Text matched against product name and description.
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Only products in this category.
    #[arg(long)]
    pub category: Option<String>,

    /// Only products in this sub-category's category.
    #[arg(long)]
    pub sub_category: Option<String>,

    /// Minimum price (inclusive), in the catalog currency's smallest unit.
    #[arg(long)]
    pub min_price: Option<i64>,

    /// Maximum price (inclusive), in the catalog currency's smallest unit.
    #[arg(long)]
    pub max_price: Option<i64>,

    /// Hide products that are out of stock.
    #[arg(long)]
    pub in_stock: bool,

    /// Sort order: default, price-asc, price-desc, name-asc, name-desc.
    #[arg(long, default_value = "default")]
    pub sort: SortKey,

    /// Page number (1-indexed).
    #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
    pub page: i64,

    /// Items per page (default from config).
    #[arg(long, allow_negative_numbers = true)]
    pub page_size: Option<i64>,

    /// Issue these searches first; the main query supersedes them.
    #[arg(long = "superseded", value_name = "SEARCH")]
    pub superseded: Vec<String>,
}

impl QueryArgs {
    /// Build criteria with prices in `currency`.
    pub fn to_criteria(&self, currency: Currency, default_page_size: i64) -> FilterCriteria {
        let money = |amount| Money::new(amount, currency);
        let mut criteria = FilterCriteria::new()
            .with_search(self.search.clone())
            .with_price_range(self.min_price.map(money), self.max_price.map(money))
            .with_sort(self.sort)
            .with_pagination(self.page, self.page_size.unwrap_or(default_page_size));

        if let Some(category) = &self.category {
            criteria = criteria.with_category(category.as_str());
        }
        if let Some(sub_category) = &self.sub_category {
            criteria = criteria.with_sub_category(sub_category.as_str());
        }
        if self.in_stock {
            criteria = criteria.in_stock_only();
        }
        criteria
    }
}

/// Arguments for the product command.
#[derive(Args)]
pub struct ProductArgs {
    /// Product ID.
    pub id: String,
}

/// Arguments for the categories command.
#[derive(Args)]
pub struct CategoriesArgs {
    /// Only show this category.
    #[arg(long)]
    pub category: Option<String>,
}

/// Arguments for the cart-demo command.
#[derive(Args)]
pub struct CartDemoArgs {
    /// Products to add, in order.
    #[arg(long = "product", value_name = "ID", default_values = ["1", "3"])]
    pub products: Vec<String>,

    /// Quantity the first product is set to after adding.
    #[arg(short, long, default_value_t = 3, allow_negative_numbers = true)]
    pub quantity: i64,

    /// Check out at the end instead of clearing the cart.
    #[arg(long)]
    pub checkout: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: Option<ConfigCommand>,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Output path (.toml or .json).
        #[arg(default_value = "storefront.toml")]
        path: String,

        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
}
