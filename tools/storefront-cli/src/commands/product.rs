//! Product detail command.

use anyhow::{bail, Result};
use storefront_commerce::ids::ProductId;

use super::ProductArgs;
use crate::context::Context;
use crate::output::{format_price, stock_badge};

/// Run the product command.
pub async fn run(args: ProductArgs, ctx: &Context) -> Result<()> {
    let store = ctx.storefront()?;

    let Some(product) = store.get_product_by_id(&ProductId::new(args.id.as_str())).await else {
        bail!("Product not found: {}", args.id);
    };

    if ctx.output.is_json() {
        ctx.output.json(&product);
        return Ok(());
    }

    ctx.output.header(&product.name);
    if !product.description.is_empty() {
        println!("  {}", product.description);
        println!();
    }

    ctx.output.kv("ID", product.id.as_str());
    ctx.output.kv("Price", &format_price(&product));
    ctx.output.kv("Stock", &stock_badge(product.stock));

    let category = store
        .catalog()
        .category(&product.category_id)
        .map_or_else(|| product.category_id.to_string(), |c| c.name.clone());
    ctx.output.kv("Category", &category);

    if let Some(thumbnail) = product.thumbnail() {
        ctx.output.kv("Thumbnail", thumbnail);
        for image in product.images.iter().skip(1) {
            ctx.output.list_item(image);
        }
    }

    Ok(())
}
