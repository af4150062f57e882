//! Scripted cart session.

use anyhow::{bail, Context as _, Result};
use serde::Serialize;
use storefront_commerce::catalog::Product;
use storefront_commerce::ids::ProductId;
use storefront_commerce::money::Money;
use storefront_data::Storefront;

use super::CartDemoArgs;
use crate::context::Context;

/// Cart state after one scripted step.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CartStep {
    action: String,
    item_count: i64,
    distinct_items: usize,
    total: Money,
}

/// Run the cart-demo command.
pub async fn run(args: CartDemoArgs, ctx: &Context) -> Result<()> {
    if args.products.is_empty() {
        bail!("cart-demo needs at least one --product");
    }

    let mut store = ctx.storefront()?;
    let summaries = store.subscribe_cart();

    let mut products = Vec::with_capacity(args.products.len());
    for id in &args.products {
        match store.get_product_by_id(&ProductId::new(id.as_str())).await {
            Some(product) => products.push(product),
            None => bail!("Product not found: {}", id),
        }
    }

    let mut steps = Vec::new();
    let mut record = |store: &Storefront, action: String| {
        steps.push(CartStep {
            action,
            item_count: store.get_cart_items_count(),
            distinct_items: store.cart().distinct_count(),
            total: store.get_cart_total(),
        });
    };

    for product in &products {
        store.add_to_cart(product, None)?;
        record(&store, format!("add 1 x {}", product.name));
    }

    let first = &products[0];
    store.add_to_cart(first, None)?;
    record(&store, format!("add 1 x {} again", first.name));

    warn_if_over_stock(ctx, first, args.quantity);
    store
        .update_quantity(&first.id, args.quantity)
        .with_context(|| format!("Failed to set quantity of {}", first.name))?;
    record(&store, format!("set {} to {}", first.name, args.quantity));

    if let Some(last) = products.get(1..).and_then(|rest| rest.last()) {
        store.remove_from_cart(&last.id);
        record(&store, format!("remove {}", last.name));
    }

    let receipt = if args.checkout {
        let receipt = store.checkout().context("Checkout failed")?;
        record(&store, "checkout".to_string());
        Some(receipt)
    } else {
        store.clear_cart();
        record(&store, "clear".to_string());
        None
    };

    let revision = summaries.borrow().revision;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "steps": steps,
            "receipt": receipt,
            "revision": revision,
        }));
        return Ok(());
    }

    ctx.output.header("Cart session");
    let total_steps = steps.len();
    for (i, step) in steps.iter().enumerate() {
        ctx.output.step(
            i + 1,
            total_steps,
            &format!(
                "{:<36} {:>3} items  {:>2} lines  {}",
                step.action,
                step.item_count,
                step.distinct_items,
                step.total.display()
            ),
        );
    }

    if let Some(receipt) = receipt {
        println!();
        ctx.output.success(&format!(
            "Checked out {} items for {}",
            receipt.item_count,
            receipt.total.display()
        ));
        ctx.output.kv("Cart", receipt.cart_id.as_str());
        ctx.output.kv("Completed", &receipt.completed_at.to_rfc3339());
        for item in &receipt.items {
            ctx.output.list_item(&format!(
                "{} x {} = {}",
                item.quantity,
                item.product.name,
                item.line_total().map_or_else(|| "overflow".to_string(), |t| t.display())
            ));
        }
    }
    ctx.output.kv("Revisions", &revision.to_string());

    Ok(())
}

fn warn_if_over_stock(ctx: &Context, product: &Product, quantity: i64) {
    if quantity > product.stock {
        ctx.output.warn(&format!(
            "{} has only {} in stock; the cart does not enforce stock",
            product.name, product.stock
        ));
    }
}
