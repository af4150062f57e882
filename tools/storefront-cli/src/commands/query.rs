//! Catalog query command.

use anyhow::{bail, Context as _, Result};
use storefront_commerce::catalog::Product;
use storefront_commerce::search::{Page, SortKey};
use storefront_data::QueryOutcome;

use super::QueryArgs;
use crate::context::Context;
use crate::output::{format_price, stock_badge, truncate};

/// Run the query command.
pub async fn run(args: QueryArgs, ctx: &Context) -> Result<()> {
    let store = ctx.storefront()?;
    let criteria = args.to_criteria(store.catalog().currency(), ctx.config.catalog.page_size);

    // Earlier queries go out first so the main one supersedes them; their
    // outcomes show latest-wins delivery from the terminal.
    let earlier: Vec<_> = args
        .superseded
        .iter()
        .map(|search| {
            let handle = store.gateway().submit(criteria.clone().with_search(search.as_str()));
            ctx.output.debug(&format!("Submitted query #{} for '{}'", handle.seq(), search));
            handle
        })
        .collect();

    let sort = criteria.sort;
    let page = store
        .list_products(criteria)
        .await
        .context("Catalog query failed")?;

    for handle in earlier {
        let seq = handle.seq();
        let outcome = handle.outcome().await;
        ctx.output.debug(&format!("Query #{} ended as {}", seq, outcome_name(&outcome)));
    }

    let Some(page) = page else {
        bail!("Query was superseded before it completed");
    };

    if ctx.output.is_json() {
        ctx.output.json(&page);
        return Ok(());
    }

    print_page(&page, sort, ctx);
    Ok(())
}

fn outcome_name(outcome: &QueryOutcome) -> &'static str {
    match outcome {
        QueryOutcome::Delivered(_) => "delivered",
        QueryOutcome::Superseded => "superseded",
        QueryOutcome::Cancelled => "cancelled",
        QueryOutcome::Failed(_) => "failed",
    }
}

fn print_page(page: &Page<Product>, sort: SortKey, ctx: &Context) {
    if page.is_empty() {
        if page.total_matching == 0 {
            ctx.output.info("No products match these filters.");
        } else {
            ctx.output.info(&format!(
                "Page {} is past the end ({} matching products, {} pages).",
                page.page,
                page.total_matching,
                page.total_pages()
            ));
        }
        return;
    }

    ctx.output.header(&format!(
        "Products {}-{} of {} ({})",
        page.start_item(),
        page.end_item(),
        page.total_matching,
        sort.display_name()
    ));

    ctx.output.table_row(&["ID", "NAME", "PRICE", "STOCK"], &[4, 28, 28, 12]);
    for product in &page.items {
        let name = truncate(&product.name, 28);
        let price = format_price(product);
        let stock = stock_badge(product.stock);
        ctx.output
            .table_row(&[product.id.as_str(), &name, &price, &stock], &[4, 28, 28, 12]);
    }

    println!();
    ctx.output.kv("Page", &format!("{} of {}", page.page, page.total_pages()));
    if page.has_next() {
        ctx.output.info(&format!("Next page: --page {}", page.page + 1));
    }
}
