//! Storefront CLI - Browse the catalog and drive a cart from the terminal.
//!
//! Commands:
//! - `storefront query` - Search, filter, sort and page the catalog
//! - `storefront product` - Show one product
//! - `storefront categories` - List categories and their sub-categories
//! - `storefront cart-demo` - Run a scripted cart session
//! - `storefront config` - Show or generate configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};

use commands::{CartDemoArgs, CategoriesArgs, ConfigArgs, ProductArgs, QueryArgs};

/// Storefront CLI - Browse a product catalog and manage a cart
#[derive(Parser)]
#[command(name = "storefront")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search, filter, sort and page the catalog
    Query(QueryArgs),

    /// Show a single product
    Product(ProductArgs),

    /// List categories and sub-categories
    Categories(CategoriesArgs),

    /// Run a scripted add/update/remove cart session
    CartDemo(CartDemoArgs),

    /// Show or generate configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = output::Output::new(cli.verbose, cli.json);

    let ctx = context::Context::load(cli.config.as_deref(), output)?;

    let logging = ctx.config.logging.clone().with_verbosity(cli.verbose);
    storefront_observability::init_logging(&logging).context("Failed to initialise logging")?;
    tracing::debug!(config = ?ctx.config_path, "configuration loaded");

    let result = match cli.command {
        Commands::Query(args) => commands::query::run(args, &ctx).await,
        Commands::Product(args) => commands::product::run(args, &ctx).await,
        Commands::Categories(args) => commands::categories::run(args, &ctx).await,
        Commands::CartDemo(args) => commands::cart_demo::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
