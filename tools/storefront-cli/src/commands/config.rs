//! Configuration commands.

use std::path::Path;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, StorefrontConfig};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        Some(ConfigCommand::Show) | None => show(ctx),
        Some(ConfigCommand::Init { path, force }) => init(&path, force, ctx),
    }
}

fn show(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    match &ctx.config_path {
        Some(path) => ctx.output.kv("Loaded from", &path.display().to_string()),
        None => ctx.output.kv("Loaded from", "built-in defaults"),
    }
    println!();
    print!("{}", toml::to_string_pretty(&ctx.config)?);
    Ok(())
}

fn init(path: &str, force: bool, ctx: &Context) -> Result<()> {
    let target = ctx.resolve_path(Path::new(path));
    if target.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", target.display());
    }

    let target_str = target.to_string_lossy();
    if target_str.ends_with(".json") {
        StorefrontConfig::default().save(&target_str)?;
    } else {
        std::fs::write(&target, generate_default_config())?;
    }

    ctx.output.success(&format!("Wrote {}", target.display()));
    Ok(())
}
