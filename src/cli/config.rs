//! `pkgwire config` command implementation
//!
//! Shows where settings come from, or prints a starter config file.

use crate::cli::Context;
use crate::error::Result;
use crate::project::user_config::{generate_user_config_template, get_config_path, STORE_ENV};
use clap::Args;

#[derive(Args)]
pub struct ConfigArgs {
    /// Print a commented config.toml template instead
    #[arg(long)]
    pub template: bool,
}

pub fn execute(args: &ConfigArgs, ctx: &Context) -> Result<()> {
    if args.template {
        print!("{}", generate_user_config_template());
        return Ok(());
    }

    let config_path = get_config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(unavailable)".to_string());
    println!("config:   {}", config_path);
    println!("store:    {}", ctx.store.display());
    if let Some(value) = std::env::var_os(STORE_ENV) {
        println!("          ({} = {})", STORE_ENV, value.to_string_lossy());
    }
    println!("language: {}", ctx.messages.language());
    println!("          (available: {})", ctx.messages.available_languages().join(", "));
    Ok(())
}
