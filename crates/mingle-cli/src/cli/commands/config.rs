//! `mingle config` subcommand handlers.

use anyhow::{Context, Result};
use mingle_core::config::{Config, paths};

pub fn path() -> Result<()> {
    println!("{}", paths::config_path().display());
    Ok(())
}

pub fn init() -> Result<()> {
    let config_path = paths::config_path();
    Config::init(&config_path)
        .with_context(|| format!("init config at {}", config_path.display()))?;
    println!("Created config at {}", config_path.display());
    Ok(())
}

pub fn set_api(url: &str) -> Result<()> {
    Config::save_api_base_url(url).context("save api base url")?;
    println!("API base URL set to {url}");
    Ok(())
}
