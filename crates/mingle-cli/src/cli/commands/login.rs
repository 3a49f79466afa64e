//! Login command handler.

use anyhow::{Context, Result};
use mingle_core::config::{Config, paths};

use crate::modes::{self, SignInOutcome};

pub async fn run(api_override: Option<&str>) -> Result<()> {
    if let Some(url) = api_override {
        Config::save_api_base_url(url).context("save api base url")?;
    }

    let config = Config::load().context("load config")?;
    tracing::info!(api_base_url = config.effective_api_base_url(), "starting sign-in");

    match modes::run_signin(&config).await? {
        SignInOutcome::SignedIn => {
            println!("Signed in. Tokens saved to {}", paths::tokens_path().display());
        }
        SignInOutcome::Aborted => {
            println!("Sign-in aborted.");
        }
    }
    Ok(())
}
