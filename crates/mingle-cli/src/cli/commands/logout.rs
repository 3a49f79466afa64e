//! Logout command handler.

use anyhow::{Context, Result};
use mingle_core::auth::tokens;

pub fn run() -> Result<()> {
    let removed = tokens::clear_tokens().context("clear tokens")?;
    if removed {
        println!("Signed out.");
    } else {
        println!("Not signed in.");
    }
    Ok(())
}
