//! Full-screen terminal sign-in flow for Mingle.

pub mod common;
pub mod effects;
pub mod events;
pub mod features;
pub mod overlays;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, stderr};

use anyhow::Result;
pub use features::signin;
use mingle_core::config::Config;
pub use runtime::TuiRuntime;

use crate::state::Screen;

/// How the sign-in flow ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignInOutcome {
    /// Tokens were obtained and handed off.
    SignedIn,
    /// The user quit before signing in.
    Aborted,
}

/// Runs the interactive sign-in flow.
pub async fn run_signin(config: &Config) -> Result<SignInOutcome> {
    // The sign-in screen requires a terminal to render
    if !stderr().is_terminal() {
        anyhow::bail!(
            "Sign-in requires a terminal.\n\
             Run `mingle login` from an interactive shell."
        );
    }

    let mut runtime = TuiRuntime::new(config.clone())?;
    runtime.run()?;

    let outcome = match runtime.state.tui.screen {
        Screen::SessionReady { .. } => SignInOutcome::SignedIn,
        Screen::SignIn | Screen::EmailLogin => SignInOutcome::Aborted,
    };
    Ok(outcome)
}
