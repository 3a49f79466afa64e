//! Runtime execution modes.
//!
//! The interactive sign-in flow lives in `mingle-tui` behind the `tui`
//! feature so headless builds keep the token and config commands.

#[cfg(feature = "tui")]
pub use mingle_tui::{SignInOutcome, run_signin};

#[cfg(not(feature = "tui"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignInOutcome {
    SignedIn,
    Aborted,
}

#[cfg(not(feature = "tui"))]
pub async fn run_signin(
    _config: &mingle_core::config::Config,
) -> anyhow::Result<SignInOutcome> {
    anyhow::bail!("Sign-in is disabled in this build (feature \"tui\").");
}
