//! Terminal setup and teardown.
//!
//! Raw mode and the alternate screen must be unwound no matter how the
//! process exits, so restore runs from three places: the runtime's `Drop`
//! impl, the panic hook, and the Ctrl+C path through the reducer's `Quit`.

use std::io::{self, Stdout};
use std::panic;

use anyhow::{Context, Result};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

/// The concrete terminal type the runtime draws to.
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Enters raw mode and the alternate screen, returning a ready terminal.
///
/// Install the panic hook first; a panic between `enable_raw_mode` and the
/// hook installation would leave the shell in raw mode.
///
/// # Errors
/// Returns an error if the operation fails.
pub fn init() -> Result<Tui> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;
    Terminal::new(CrosstermBackend::new(stdout)).context("create terminal")
}

/// Leaves the alternate screen and disables raw mode.
///
/// Safe to call more than once; crossterm tolerates redundant teardown.
///
/// # Errors
/// Returns an error if the operation fails.
pub fn restore() -> Result<()> {
    execute!(io::stdout(), LeaveAlternateScreen).context("leave alternate screen")?;
    disable_raw_mode().context("disable raw mode")?;
    Ok(())
}

/// Chains a terminal restore in front of the default panic handler so the
/// panic message lands on a readable screen.
pub fn init_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore();
        original_hook(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    // Raw mode and the alternate screen need a real TTY, which CI lacks.
    // Restore-on-exit, restore-on-panic, and restore-on-Ctrl+C are checked
    // by hand when touching this file.
}
