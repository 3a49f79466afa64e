//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use mingle_core::config;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "mingle")]
#[command(version)]
#[command(about = "Terminal client for the Mingle developer pairing service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Sign in to Mingle (interactive)
    Login {
        /// Persist a new API base URL before signing in
        #[arg(long, value_name = "URL")]
        api: Option<String>,
    },

    /// Clear stored tokens
    Logout,

    /// Show the stored sign-in state
    Status,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Persist a new API base URL
    SetApi {
        /// Base URL of the Mingle backend, e.g. https://api.mingle.dev
        #[arg(value_name = "URL")]
        url: String,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // File logging before dispatch; the guard flushes pending lines on drop.
    let _log_guard = init_logging();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    // Bare `mingle` signs in
    let command = cli.command.unwrap_or(Commands::Login { api: None });

    match command {
        Commands::Login { api } => commands::login::run(api.as_deref()).await,
        Commands::Logout => commands::logout::run(),
        Commands::Status => commands::status::run(),
        Commands::Config { command } => match command {
            ConfigCommands::Path => commands::config::path(),
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::SetApi { url } => commands::config::set_api(&url),
        },
    }
}

/// Initializes file logging.
///
/// Logs are written to `{home}/logs/mingle.log` with `MINGLE_LOG`
/// controlling the filter. Returns a guard that must be kept alive for
/// the duration of the program. The terminal stays clean for the TUI;
/// only pre-dispatch setup warnings go to stderr.
fn init_logging() -> Option<WorkerGuard> {
    let log_dir = config::paths::logs_dir();
    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!(
            "Warning: could not create log directory {}: {e}",
            log_dir.display()
        );
        return None;
    }

    let mut opts = std::fs::OpenOptions::new();
    opts.create(true).append(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o600);
    }

    let log_path = log_dir.join("mingle.log");
    let log_file = match opts.open(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: could not open log file {}: {e}", log_path.display());
            return None;
        }
    };

    let (writer, guard) = tracing_appender::non_blocking(log_file);
    let filter = EnvFilter::try_from_env("MINGLE_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init();

    match result {
        Ok(()) => Some(guard),
        Err(_) => None, // Already initialized
    }
}
