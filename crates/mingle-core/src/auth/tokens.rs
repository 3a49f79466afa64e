//! Token pair contract and storage.
//!
//! Stores the signed-in token pair in `<home>/tokens.json` with restricted
//! permissions (0600). Tokens are never logged or displayed in full.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::paths;

/// Access/refresh token pair, the terminal output of every sign-in path.
///
/// Wire format is camelCase, matching the backend response and the
/// redirect URL contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl TokenPair {
    /// Parses a token pair from an auth session return URL.
    ///
    /// The backend appends `/<accessToken>/<refreshToken>` to the return
    /// URL: the last `/`-separated segment is the refresh token, the
    /// second-to-last the access token. Both must be non-empty or the
    /// pair is discarded.
    pub fn from_redirect_url(url: &str) -> Option<Self> {
        let mut parts = url.rsplit('/');
        let refresh_token = parts.next()?;
        let access_token = parts.next()?;
        if refresh_token.is_empty() || access_token.is_empty() {
            return None;
        }
        Some(Self {
            access_token: access_token.to_string(),
            refresh_token: refresh_token.to_string(),
        })
    }
}

/// Stored sign-in session: the token pair plus when it was saved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTokens {
    #[serde(flatten)]
    pub pair: TokenPair,
    pub saved_at: DateTime<Utc>,
}

/// Loads stored tokens from the default path.
/// Returns None if nothing is stored.
///
/// # Errors
/// Returns an error if the operation fails.
pub fn load_tokens() -> Result<Option<StoredTokens>> {
    load_tokens_from(&paths::tokens_path())
}

/// Loads stored tokens from a specific path.
///
/// # Errors
/// Returns an error if the operation fails.
pub fn load_tokens_from(path: &Path) -> Result<Option<StoredTokens>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read tokens from {}", path.display()))?;

    let stored = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse tokens from {}", path.display()))?;
    Ok(Some(stored))
}

/// Saves the token pair to the default path, stamping the save time.
///
/// # Errors
/// Returns an error if the operation fails.
pub fn save_tokens(pair: &TokenPair) -> Result<()> {
    save_tokens_to(&paths::tokens_path(), pair)
}

/// Saves the token pair to a specific path with restricted permissions (0600).
///
/// # Errors
/// Returns an error if the operation fails.
pub fn save_tokens_to(path: &Path, pair: &TokenPair) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let stored = StoredTokens {
        pair: pair.clone(),
        saved_at: Utc::now(),
    };
    let contents = serde_json::to_string_pretty(&stored).context("Failed to serialize tokens")?;

    // Write with restricted permissions
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .with_context(|| format!("Failed to open {} for writing", path.display()))?;
        file.write_all(contents.as_bytes())
            .with_context(|| format!("Failed to write to {}", path.display()))?;
    }

    #[cfg(not(unix))]
    {
        fs::write(path, contents)
            .with_context(|| format!("Failed to write to {}", path.display()))?;
    }

    Ok(())
}

/// Removes stored tokens from the default path.
/// Returns whether anything was removed.
///
/// # Errors
/// Returns an error if the operation fails.
pub fn clear_tokens() -> Result<bool> {
    clear_tokens_at(&paths::tokens_path())
}

/// Removes stored tokens at a specific path.
///
/// # Errors
/// Returns an error if the operation fails.
pub fn clear_tokens_at(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    fs::remove_file(path)
        .with_context(|| format!("Failed to remove tokens at {}", path.display()))?;
    Ok(true)
}

/// Returns a masked version of a token for display (first 12 chars + ...).
pub fn mask_token(token: &str) -> String {
    if token.len() <= 16 {
        return "***".to_string();
    }
    match token.get(..12) {
        Some(prefix) => format!("{prefix}..."),
        None => "***".to_string(),
    }
}
