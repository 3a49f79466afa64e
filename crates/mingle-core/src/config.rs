//! Client configuration.
//!
//! Settings load from `${MINGLE_HOME}/config.toml`; a missing file means
//! pure defaults. Writes go through the embedded template so the file on
//! disk keeps its comments and section layout even after programmatic
//! edits like `mingle config set-url`.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Commented config template, embedded at compile time.
/// Edit `default_config.toml` to change it.
const DEFAULT_TEMPLATE: &str = include_str!("../default_config.toml");

/// Rebase a user's config onto the current template: template comments and
/// sections win on structure, the user's values win on content.
fn rebase_on_template(user_config: &str) -> Result<String> {
    use toml_edit::DocumentMut;

    let mut doc: DocumentMut = DEFAULT_TEMPLATE
        .parse()
        .context("Failed to parse default config template")?;
    let user_doc: DocumentMut = user_config.parse().context("Failed to parse user config")?;

    overlay_table(doc.as_table_mut(), user_doc.as_table());

    Ok(doc.to_string())
}

/// Copies every item in `source` over `target`, recursing into tables.
fn overlay_table(target: &mut toml_edit::Table, source: &toml_edit::Table) {
    use toml_edit::Item;

    for (key, item) in source.iter() {
        match item {
            Item::Value(v) => {
                target[key] = Item::Value(v.clone());
            }
            Item::Table(nested) => {
                if let Some(Item::Table(existing)) = target.get_mut(key) {
                    overlay_table(existing, nested);
                } else {
                    target[key] = Item::Table(nested.clone());
                }
            }
            Item::ArrayOfTables(arr) => {
                target[key] = Item::ArrayOfTables(arr.clone());
            }
            Item::None => {}
        }
    }
}

pub mod paths {
    //! Locations of the config file, token store, and logs.
    //!
    //! Everything lives under one root: `$MINGLE_HOME` when set, otherwise
    //! `~/.config/mingle`.

    use std::path::PathBuf;

    pub fn mingle_home() -> PathBuf {
        if let Ok(home) = std::env::var("MINGLE_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("mingle"))
            .expect("Could not determine home directory")
    }

    pub fn config_path() -> PathBuf {
        mingle_home().join("config.toml")
    }

    /// Where the saved token pair lives.
    pub fn tokens_path() -> PathBuf {
        mingle_home().join("tokens.json")
    }

    pub fn logs_dir() -> PathBuf {
        mingle_home().join("logs")
    }
}

/// Everything the client reads at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the Mingle API
    pub api_base_url: String,

    /// Terms of service page opened from the sign-in screen
    pub terms_url: String,

    /// Command invoked for the native identity prompt
    pub identity_helper: String,

    /// Timeout for the browser sign-in hand-back in seconds (0 disables)
    pub auth_timeout_secs: u32,
}

impl Config {
    const DEFAULT_API_BASE_URL: &str = "https://api.mingle.dev";
    const DEFAULT_TERMS_URL: &str = "https://www.mingle.dev/terms";
    const DEFAULT_IDENTITY_HELPER: &str = "mingle-identity";
    const DEFAULT_AUTH_TIMEOUT_SECS: u32 = 120;

    /// Loads the config from the default path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads the config from `path`, or defaults when the file is absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Persists a new `api_base_url` to the default config path.
    pub fn save_api_base_url(url: &str) -> Result<()> {
        Self::save_api_base_url_to(&paths::config_path(), url)
    }

    /// Persists a new `api_base_url` to `path`.
    ///
    /// A missing file is created from the template; an existing one is
    /// rebased onto it first, so stale files pick up current comments
    /// without losing any user value.
    pub fn save_api_base_url_to(path: &Path, url: &str) -> Result<()> {
        use toml_edit::{DocumentMut, value};

        let base = if path.exists() {
            let user_config = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            rebase_on_template(&user_config)?
        } else {
            DEFAULT_TEMPLATE.to_string()
        };

        let mut doc: DocumentMut = base
            .parse()
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        doc["api_base_url"] = value(url);

        Self::write_config(path, &doc.to_string())
    }

    /// Returns the API base URL without a trailing slash.
    pub fn effective_api_base_url(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    /// Returns the auth session timeout, or None when disabled.
    pub fn auth_timeout(&self) -> Option<Duration> {
        if self.auth_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(u64::from(self.auth_timeout_secs)))
        }
    }

    /// Creates a fresh config file from the template.
    /// Refuses to overwrite an existing file.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, DEFAULT_TEMPLATE)
    }

    /// Atomic write: temp file in the same directory, then rename.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp = path.with_extension("toml.tmp");
        fs::write(&tmp, content)
            .with_context(|| format!("Failed to write config to {}", tmp.display()))?;
        fs::rename(&tmp, path)
            .with_context(|| format!("Failed to move {} into place", tmp.display()))?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: Self::DEFAULT_API_BASE_URL.to_string(),
            terms_url: Self::DEFAULT_TERMS_URL.to_string(),
            identity_helper: Self::DEFAULT_IDENTITY_HELPER.to_string(),
            auth_timeout_secs: Self::DEFAULT_AUTH_TIMEOUT_SECS,
        }
    }
}
