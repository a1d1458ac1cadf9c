//! Application configuration for toolcatalog.
//!
//! User config lives at `~/.toolcatalog/toolcatalog.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "toolcatalog.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".toolcatalog";

// ---------------------------------------------------------------------------
// Config structs (matching toolcatalog.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Page fetch settings.
    #[serde(default)]
    pub fetch: FetchSettings,

    /// Enrichment limits.
    #[serde(default)]
    pub enrich: EnrichSettings,
}

/// `[fetch]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchSettings {
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Response bodies are cut off after this many bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// User-Agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum number of redirects to follow.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_body_bytes: default_max_body_bytes(),
            user_agent: default_user_agent(),
            max_redirects: default_max_redirects(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    8
}
fn default_max_body_bytes() -> usize {
    1024 * 1024
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/124.0 Safari/537.36"
        .into()
}
fn default_max_redirects() -> usize {
    5
}

/// `[enrich]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichSettings {
    /// Maximum number of inferred feature phrases.
    #[serde(default = "default_max_items")]
    pub max_features: usize,

    /// Maximum number of inferred tags.
    #[serde(default = "default_max_items")]
    pub max_tags: usize,
}

impl Default for EnrichSettings {
    fn default() -> Self {
        Self {
            max_features: default_max_items(),
            max_tags: default_max_items(),
        }
    }
}

fn default_max_items() -> usize {
    3
}

// ---------------------------------------------------------------------------
// Fetch config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime fetch configuration, merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Per-request timeout.
    pub timeout: Duration,
    /// Body size cap in bytes.
    pub max_body_bytes: usize,
    /// User-Agent header value.
    pub user_agent: String,
    /// Redirect limit.
    pub max_redirects: usize,
}

impl FetchConfig {
    /// Override the timeout (from `--timeout`).
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.fetch.timeout_secs),
            max_body_bytes: config.fetch.max_body_bytes,
            user_agent: config.fetch.user_agent.clone(),
            max_redirects: config.fetch.max_redirects,
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.toolcatalog/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CatalogError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.toolcatalog/toolcatalog.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = match config_file_path() {
        Ok(path) => path,
        Err(e) => {
            tracing::debug!(error = %e, "no home directory, using default config");
            return Ok(AppConfig::default());
        }
    };

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        CatalogError::config(format!("failed to parse {}: {e}", path.display()))
    })?;

    if config.fetch.timeout_secs == 0 {
        return Err(CatalogError::config(format!(
            "{}: fetch.timeout_secs must be greater than zero",
            path.display()
        )));
    }

    Ok(config)
}
