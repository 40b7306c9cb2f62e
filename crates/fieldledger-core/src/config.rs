//! Configuration management for FieldLedger.
//!
//! Loads configuration from ${FIELDLEDGER_HOME}/config.toml with sensible
//! defaults when the file is absent.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::derive::DebtorSortKey;

/// Env var that overrides the backend base URL. Wins over the config file.
pub const BACKEND_URL_ENV: &str = "FIELDLEDGER_BACKEND_URL";

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend base URL
    pub backend_url: String,

    /// Currency code shown before amounts
    pub currency: String,

    /// Default sort order for debtor listings
    pub default_debtor_sort: DebtorSortKey,
}

impl Config {
    const DEFAULT_BACKEND_URL: &str = "https://api.fieldledger.app";
    const DEFAULT_CURRENCY: &str = "UGX";

    /// Loads configuration from the default config path.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Resolves the backend base URL with precedence: env > config > default.
    ///
    /// The chosen URL must parse; a trailing slash is trimmed so clients can
    /// concatenate paths directly.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub fn resolve_backend_url(&self) -> Result<String> {
        if let Ok(env_url) = std::env::var(BACKEND_URL_ENV) {
            let trimmed = env_url.trim();
            if !trimmed.is_empty() {
                validate_url(trimmed)?;
                return Ok(trimmed.trim_end_matches('/').to_string());
            }
        }

        let trimmed = self.backend_url.trim();
        if trimmed.is_empty() {
            return Ok(Self::DEFAULT_BACKEND_URL.to_string());
        }
        validate_url(trimmed)?;
        Ok(trimmed.trim_end_matches('/').to_string())
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: Self::DEFAULT_BACKEND_URL.to_string(),
            currency: Self::DEFAULT_CURRENCY.to_string(),
            default_debtor_sort: DebtorSortKey::default(),
        }
    }
}

/// Validates that a URL is well-formed.
fn validate_url(url: &str) -> Result<()> {
    url::Url::parse(url).with_context(|| format!("Invalid backend URL: {url}"))?;
    Ok(())
}

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
/// To update, edit default_config.toml directly.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for FieldLedger configuration and data files.
    //!
    //! FIELDLEDGER_HOME resolution order:
    //! 1. FIELDLEDGER_HOME environment variable (if set)
    //! 2. ~/.config/fieldledger (default)

    use std::path::PathBuf;

    /// Returns the FieldLedger home directory.
    ///
    /// Checks FIELDLEDGER_HOME env var first, falls back to
    /// ~/.config/fieldledger
    pub fn fieldledger_home() -> PathBuf {
        if let Ok(home) = std::env::var("FIELDLEDGER_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("fieldledger"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        fieldledger_home().join("config.toml")
    }

    /// Returns the path to the session.json file.
    pub fn session_path() -> PathBuf {
        fieldledger_home().join("session.json")
    }
}
