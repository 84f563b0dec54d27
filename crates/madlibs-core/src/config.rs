//! Configuration management for the MadLibs client.
//!
//! Loads configuration from ${MADLIBS_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default backend address when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base address of the MadLibs backend.
    pub base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Loads the configuration from the default path.
    ///
    /// Returns defaults if no config file exists.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads the configuration from a specific path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
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

    /// Writes a commented default config file.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(path, default_config_toml())
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }
}

/// Template written by `madlibs config init`.
pub fn default_config_toml() -> String {
    format!(
        "# MadLibs client configuration\n\
         \n\
         # Base address of the MadLibs backend.\n\
         base_url = \"{DEFAULT_BASE_URL}\"\n"
    )
}

/// Resolves the backend base address with precedence: flag > env > config > default.
///
/// # Errors
/// Returns an error if the chosen URL is not well-formed.
pub fn resolve_base_url(flag_base_url: Option<&str>, config: &Config) -> Result<String> {
    if let Some(flag_url) = flag_base_url {
        let trimmed = flag_url.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed)?;
            return Ok(trimmed.trim_end_matches('/').to_string());
        }
    }

    if let Ok(env_url) = std::env::var("MADLIBS_BASE_URL") {
        let trimmed = env_url.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed)?;
            return Ok(trimmed.trim_end_matches('/').to_string());
        }
    }

    let trimmed = config.base_url.trim();
    if !trimmed.is_empty() {
        validate_url(trimmed)?;
        return Ok(trimmed.trim_end_matches('/').to_string());
    }

    Ok(DEFAULT_BASE_URL.to_string())
}

/// Validates that a URL is well-formed.
fn validate_url(url: &str) -> Result<()> {
    url::Url::parse(url).with_context(|| format!("Invalid backend base URL: {url}"))?;
    Ok(())
}

pub mod paths {
    //! Path resolution for MadLibs configuration and log directories.
    //!
    //! MADLIBS_HOME resolution order:
    //! 1. MADLIBS_HOME environment variable (if set)
    //! 2. ~/.config/madlibs (default)

    use std::path::PathBuf;

    /// Returns the MadLibs home directory.
    ///
    /// Checks MADLIBS_HOME env var first, falls back to ~/.config/madlibs
    pub fn madlibs_home() -> PathBuf {
        if let Ok(home) = std::env::var("MADLIBS_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("madlibs"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        madlibs_home().join("config.toml")
    }

    /// Returns the directory where log files are written.
    pub fn logs_dir() -> PathBuf {
        madlibs_home().join("logs")
    }
}
