//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/studydeck/config.toml)
//! 3. Environment variables (STUDYDECK_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix
const ENV_PREFIX: &str = "STUDYDECK";

/// Default name of the catalog document inside `data_dir`
pub const DEFAULT_DOCUMENT_FILE: &str = "database.json";

/// Default address the HTTP server binds to
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the catalog document
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// File name of the catalog document inside `data_dir`
    #[serde(default = "default_document_file")]
    pub document_file: String,

    /// Address for `studydeck serve`
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            document_file: default_document_file(),
            bind_addr: default_bind_addr(),
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (STUDYDECK_DATA_DIR, STUDYDECK_DOCUMENT_FILE, STUDYDECK_BIND_ADDR)
    /// 2. Config file (~/.config/studydeck/config.toml or STUDYDECK_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring a path given on the command line
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Some(val) = env_value("DATA_DIR") {
            self.data_dir = PathBuf::from(val);
        }

        if let Some(val) = env_value("DOCUMENT_FILE") {
            self.document_file = val;
        }

        if let Some(val) = env_value("BIND_ADDR") {
            self.bind_addr = val;
        }
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with STUDYDECK_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Some(path) = env_value("CONFIG") {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("studydeck")
            .join("config.toml")
    }

    /// Get the path to the catalog document
    pub fn document_path(&self) -> PathBuf {
        self.data_dir.join(&self.document_file)
    }
}

/// Read `STUDYDECK_<name>`, ignoring empty values
fn env_value(name: &str) -> Option<String> {
    std::env::var(format!("{}_{}", ENV_PREFIX, name))
        .ok()
        .filter(|val| !val.is_empty())
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("studydeck")
}

fn default_document_file() -> String {
    DEFAULT_DOCUMENT_FILE.to_string()
}

fn default_bind_addr() -> String {
    DEFAULT_BIND_ADDR.to_string()
}
