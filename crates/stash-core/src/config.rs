//! Where Stash keeps its database and how it logs
//!
//! A TOML file supplies the settings it names; `STASH_DATA_DIR`,
//! `STASH_LOG_LEVEL` and `STASH_LOG_FILE` then override single fields.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "STASH";

/// Name of the SQLite key-value database inside the data directory
const DATABASE_FILE: &str = "stash.db";

/// Data location and logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the key-value database
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Log filter level (trace, debug, info, warn, error)
    #[serde(default)]
    pub log_level: Option<String>,

    /// Write logs to this file instead of stderr
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: None,
            log_file: None,
        }
    }
}

impl Config {
    /// Settings from [`Config::config_file_path`] with environment overrides
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Settings from `path`, or defaults when it is absent
    ///
    /// Creates the data directory.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            Self::load_from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            let mut config = Self::default();
            config.apply_env_overrides();
            config
        };

        config.ensure_data_dir()?;
        Ok(config)
    }

    /// Parse settings from TOML text, then apply environment overrides
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Configuration rooted at an explicit data directory, without touching
    /// the config file or the environment
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// An empty log variable resets that field
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var(format!("{}_LOG_LEVEL", ENV_PREFIX)) {
            self.log_level = if val.is_empty() { None } else { Some(val) };
        }

        if let Ok(val) = std::env::var(format!("{}_LOG_FILE", ENV_PREFIX)) {
            self.log_file = if val.is_empty() {
                None
            } else {
                Some(PathBuf::from(val))
            };
        }
    }

    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Write to [`Config::config_file_path`]
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_file_path())
    }

    /// Write as TOML, creating parent directories
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// `STASH_CONFIG`, else `<config dir>/stash/config.toml`
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("stash")
            .join("config.toml")
    }

    /// `<data_dir>/stash.db`
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }

    /// Effective log level, `warn` unless configured
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("warn")
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stash")
}
