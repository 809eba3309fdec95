//! TOML configuration parsing.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::backend::{BackendConfig, BackendOptions};

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/i18n.toml";

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Settings of the MongoDB translation backend
    #[serde(default)]
    pub backend: BackendConfig,
}

/// Loads [`Configuration`] from a TOML file.
#[derive(Debug, Clone)]
pub struct ConfigurationLoader {
    /// Path the configuration was looked up at
    pub config_path: PathBuf,
    /// Loaded configuration (defaults when the file does not exist)
    pub config: Configuration,
}

impl ConfigurationLoader {
    /// Initialize configuration loader.
    ///
    /// # Arguments
    /// * `config_path` - Path to TOML config file. If None, uses `config/i18n.toml`.
    ///   A missing file yields the default configuration.
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let config_path = config_path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        let config = if config_path.exists() {
            Self::load_config(&config_path)?
        } else {
            tracing::debug!(path = %config_path.display(), "config file not found, using defaults");
            Configuration::default()
        };

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Parse configuration from TOML text.
    pub fn parse(contents: &str) -> Result<Configuration> {
        toml::from_str(contents).context("Failed to parse TOML configuration")
    }

    fn load_config(config_path: &Path) -> Result<Configuration> {
        let contents = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("Invalid config file: {}", config_path.display()))
    }

    /// Backend options built from the loaded configuration
    pub fn backend_options(&self) -> BackendOptions {
        BackendOptions::from_config(self.config.backend.clone())
    }
}
