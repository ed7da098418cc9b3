//! Configuration management for the farmlink agent

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Resource server base URL
    pub server: Option<String>,

    /// Folder holding the savegame slots
    pub save_root: Option<PathBuf>,
}

/// Where Farming Simulator 2019 keeps its saves
pub fn default_save_root() -> Option<PathBuf> {
    dirs::document_dir().map(|docs| docs.join("My Games").join("FarmingSimulator2019"))
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("farmlink");

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from file, or create default if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        toml::from_str(&contents).context("Failed to parse config file")
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory at {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, contents)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        Ok(())
    }

    pub fn set_server(&mut self, server: String) {
        self.server = Some(server);
    }

    pub fn set_save_root(&mut self, root: PathBuf) {
        self.save_root = Some(root);
    }

    /// Server from the command line, falling back to the configured one
    pub fn resolve_server(&self, arg: Option<String>) -> Result<String> {
        arg.or_else(|| self.server.clone()).context(
            "No server configured. Pass --server or run: farmlink configure --server http://HOST:PORT",
        )
    }

    /// Save root from the command line, the config file, or the documents folder
    pub fn resolve_save_root(&self, arg: Option<PathBuf>) -> Result<PathBuf> {
        arg.or_else(|| self.save_root.clone())
            .or_else(default_save_root)
            .context("Could not determine the documents folder. Pass --root")
    }
}
