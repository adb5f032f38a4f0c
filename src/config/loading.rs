//! Configuration loading functionality.
//!
//! Resolves the configuration file path, parses TOML and validates the result.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::Config;
use super::validation::validate_config;
use crate::constants::*;

/// Default location of the configuration file.
pub fn default_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().context("Could not determine config directory")?;
    Ok(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load the configuration.
///
/// With `config_dir` the file must exist there. Without it the default path is
/// used, and a missing file yields the built-in defaults.
pub fn load(config_dir: Option<&Path>) -> Result<Config> {
    match config_dir {
        Some(dir) => {
            let path = dir.join(CONFIG_FILE_NAME);
            if !path.exists() {
                anyhow::bail!("Configuration file not found at {}", path.display());
            }
            load_from_path(&path)
        }
        None => {
            let path = default_config_path()?;
            if !path.exists() {
                log_debug!("No configuration at {}, using defaults", path.display());
                return Ok(Config::default());
            }
            load_from_path(&path)
        }
    }
}

/// Load and validate configuration from a specific file.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config from {}", path.display()))?;

    validate_config(&config)
        .with_context(|| format!("Invalid configuration in {}", path.display()))?;

    config.config_dir = path.parent().map(Path::to_path_buf);
    Ok(config)
}
