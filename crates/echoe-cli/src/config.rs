//! Locating and loading the CLI configuration.

use std::env;
use std::path::{Path, PathBuf};

use echoe_core::config::ClientConfig;

use crate::error::CliError;

const CONFIG_FILE_NAME: &str = "config.json";
const DATA_DIR_ENV: &str = "ECHOE_DATA_DIR";

pub fn default_config_path() -> Result<PathBuf, CliError> {
    dirs::config_dir()
        .map(|dir| dir.join("echoe").join(CONFIG_FILE_NAME))
        .ok_or_else(|| CliError::Config("Failed to resolve config directory".to_string()))
}

/// Directory holding local diaries when no remote store is configured.
pub fn data_dir() -> PathBuf {
    env::var_os(DATA_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("echoe")
        })
}

/// Load the config file, then apply environment overrides.
pub fn load_config() -> Result<ClientConfig, CliError> {
    let config = load_from_path(&default_config_path()?)?;
    config
        .with_env_overrides(|name| env::var(name).ok())
        .map_err(|error| CliError::Config(error.to_string()))
}

pub fn load_from_path(path: &Path) -> Result<ClientConfig, CliError> {
    if !path.exists() {
        return Ok(ClientConfig::default());
    }

    let raw = std::fs::read_to_string(path).map_err(|error| {
        CliError::Config(format!(
            "Failed to read config at {}: {}",
            path.display(),
            error
        ))
    })?;
    ClientConfig::parse(&raw).map_err(|error| {
        CliError::Config(format!(
            "Failed to parse config at {}: {}",
            path.display(),
            error
        ))
    })
}
