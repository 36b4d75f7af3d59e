//! Persisted configuration file.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::persist::write_private;

/// Directory under the user config dir.
pub const APP_DIR_NAME: &str = "aigen";

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Contents of `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Reads and writes the configuration file at a fixed path.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<config dir>/aigen/config.toml`.
    pub fn default_location() -> Result<Self, ConfigError> {
        let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::new(base.join(APP_DIR_NAME).join(CONFIG_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the file; a missing file yields the empty configuration.
    pub fn load(&self) -> Result<StoredConfig, ConfigError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No config file at {}", self.path.display());
                return Ok(StoredConfig::default());
            }
            Err(source) => {
                return Err(ConfigError::ReadFailed {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Replace the file with `config`.
    pub fn save(&self, config: &StoredConfig) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

        write_private(&self.path, content.as_bytes()).map_err(|source| {
            ConfigError::WriteFailed {
                path: self.path.clone(),
                source,
            }
        })
    }

    /// Persist the API key, keeping any other stored settings.
    pub fn set_api_key(&self, api_key: &str) -> Result<(), ConfigError> {
        let mut config = self.load()?;
        config.api_key = Some(api_key.trim().to_string());
        self.save(&config)
    }
}
