//! Credential and model settings.
//!
//! The persisted file is read once and merged with environment overrides into
//! a [`Settings`] value, which is then handed to the model gateway.

pub mod store;

use std::env;
use std::fmt;
use std::time::Duration;

use tracing::warn;

use crate::error::ConfigError;
use crate::llm::{DEFAULT_API_BASE, DEFAULT_MODEL};

pub use store::{APP_DIR_NAME, CONFIG_FILE_NAME, ConfigStore, StoredConfig};

/// Overrides the stored API key.
pub const API_KEY_ENV_VAR: &str = "GEMINI_API_KEY";

/// Overrides the stored model name.
pub const MODEL_ENV_VAR: &str = "AIGEN_MODEL";

/// Overrides the API endpoint base URL.
pub const API_BASE_ENV_VAR: &str = "AIGEN_API_BASE";

/// HTTP timeout in seconds.
pub const TIMEOUT_ENV_VAR: &str = "AIGEN_TIMEOUT";

pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Resolved settings for one invocation.
#[derive(Clone)]
pub struct Settings {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub timeout: Duration,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Settings {
    /// Load the stored configuration and apply environment overrides.
    pub fn load(store: &ConfigStore) -> Result<Self, ConfigError> {
        Ok(Self::from_stored(store.load()?))
    }

    /// Apply environment overrides to an already-loaded configuration.
    pub fn from_stored(stored: StoredConfig) -> Self {
        let api_key = env_value(API_KEY_ENV_VAR).or(non_empty(stored.api_key));
        let model = env_value(MODEL_ENV_VAR)
            .or(non_empty(stored.model))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let api_base =
            env_value(API_BASE_ENV_VAR).unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        Self {
            api_key,
            model,
            api_base,
            timeout: get_timeout(),
        }
    }
}

fn env_value(name: &str) -> Option<String> {
    non_empty(env::var(name).ok())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Get timeout from environment or use default.
fn get_timeout() -> Duration {
    match env::var(TIMEOUT_ENV_VAR) {
        Ok(v) if !v.is_empty() => match v.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                warn!(
                    "Invalid {} value '{}', using default {}s",
                    TIMEOUT_ENV_VAR, v, DEFAULT_TIMEOUT_SECS
                );
                Duration::from_secs(DEFAULT_TIMEOUT_SECS)
            }
        },
        _ => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    }
}
