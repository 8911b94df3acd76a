//! Configuration loading.
//!
//! Sources, lowest priority first:
//! 1. Built-in defaults
//! 2. `<config_dir>/agrochar/config.toml`
//! 3. Environment variables (`AGROCHAR_BASE_URL`, `AGROCHAR_TIMEOUT_MS`,
//!    `AGROCHAR_USE_MOCK`, `AGROCHAR_SESSION_FILE`)

use crate::paths::AgroPaths;
use agrochar_core::{ClientConfig, StorageError};
use std::fs;
use std::path::PathBuf;

pub const ENV_BASE_URL: &str = "AGROCHAR_BASE_URL";
pub const ENV_TIMEOUT_MS: &str = "AGROCHAR_TIMEOUT_MS";
pub const ENV_USE_MOCK: &str = "AGROCHAR_USE_MOCK";
pub const ENV_SESSION_FILE: &str = "AGROCHAR_SESSION_FILE";

#[derive(Debug, Clone)]
pub struct ConfigService {
    path: Option<PathBuf>,
}

impl ConfigService {
    /// Uses the default config file location, if one can be determined.
    pub fn new() -> Self {
        Self {
            path: AgroPaths::config_file().ok(),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Loads the file and applies process environment overrides.
    pub fn load(&self) -> Result<ClientConfig, StorageError> {
        self.load_with_env(|key| std::env::var(key).ok())
    }

    /// Loads the file and applies overrides from `lookup`.
    pub fn load_with_env<F>(&self, lookup: F) -> Result<ClientConfig, StorageError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = self.load_file()?;
        apply_env_overrides(config, lookup)
    }

    fn load_file(&self) -> Result<ClientConfig, StorageError> {
        let Some(path) = &self.path else {
            return Ok(ClientConfig::default());
        };

        if !path.exists() {
            tracing::debug!("[Config] {} not found, using defaults", path.display());
            return Ok(ClientConfig::default());
        }

        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_env_overrides<F>(mut config: ClientConfig, lookup: F) -> Result<ClientConfig, StorageError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(base_url) = lookup(ENV_BASE_URL) {
        config.base_url = base_url;
    }

    if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
        config.timeout_ms = raw.trim().parse().map_err(|_| {
            StorageError::config(format!("{} must be a number of milliseconds, got '{}'", ENV_TIMEOUT_MS, raw))
        })?;
    }

    if let Some(raw) = lookup(ENV_USE_MOCK) {
        config.use_mock = parse_flag(&raw).ok_or_else(|| {
            StorageError::config(format!("{} must be true or false, got '{}'", ENV_USE_MOCK, raw))
        })?;
    }

    if let Some(path) = lookup(ENV_SESSION_FILE) {
        config.session_file = Some(PathBuf::from(path));
    }

    Ok(config)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
