//! Path resolution for AgroChar's local files.
//!
//! ```text
//! <config_dir>/agrochar/
//! ├── config.toml      # Client configuration
//! └── session.toml     # Persisted token and role
//! ```
//!
//! `<config_dir>` is the platform configuration directory reported by the
//! `dirs` crate (`~/.config` on Linux, `~/Library/Application Support` on
//! macOS, `%APPDATA%` on Windows).

use std::path::PathBuf;

const APP_DIR: &str = "agrochar";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find configuration directory"),
        }
    }
}

impl std::error::Error for PathError {}

pub struct AgroPaths;

impl AgroPaths {
    /// Returns `<config_dir>/agrochar`.
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::ConfigDirNotFound)
    }

    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the persisted session.
    ///
    /// # Security Note
    ///
    /// The file holds a bearer token. [`crate::FileSessionStore`] restricts
    /// it to the owning user on Unix.
    pub fn session_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("session.toml"))
    }
}
