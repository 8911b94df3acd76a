//! Durable session storage.
//!
//! The session lives in a small TOML file:
//!
//! ```toml
//! token = "eyJhbGciOi..."
//! role = "farmer"
//! ```
//!
//! Writes go through a temporary file that is fsynced and renamed over the
//! target while an exclusive lock is held, so a reader sees either the old
//! session or the new one, never a mix.

use crate::paths::{AgroPaths, PathError};
use agrochar_core::StorageError;
use agrochar_core::session::{Session, SessionStore};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

/// [`SessionStore`] backed by a TOML file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Creates a store at the default location (`<config_dir>/agrochar/session.toml`).
    pub fn new() -> Result<Self, PathError> {
        Ok(Self {
            path: AgroPaths::session_file()?,
        })
    }

    /// Creates a store at a custom path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Session, StorageError> {
        if !self.path.exists() {
            return Ok(Session::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Session::default());
        }

        Ok(toml::from_str(&content)?)
    }

    fn write(&self, session: &Session) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(session)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        restrict_permissions(&tmp_file)?;
        tmp_file.write_all(content.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn temp_path(&self) -> Result<PathBuf, StorageError> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| StorageError::io("Session path has no parent directory"))?;
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| StorageError::io("Session path has no file name"))?;

        Ok(parent.join(format!(".{}.tmp", file_name.to_string_lossy())))
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Session {
        match self.read() {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(
                    "[SessionStore] Ignoring unreadable session file {}: {}",
                    self.path.display(),
                    e
                );
                Session::default()
            }
        }
    }

    fn set_session(&self, token: &str, role: &str) -> Result<(), StorageError> {
        let _lock = FileLock::acquire(&self.path)?;
        self.write(&Session::new(token, role))?;
        tracing::debug!("[SessionStore] Session saved (role: {})", role);
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let _lock = FileLock::acquire(&self.path)?;
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!("[SessionStore] Session cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(file: &File) -> Result<(), StorageError> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_file: &File) -> Result<(), StorageError> {
    Ok(())
}

/// Exclusive lock on `<session>.lock`, released when the handle is dropped.
///
/// The lock file itself is left in place: unlinking it while another writer
/// waits on the old inode would let a third writer lock a fresh file.
struct FileLock {
    #[allow(dead_code)]
    file: File,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, StorageError> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        use fs2::FileExt;
        file.lock_exclusive()
            .map_err(|e| StorageError::lock(format!("Failed to acquire lock: {}", e)))?;

        Ok(FileLock { file })
    }
}
