//! Error types for the AgroChar client.
//!
//! Two families live here: [`ApiError`] is what every remote call resolves to
//! on failure, and [`StorageError`] covers local persistence (session file,
//! configuration file).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, IntoStaticStr};
use thiserror::Error;

/// Status code reported for requests that exceeded their deadline.
pub const TIMEOUT_STATUS: u16 = 408;

/// Status code that invalidates the stored session.
pub const UNAUTHORIZED_STATUS: u16 = 401;

/// Classification of a failed API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// The request did not complete within the configured timeout.
    Timeout,
    /// The backend answered 401; the session has been cleared.
    Unauthorized,
    /// Any other non-2xx answer.
    Http,
    /// The response body was not valid JSON.
    Decode,
    /// The request never produced a response (DNS, refused connection, TLS...).
    Network,
    /// The call succeeded but its outcome could not be stored locally.
    Storage,
}

/// A failed API call.
///
/// Carries enough information for a UI layer to render something sensible:
/// a human-readable `message`, the `kind` for branching, and the HTTP
/// `status` and decoded `body` when the server answered at all.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
    pub status: Option<u16>,
    pub body: Option<Value>,
}

impl ApiError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            body: None,
        }
    }

    /// Creates the error reported when the deadline elapses.
    pub fn timeout() -> Self {
        Self::new(ErrorKind::Timeout, "Request timed out").with_status(TIMEOUT_STATUS)
    }

    /// Creates an Unauthorized error.
    pub fn unauthorized(message: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            kind: ErrorKind::Unauthorized,
            message: message.into(),
            status: Some(UNAUTHORIZED_STATUS),
            body,
        }
    }

    /// Creates an error for a non-2xx answer.
    pub fn http(status: u16, message: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            kind: ErrorKind::Http,
            message: message.into(),
            status: Some(status),
            body,
        }
    }

    /// Creates a Decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Decode, message)
    }

    /// Creates a Network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    /// Creates a Storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    pub fn is_timeout(&self) -> bool {
        self.kind == ErrorKind::Timeout
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == ErrorKind::Unauthorized
    }

    pub fn is_network(&self) -> bool {
        self.kind == ErrorKind::Network
    }

    pub fn is_storage(&self) -> bool {
        self.kind == ErrorKind::Storage
    }
}

/// A type alias for `Result<T, ApiError>`.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Errors raised while reading or writing local state.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum StorageError {
    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// File lock could not be acquired
    #[error("Lock error: {0}")]
    Lock(String),

    /// Configuration value is missing or malformed
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StorageError {
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn lock(message: impl Into<String>) -> Self {
        Self::Lock(message.into())
    }

    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for StorageError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for StorageError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        Self::storage(err.to_string())
    }
}
