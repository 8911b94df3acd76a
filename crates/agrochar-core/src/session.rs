//! Session model and storage trait.
//!
//! A session is the token/role pair handed out by the backend on login.
//! Nothing in the client inspects the token; it is forwarded as a bearer
//! credential and dropped on logout or on the first 401.

use crate::error::StorageError;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// The persisted authentication state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Session {
    pub fn new(token: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            role: Some(role.into()),
        }
    }

    /// True iff a non-empty token is present.
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Storage for the current session.
///
/// Reads never fail from the caller's point of view: an unreadable backing
/// store reads as "no session". Writes replace both fields at once, so no
/// reader can observe a token without its role or vice versa.
pub trait SessionStore: Send + Sync {
    /// Returns the whole session as currently stored.
    fn load(&self) -> Session;

    /// Overwrites token and role.
    fn set_session(&self, token: &str, role: &str) -> Result<(), StorageError>;

    /// Removes token and role.
    fn clear(&self) -> Result<(), StorageError>;

    fn token(&self) -> Option<String> {
        self.load().token
    }

    fn role(&self) -> Option<String> {
        self.load().role
    }

    fn is_authenticated(&self) -> bool {
        self.load().is_authenticated()
    }
}

/// Process-lifetime session store.
///
/// Used when no durable location is configured, and throughout the tests.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: RwLock<Session>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds a session.
    pub fn with_session(token: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            session: RwLock::new(Session::new(token, role)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Session {
        match self.session.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn set_session(&self, token: &str, role: &str) -> Result<(), StorageError> {
        let mut guard = self
            .session
            .write()
            .map_err(|e| StorageError::lock(format!("session lock poisoned: {}", e)))?;
        *guard = Session::new(token, role);
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let mut guard = self
            .session
            .write()
            .map_err(|e| StorageError::lock(format!("session lock poisoned: {}", e)))?;
        *guard = Session::default();
        Ok(())
    }
}
