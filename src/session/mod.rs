pub mod file;
pub mod memory;

use std::fmt;

use crate::types::Session;

pub use file::FileSessionStore;
pub use memory::InMemorySessionStore;

/// Store boundary the orchestrator works against: one session per
/// prospect id. Absence and corruption are the same "no session"
/// signal; only writes can fail.
pub trait SessionStore: Send + Sync {
    fn load(&self, prospect_id: &str) -> Option<Session>;
    fn save(&self, prospect_id: &str, session: &Session) -> Result<(), SessionStoreError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStoreErrorKind {
    InvalidId,
    Write,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStoreError {
    pub kind: SessionStoreErrorKind,
    pub message: String,
}

impl SessionStoreError {
    pub fn new(kind: SessionStoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for SessionStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SessionStoreError {}

pub fn invalid_id(message: impl Into<String>) -> SessionStoreError {
    SessionStoreError::new(SessionStoreErrorKind::InvalidId, message)
}

pub fn write_failure(message: impl Into<String>) -> SessionStoreError {
    SessionStoreError::new(SessionStoreErrorKind::Write, message)
}
