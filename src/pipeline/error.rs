use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishErrorKind {
    /// No usable recipient on the enriched prospect. Never papered over
    /// with a fallback address; the send must be blocked.
    MissingRecipient,
    /// The send log could not be persisted. The previously written log
    /// is left intact and the session must not transition to sent.
    LogWrite,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishError {
    pub kind: PublishErrorKind,
    pub message: String,
}

impl PublishError {
    pub fn new(kind: PublishErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for PublishError {}

pub fn missing_recipient(message: impl Into<String>) -> PublishError {
    PublishError::new(PublishErrorKind::MissingRecipient, message)
}

pub fn log_write_failure(message: impl Into<String>) -> PublishError {
    PublishError::new(PublishErrorKind::LogWrite, message)
}
