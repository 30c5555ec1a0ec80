//! Errors shared by the session command handlers.

use thiserror::Error;

use crate::domain::foundation::{SessionId, ValidationError};
use crate::ports::SessionStoreError;

/// Errors from handlers that read or update a stored session.
#[derive(Debug, Error)]
pub enum SessionCommandError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Session storage failed: {0}")]
    Storage(String),
}

impl From<SessionStoreError> for SessionCommandError {
    fn from(err: SessionStoreError) -> Self {
        match err {
            SessionStoreError::NotFound(id) => Self::NotFound(id),
            other => Self::Storage(other.to_string()),
        }
    }
}
