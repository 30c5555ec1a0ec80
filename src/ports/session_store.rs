//! Session Store Port - Interface for persisting session contexts.
//!
//! Read-modify-write per turn. Concurrent turns for one session are
//! serialized by the caller, so last write wins.

use async_trait::async_trait;

use crate::domain::conversation::SessionContext;
use crate::domain::foundation::SessionId;

/// Errors that can occur during session storage operations
#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),

    #[error("Failed to serialize session: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize session: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Port for persisting and loading session contexts
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Save a session context, replacing any previous version
    async fn save(&self, id: SessionId, ctx: &SessionContext) -> Result<(), SessionStoreError>;

    /// Load a session context
    ///
    /// # Errors
    /// Returns `SessionStoreError::NotFound` if no session exists
    async fn load(&self, id: SessionId) -> Result<SessionContext, SessionStoreError>;

    /// Check if a session exists
    async fn exists(&self, id: SessionId) -> Result<bool, SessionStoreError>;

    /// Delete a session
    async fn delete(&self, id: SessionId) -> Result<(), SessionStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_session() {
        let id = SessionId::new();
        let err = SessionStoreError::NotFound(id);
        assert_eq!(err.to_string(), format!("Session not found: {}", id));
    }

    #[test]
    fn serialization_error_message() {
        let err = SessionStoreError::SerializationFailed("bad yaml".to_string());
        assert!(err.to_string().contains("serialize"));
    }
}
