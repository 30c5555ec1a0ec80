//! In-memory Session Store Adapter
//!
//! Keeps session contexts in a HashMap. Contents are lost on restart.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::conversation::SessionContext;
use crate::domain::foundation::SessionId;
use crate::ports::{SessionStore, SessionStoreError};

/// In-memory storage for session contexts
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, SessionContext>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Remove all sessions
    pub async fn clear(&self) {
        self.sessions.write().await.clear();
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn save(&self, id: SessionId, ctx: &SessionContext) -> Result<(), SessionStoreError> {
        self.sessions.write().await.insert(id, ctx.clone());
        Ok(())
    }

    async fn load(&self, id: SessionId) -> Result<SessionContext, SessionStoreError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(SessionStoreError::NotFound(id))
    }

    async fn exists(&self, id: SessionId) -> Result<bool, SessionStoreError> {
        Ok(self.sessions.read().await.contains_key(&id))
    }

    async fn delete(&self, id: SessionId) -> Result<(), SessionStoreError> {
        self.sessions.write().await.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::triage::{CareCategory, UrgencyTier};

    #[tokio::test]
    async fn save_and_load() {
        let store = InMemorySessionStore::new();
        let id = SessionId::new();
        let mut ctx = SessionContext::new(id);
        ctx.record_triage(UrgencyTier::Mild, CareCategory::Pharmacy);

        store.save(id, &ctx).await.unwrap();
        let loaded = store.load(id).await.unwrap();

        assert_eq!(loaded, ctx);
    }

    #[tokio::test]
    async fn load_missing_is_not_found() {
        let store = InMemorySessionStore::new();
        let id = SessionId::new();

        let result = store.load(id).await;

        assert!(matches!(result, Err(SessionStoreError::NotFound(missing)) if missing == id));
    }

    #[tokio::test]
    async fn exists_and_delete() {
        let store = InMemorySessionStore::new();
        let id = SessionId::new();
        store.save(id, &SessionContext::new(id)).await.unwrap();

        assert!(store.exists(id).await.unwrap());
        store.delete(id).await.unwrap();
        assert!(!store.exists(id).await.unwrap());
        assert_eq!(store.session_count().await, 0);
    }

    #[tokio::test]
    async fn sessions_are_independent() {
        let store = InMemorySessionStore::new();
        let a = SessionId::new();
        let b = SessionId::new();
        let mut ctx_a = SessionContext::new(a);
        ctx_a.mark_emergency();

        store.save(a, &ctx_a).await.unwrap();
        store.save(b, &SessionContext::new(b)).await.unwrap();

        assert!(store.load(a).await.unwrap().progress().emergency_detected);
        assert!(!store.load(b).await.unwrap().progress().emergency_detected);

        store.clear().await;
        assert_eq!(store.session_count().await, 0);
    }
}
