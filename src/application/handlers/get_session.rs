//! GetSessionHandler - query handler for a session snapshot.

use std::sync::Arc;

use crate::domain::conversation::SessionContext;
use crate::domain::foundation::SessionId;
use crate::ports::SessionStore;

use super::error::SessionCommandError;

/// Query for a stored session.
#[derive(Debug, Clone)]
pub struct GetSessionQuery {
    pub session_id: SessionId,
}

pub struct GetSessionHandler {
    store: Arc<dyn SessionStore>,
}

impl GetSessionHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: GetSessionQuery) -> Result<SessionContext, SessionCommandError> {
        Ok(self.store.load(query.session_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemorySessionStore;

    #[tokio::test]
    async fn returns_stored_context() {
        let store = Arc::new(InMemorySessionStore::new());
        let ctx = SessionContext::new(SessionId::new());
        store.save(ctx.session_id(), &ctx).await.unwrap();

        let handler = GetSessionHandler::new(store);
        let found = handler
            .handle(GetSessionQuery {
                session_id: ctx.session_id(),
            })
            .await
            .unwrap();
        assert_eq!(found, ctx);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let handler = GetSessionHandler::new(Arc::new(InMemorySessionStore::new()));
        let result = handler
            .handle(GetSessionQuery {
                session_id: SessionId::new(),
            })
            .await;
        assert!(matches!(result, Err(SessionCommandError::NotFound(_))));
    }
}
