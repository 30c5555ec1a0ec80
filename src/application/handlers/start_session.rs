//! StartSessionHandler - creates a fresh session context.

use std::sync::Arc;

use crate::domain::conversation::SessionContext;
use crate::domain::foundation::SessionId;
use crate::ports::SessionStore;

use super::error::SessionCommandError;

/// Handler for creating sessions.
pub struct StartSessionHandler {
    store: Arc<dyn SessionStore>,
}

impl StartSessionHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self) -> Result<SessionContext, SessionCommandError> {
        let ctx = SessionContext::new(SessionId::new());
        self.store.save(ctx.session_id(), &ctx).await?;
        tracing::info!(session_id = %ctx.session_id(), "Session started");
        Ok(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemorySessionStore;

    #[tokio::test]
    async fn creates_and_persists_empty_context() {
        let store = Arc::new(InMemorySessionStore::new());
        let handler = StartSessionHandler::new(store.clone());

        let ctx = handler.handle().await.unwrap();

        assert!(ctx.message_log().is_empty());
        assert_eq!(ctx.profile().language, "English");
        assert_eq!(store.load(ctx.session_id()).await.unwrap(), ctx);
    }
}
