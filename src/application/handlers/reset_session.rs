//! ResetSessionHandler - wipes a session back to its initial state.

use std::sync::Arc;

use crate::domain::conversation::SessionContext;
use crate::domain::foundation::SessionId;
use crate::ports::SessionStore;

use super::error::SessionCommandError;
use super::session_locks::SessionLocks;

/// Command to reset a session.
#[derive(Debug, Clone)]
pub struct ResetSessionCommand {
    pub session_id: SessionId,
}

/// Handler for resetting sessions.
///
/// The session keeps its id; progress, results, message log, profile and
/// insurance document are cleared.
pub struct ResetSessionHandler {
    store: Arc<dyn SessionStore>,
    locks: Arc<SessionLocks>,
}

impl ResetSessionHandler {
    pub fn new(store: Arc<dyn SessionStore>, locks: Arc<SessionLocks>) -> Self {
        Self { store, locks }
    }

    pub async fn handle(&self, cmd: ResetSessionCommand) -> Result<SessionContext, SessionCommandError> {
        let _guard = self.locks.acquire(cmd.session_id).await;

        let ctx = self.store.load(cmd.session_id).await?.reset();
        self.store.save(cmd.session_id, &ctx).await?;

        tracing::info!(session_id = %cmd.session_id, "Session reset");
        Ok(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemorySessionStore;
    use crate::domain::conversation::ProfileUpdate;
    use crate::domain::triage::{CareCategory, UrgencyTier};

    #[tokio::test]
    async fn reset_clears_everything_but_id() {
        let store = Arc::new(InMemorySessionStore::new());
        let id = SessionId::new();
        let mut ctx = SessionContext::new(id);
        ctx.record_triage(UrgencyTier::Mild, CareCategory::Pharmacy);
        ctx.record_exchange("headache", "Let's look at that.");
        ctx.update_profile(ProfileUpdate {
            city: Some("Paris".to_string()),
            ..Default::default()
        });
        store.save(id, &ctx).await.unwrap();

        let handler = ResetSessionHandler::new(store.clone(), Arc::new(SessionLocks::new()));
        let reset = handler.handle(ResetSessionCommand { session_id: id }).await.unwrap();

        assert_eq!(reset.session_id(), id);
        assert!(reset.message_log().is_empty());
        assert!(!reset.progress().symptoms_assessed);
        assert!(reset.urgency_tier().is_none());
        assert!(reset.profile().city().is_none());
        assert_eq!(store.load(id).await.unwrap(), reset);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let handler = ResetSessionHandler::new(
            Arc::new(InMemorySessionStore::new()),
            Arc::new(SessionLocks::new()),
        );
        let result = handler
            .handle(ResetSessionCommand {
                session_id: SessionId::new(),
            })
            .await;
        assert!(matches!(result, Err(SessionCommandError::NotFound(_))));
    }
}
