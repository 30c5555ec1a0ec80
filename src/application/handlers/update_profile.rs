//! UpdateProfileHandler - merges caller-supplied profile attributes.

use std::sync::Arc;

use crate::domain::conversation::{ProfileUpdate, SessionContext};
use crate::domain::foundation::SessionId;
use crate::ports::SessionStore;

use super::error::SessionCommandError;
use super::session_locks::SessionLocks;

/// Command to update profile attributes. Absent fields are left unchanged.
#[derive(Debug, Clone)]
pub struct UpdateProfileCommand {
    pub session_id: SessionId,
    pub update: ProfileUpdate,
}

pub struct UpdateProfileHandler {
    store: Arc<dyn SessionStore>,
    locks: Arc<SessionLocks>,
}

impl UpdateProfileHandler {
    pub fn new(store: Arc<dyn SessionStore>, locks: Arc<SessionLocks>) -> Self {
        Self { store, locks }
    }

    pub async fn handle(&self, cmd: UpdateProfileCommand) -> Result<SessionContext, SessionCommandError> {
        let _guard = self.locks.acquire(cmd.session_id).await;

        let mut ctx = self.store.load(cmd.session_id).await?;
        ctx.update_profile(cmd.update);
        self.store.save(cmd.session_id, &ctx).await?;

        tracing::debug!(session_id = %cmd.session_id, "Profile updated");
        Ok(ctx)
    }
}
