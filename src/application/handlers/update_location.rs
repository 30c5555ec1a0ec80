//! UpdateLocationHandler - records the user's coordinates and place.

use std::sync::Arc;

use crate::domain::conversation::{Location, SessionContext};
use crate::domain::foundation::SessionId;
use crate::ports::SessionStore;

use super::error::SessionCommandError;
use super::session_locks::SessionLocks;

/// Command to update the user's location.
#[derive(Debug, Clone)]
pub struct UpdateLocationCommand {
    pub session_id: SessionId,
    pub latitude: f64,
    pub longitude: f64,
    pub city: Option<String>,
    pub country: Option<String>,
}

pub struct UpdateLocationHandler {
    store: Arc<dyn SessionStore>,
    locks: Arc<SessionLocks>,
}

impl UpdateLocationHandler {
    pub fn new(store: Arc<dyn SessionStore>, locks: Arc<SessionLocks>) -> Self {
        Self { store, locks }
    }

    pub async fn handle(&self, cmd: UpdateLocationCommand) -> Result<SessionContext, SessionCommandError> {
        let location = Location::new(cmd.latitude, cmd.longitude)?;

        let _guard = self.locks.acquire(cmd.session_id).await;
        let mut ctx = self.store.load(cmd.session_id).await?;
        ctx.update_location(location, cmd.city, cmd.country);
        self.store.save(cmd.session_id, &ctx).await?;

        tracing::debug!(
            session_id = %cmd.session_id,
            city = ctx.profile().city().unwrap_or(""),
            "Location updated"
        );
        Ok(ctx)
    }
}
