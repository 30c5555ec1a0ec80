//! Per-session turn serialization.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::foundation::SessionId;

type LockTable = HashMap<SessionId, Arc<AsyncMutex<()>>>;

/// Hands out one async mutex per session.
///
/// Every read-modify-write of a session context happens while holding the
/// session's guard, so two requests for the same session never interleave
/// while requests for different sessions run in parallel. An entry lives
/// only while someone holds or waits for it.
#[derive(Debug, Default)]
pub struct SessionLocks {
    locks: Mutex<LockTable>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other holder works on `id`.
    pub async fn acquire(&self, id: SessionId) -> SessionGuard<'_> {
        let lock = {
            let mut locks = self.table();
            Arc::clone(locks.entry(id).or_default())
        };
        let guard = lock.lock_owned().await;
        SessionGuard {
            owner: self,
            id,
            guard: Some(guard),
        }
    }

    /// Number of sessions currently held or waited on.
    pub fn tracked(&self) -> usize {
        self.table().len()
    }

    fn table(&self) -> std::sync::MutexGuard<'_, LockTable> {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Removes the entry for `id` once nobody but the table refers to it.
    /// Clones are only taken under the table lock, so the count is stable here.
    fn release(&self, id: SessionId) {
        let mut locks = self.table();
        let idle = locks
            .get(&id)
            .map(|lock| Arc::strong_count(lock) == 1)
            .unwrap_or(false);
        if idle {
            locks.remove(&id);
        }
    }
}

/// Exclusive access to one session; dropping it releases the session.
#[derive(Debug)]
pub struct SessionGuard<'a> {
    owner: &'a SessionLocks,
    id: SessionId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        // The owned guard holds a clone of the entry; drop it before counting.
        self.guard.take();
        self.owner.release(self.id);
    }
}
