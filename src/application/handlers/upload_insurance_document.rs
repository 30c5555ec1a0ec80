//! UploadInsuranceDocumentHandler - stores an insurance document and links
//! it to the session.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::conversation::{InsuranceDocument, SessionContext};
use crate::domain::foundation::SessionId;
use crate::ports::{FileStore, FileStoreError, SessionStore, SessionStoreError, StoredFile};

use super::session_locks::SessionLocks;

/// Command carrying the uploaded bytes.
#[derive(Debug, Clone)]
pub struct UploadInsuranceDocumentCommand {
    pub session_id: SessionId,
    pub file_name: String,
    pub content: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum UploadInsuranceDocumentError {
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("Upload rejected: {0}")]
    Rejected(#[from] FileStoreError),

    #[error("Session storage failed: {0}")]
    Storage(String),
}

impl From<SessionStoreError> for UploadInsuranceDocumentError {
    fn from(err: SessionStoreError) -> Self {
        match err {
            SessionStoreError::NotFound(id) => Self::SessionNotFound(id),
            other => Self::Storage(other.to_string()),
        }
    }
}

impl From<StoredFile> for InsuranceDocument {
    fn from(file: StoredFile) -> Self {
        Self {
            original_name: file.original_name,
            stored_name: file.stored_name,
            size_bytes: file.size_bytes,
            sha256: file.sha256,
            uploaded_at: file.uploaded_at,
        }
    }
}

pub struct UploadInsuranceDocumentHandler {
    store: Arc<dyn SessionStore>,
    files: Arc<dyn FileStore>,
    locks: Arc<SessionLocks>,
}

impl UploadInsuranceDocumentHandler {
    pub fn new(
        store: Arc<dyn SessionStore>,
        files: Arc<dyn FileStore>,
        locks: Arc<SessionLocks>,
    ) -> Self {
        Self { store, files, locks }
    }

    /// Stores the file, then records the reference in the session.
    ///
    /// The session is loaded first so nothing is written for an unknown session.
    pub async fn handle(
        &self,
        cmd: UploadInsuranceDocumentCommand,
    ) -> Result<SessionContext, UploadInsuranceDocumentError> {
        let _guard = self.locks.acquire(cmd.session_id).await;
        let mut ctx = self.store.load(cmd.session_id).await?;

        let stored = self.files.save(&cmd.content, &cmd.file_name).await?;
        tracing::info!(
            session_id = %cmd.session_id,
            stored_name = %stored.stored_name,
            size_bytes = stored.size_bytes,
            "Insurance document attached"
        );

        ctx.attach_insurance_document(stored.into());
        self.store.save(cmd.session_id, &ctx).await?;
        Ok(ctx)
    }
}
