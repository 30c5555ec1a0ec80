//! File-based Session Store Adapter
//!
//! Stores each session context as a YAML file:
//! `{base_path}/{session_id}/session.yaml`.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::conversation::SessionContext;
use crate::domain::foundation::SessionId;
use crate::ports::{SessionStore, SessionStoreError};

/// File-based storage for session contexts
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    base_path: PathBuf,
}

impl FileSessionStore {
    /// Create a new file store rooted at `base_path`
    ///
    /// # Example
    /// ```ignore
    /// let store = FileSessionStore::new("./data/sessions");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn session_dir(&self, id: SessionId) -> PathBuf {
        self.base_path.join(id.to_string())
    }

    fn session_file_path(&self, id: SessionId) -> PathBuf {
        self.session_dir(id).join("session.yaml")
    }
}

fn io_error(e: std::io::Error) -> SessionStoreError {
    SessionStoreError::IoError(e.to_string())
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn save(&self, id: SessionId, ctx: &SessionContext) -> Result<(), SessionStoreError> {
        let dir = self.session_dir(id);
        fs::create_dir_all(&dir).await.map_err(io_error)?;

        let yaml = serde_yaml::to_string(ctx)
            .map_err(|e| SessionStoreError::SerializationFailed(e.to_string()))?;

        // Write to a temp file then rename so readers never see a partial file
        let file_path = self.session_file_path(id);
        let temp_path = dir.join("session.yaml.tmp");
        fs::write(&temp_path, yaml).await.map_err(io_error)?;
        fs::rename(&temp_path, &file_path).await.map_err(io_error)?;

        Ok(())
    }

    async fn load(&self, id: SessionId) -> Result<SessionContext, SessionStoreError> {
        let yaml = match fs::read_to_string(self.session_file_path(id)).await {
            Ok(yaml) => yaml,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SessionStoreError::NotFound(id))
            }
            Err(e) => return Err(io_error(e)),
        };

        serde_yaml::from_str(&yaml)
            .map_err(|e| SessionStoreError::DeserializationFailed(e.to_string()))
    }

    async fn exists(&self, id: SessionId) -> Result<bool, SessionStoreError> {
        fs::try_exists(self.session_file_path(id))
            .await
            .map_err(io_error)
    }

    async fn delete(&self, id: SessionId) -> Result<(), SessionStoreError> {
        match fs::remove_dir_all(self.session_dir(id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(e)),
        }
    }
}
