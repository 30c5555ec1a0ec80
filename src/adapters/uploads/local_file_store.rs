//! Local Filesystem Upload Store - Implementation of FileStore.
//!
//! Stores uploaded insurance documents in a flat directory. Stored names
//! are `{YYYYmmddHHMMSS}_{uuid}_{sanitized original name}` so uploads never
//! collide.

use async_trait::async_trait;
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::ports::{FileStore, FileStoreError, StoredFile};

/// Default maximum upload size (16 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

/// Default allowed extensions.
pub const DEFAULT_ALLOWED_EXTENSIONS: [&str; 4] = ["pdf", "jpg", "jpeg", "png"];

/// Local filesystem storage for uploads.
///
/// # Atomic Writes
///
/// 1. Write content to `{stored_name}.tmp`
/// 2. Sync to disk
/// 3. Rename to `{stored_name}`
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    base_path: PathBuf,
    max_bytes: u64,
    allowed_extensions: Vec<String>,
}

impl LocalFileStore {
    /// Creates a store with the default size cap and extension allow-list.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }

    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn with_allowed_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allowed_extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        self
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Keeps ASCII alphanumerics, `.`, `-` and `_`; everything else becomes `_`.
    /// Directory components are dropped.
    fn sanitize_name(name: &str) -> String {
        let base = name.rsplit(|c| c == '/' || c == '\\').next().unwrap_or(name);
        let cleaned: String = base
            .trim()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        cleaned.trim_start_matches('.').to_string()
    }

    fn extension_of(name: &str) -> Option<String> {
        Path::new(name)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
    }

    fn compute_checksum(content: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content);
        format!("{:x}", hasher.finalize())
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn save(&self, content: &[u8], suggested_name: &str) -> Result<StoredFile, FileStoreError> {
        let safe_name = Self::sanitize_name(suggested_name);
        if safe_name.is_empty() {
            return Err(FileStoreError::MissingName);
        }

        let extension = Self::extension_of(&safe_name).unwrap_or_default();
        if !self.allowed_extensions.iter().any(|allowed| *allowed == extension) {
            return Err(FileStoreError::extension_not_allowed(extension));
        }

        let size = content.len() as u64;
        if size > self.max_bytes {
            return Err(FileStoreError::too_large(size, self.max_bytes));
        }

        fs::create_dir_all(&self.base_path).await.map_err(|e| {
            FileStoreError::io(format!(
                "Failed to create upload directory {}: {}",
                self.base_path.display(),
                e
            ))
        })?;

        let now = Utc::now();
        let stored_name = format!(
            "{}_{}_{}",
            now.format("%Y%m%d%H%M%S"),
            Uuid::new_v4().simple(),
            safe_name
        );
        let final_path = self.base_path.join(&stored_name);
        let temp_path = self.base_path.join(format!("{}.tmp", stored_name));

        let mut file = fs::File::create(&temp_path).await.map_err(|e| {
            FileStoreError::io(format!(
                "Failed to create temp file {}: {}",
                temp_path.display(),
                e
            ))
        })?;
        file.write_all(content).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&temp_path, &final_path).await.map_err(|e| {
            FileStoreError::io(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                final_path.display(),
                e
            ))
        })?;

        tracing::info!(stored_name = %stored_name, size_bytes = size, "Stored uploaded file");

        Ok(StoredFile {
            original_name: suggested_name.to_string(),
            stored_name,
            size_bytes: size,
            sha256: Self::compute_checksum(content),
            uploaded_at: now,
        })
    }
}
