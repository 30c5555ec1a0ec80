//! File Store Port - Storage for uploaded insurance documents.
//!
//! The core only records that a document was provided, so the contract
//! is a single save operation returning a reference to the stored file.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Port for storing uploaded files.
///
/// # Contract
///
/// Implementations must:
/// - Reject files whose extension is not allowed
/// - Reject files larger than the configured maximum
/// - Write atomically (no partial content on failure)
/// - Compute a hex-encoded SHA-256 digest of the content
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Store `content` under a name derived from `suggested_name`.
    async fn save(&self, content: &[u8], suggested_name: &str) -> Result<StoredFile, FileStoreError>;
}

/// Reference to a stored file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Name supplied by the uploader.
    pub original_name: String,
    /// Name the file was stored under.
    pub stored_name: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Hex-encoded SHA-256 of the content.
    pub sha256: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Errors that can occur while storing a file.
#[derive(Debug, Clone, Error)]
pub enum FileStoreError {
    /// No usable file name was supplied.
    #[error("Missing file name")]
    MissingName,

    /// The file extension is not on the allow-list.
    #[error("File type not allowed: {extension}")]
    ExtensionNotAllowed { extension: String },

    /// File is too large.
    #[error("File too large: {size_bytes} bytes (max: {max_bytes})")]
    FileTooLarge { size_bytes: u64, max_bytes: u64 },

    /// IO error during file operation.
    #[error("IO error: {message}")]
    Io { message: String },
}

impl FileStoreError {
    pub fn extension_not_allowed(extension: impl Into<String>) -> Self {
        Self::ExtensionNotAllowed {
            extension: extension.into(),
        }
    }

    pub fn too_large(size_bytes: u64, max_bytes: u64) -> Self {
        Self::FileTooLarge {
            size_bytes,
            max_bytes,
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for FileStoreError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}
