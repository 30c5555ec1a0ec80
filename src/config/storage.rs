//! Session and upload storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Where session contexts live
    #[serde(default)]
    pub session_backend: SessionBackend,

    /// Root directory for the file session backend
    #[serde(default = "default_session_dir")]
    pub session_dir: PathBuf,

    /// Root directory for uploaded insurance documents
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    /// Maximum accepted upload size in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,

    /// Allowed upload extensions (comma-separated)
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: String,
}

/// Session store backend
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    #[default]
    Memory,
    File,
}

impl StorageConfig {
    /// Allowed extensions, lowercased and without leading dots
    pub fn extensions_list(&self) -> Vec<String> {
        self.allowed_extensions
            .split(',')
            .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect()
    }

    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_upload_bytes == 0 {
            return Err(ValidationError::InvalidUploadSize);
        }
        if self.extensions_list().is_empty() {
            return Err(ValidationError::NoAllowedExtensions);
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            session_backend: SessionBackend::default(),
            session_dir: default_session_dir(),
            upload_dir: default_upload_dir(),
            max_upload_bytes: default_max_upload_bytes(),
            allowed_extensions: default_allowed_extensions(),
        }
    }
}

fn default_session_dir() -> PathBuf {
    PathBuf::from("data/sessions")
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("data/uploads")
}

fn default_max_upload_bytes() -> u64 {
    16 * 1024 * 1024
}

fn default_allowed_extensions() -> String {
    "pdf,jpg,jpeg,png".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_defaults() {
        let config = StorageConfig::default();
        assert_eq!(config.session_backend, SessionBackend::Memory);
        assert_eq!(config.max_upload_bytes, 16 * 1024 * 1024);
        assert_eq!(config.extensions_list(), vec!["pdf", "jpg", "jpeg", "png"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_extensions_are_normalized() {
        let config = StorageConfig {
            allowed_extensions: " .PDF, Png ,,".to_string(),
            ..Default::default()
        };
        assert_eq!(config.extensions_list(), vec!["pdf", "png"]);
    }

    #[test]
    fn test_rejects_zero_upload_size() {
        let config = StorageConfig {
            max_upload_bytes: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidUploadSize));
    }

    #[test]
    fn test_rejects_empty_extension_list() {
        let config = StorageConfig {
            allowed_extensions: " , ".to_string(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::NoAllowedExtensions));
    }
}
