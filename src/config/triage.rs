//! Triage keyword configuration

use serde::Deserialize;
use std::path::PathBuf;

/// Triage configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TriageConfig {
    /// YAML file overriding the built-in keyword tables
    pub keywords_path: Option<PathBuf>,
}
