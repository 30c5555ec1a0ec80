//! Application configuration module
//!
//! Configuration is loaded from environment variables using the `config` and
//! `dotenvy` crates. Variables carry the `NURSE_ALLY` prefix and nested values
//! are separated with a double underscore.
//!
//! # Example
//!
//! ```no_run
//! use nurse_ally::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr().unwrap());
//! ```

mod ai;
mod error;
mod server;
mod storage;
mod triage;

pub use ai::{AiConfig, AiProviderKind};
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, LogFormat, ServerConfig};
pub use storage::{SessionBackend, StorageConfig};
pub use triage::TriageConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a runnable
/// development setup backed by the mock AI provider and in-memory sessions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// AI provider configuration
    #[serde(default)]
    pub ai: AiConfig,

    /// Session and upload storage
    #[serde(default)]
    pub storage: StorageConfig,

    /// Triage keyword overrides
    #[serde(default)]
    pub triage: TriageConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads `.env` if present, then reads variables such as
    /// `NURSE_ALLY__SERVER__PORT=8080` (`server.port = 8080`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("NURSE_ALLY")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid, or the
    /// LLM timeout would not fit inside the HTTP request timeout.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        self.storage.validate()?;
        if self.ai.timeout_secs >= self.server.request_timeout_secs {
            return Err(ValidationError::AiTimeoutExceedsRequestTimeout {
                ai_secs: self.ai.timeout_secs,
                request_secs: self.server.request_timeout_secs,
            });
        }
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::path::PathBuf;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "NURSE_ALLY__SERVER__PORT",
        "NURSE_ALLY__SERVER__ENVIRONMENT",
        "NURSE_ALLY__SERVER__LOG_FORMAT",
        "NURSE_ALLY__SERVER__REQUEST_TIMEOUT_SECS",
        "NURSE_ALLY__AI__PROVIDER",
        "NURSE_ALLY__AI__OPENAI_API_KEY",
        "NURSE_ALLY__AI__TIMEOUT_SECS",
        "NURSE_ALLY__STORAGE__SESSION_BACKEND",
        "NURSE_ALLY__STORAGE__SESSION_DIR",
        "NURSE_ALLY__TRIAGE__KEYWORDS_PATH",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_with_empty_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.ai.provider, AiProviderKind::Mock);
        assert_eq!(config.storage.session_backend, SessionBackend::Memory);
        assert!(config.triage.keywords_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_nested_values() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("NURSE_ALLY__SERVER__PORT", "3000");
        env::set_var("NURSE_ALLY__SERVER__LOG_FORMAT", "json");
        env::set_var("NURSE_ALLY__AI__PROVIDER", "openai");
        env::set_var("NURSE_ALLY__AI__OPENAI_API_KEY", "sk-test");
        env::set_var("NURSE_ALLY__STORAGE__SESSION_BACKEND", "file");
        env::set_var("NURSE_ALLY__STORAGE__SESSION_DIR", "/tmp/nurse-ally");
        env::set_var("NURSE_ALLY__TRIAGE__KEYWORDS_PATH", "keywords.yaml");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.log_format, LogFormat::Json);
        assert_eq!(config.ai.provider, AiProviderKind::OpenAI);
        assert!(config.ai.has_openai());
        assert_eq!(config.storage.session_backend, SessionBackend::File);
        assert_eq!(config.storage.session_dir, PathBuf::from("/tmp/nurse-ally"));
        assert_eq!(
            config.triage.keywords_path,
            Some(PathBuf::from("keywords.yaml"))
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("NURSE_ALLY__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        assert!(result.unwrap().is_production());
    }

    #[test]
    fn test_openai_without_key_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("NURSE_ALLY__AI__PROVIDER", "openai");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired(_))
        ));
    }

    #[test]
    fn test_ai_timeout_must_fit_request_timeout() {
        let mut config = AppConfig::default();
        config.ai.timeout_secs = 60;
        config.server.request_timeout_secs = 60;
        assert_eq!(
            config.validate(),
            Err(ValidationError::AiTimeoutExceedsRequestTimeout {
                ai_secs: 60,
                request_secs: 60,
            })
        );
    }
}
