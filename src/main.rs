//! Nurse Ally HTTP server.

use std::sync::Arc;

use nurse_ally::adapters::{
    app_router, FileSessionStore, InMemorySessionStore, LocalFileStore, MockAIProvider,
    OpenAIConfig, OpenAIProvider, SessionApiHandlers,
};
use nurse_ally::application::TurnSettings;
use nurse_ally::config::{AiProviderKind, AppConfig, LogFormat, ServerConfig, SessionBackend};
use nurse_ally::domain::conversation::Orchestrator;
use nurse_ally::domain::triage::TriageKeywords;
use nurse_ally::ports::{AIProvider, FileStore, SessionStore};
use secrecy::ExposeSecret;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let keywords = match &config.triage.keywords_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading triage keyword tables");
            TriageKeywords::load(path).await?
        }
        None => TriageKeywords::default(),
    };
    let orchestrator = Arc::new(Orchestrator::new(&keywords));

    let ai_provider: Arc<dyn AIProvider> = match config.ai.provider {
        AiProviderKind::OpenAI => {
            let api_key = config
                .ai
                .openai_api_key
                .as_ref()
                .map(|key| key.expose_secret().clone())
                .ok_or("OpenAI provider selected without an API key")?;
            let provider = OpenAIProvider::new(
                OpenAIConfig::new(api_key)
                    .with_model(config.ai.model.clone())
                    .with_base_url(config.ai.base_url.clone())
                    .with_timeout(config.ai.timeout())
                    .with_max_retries(config.ai.max_retries),
            )?;
            Arc::new(provider)
        }
        AiProviderKind::Mock => {
            tracing::warn!("Using mock completion service; replies are canned");
            Arc::new(MockAIProvider::new())
        }
    };
    let provider_info = ai_provider.provider_info();
    tracing::info!(
        provider = %provider_info.name,
        model = %provider_info.model,
        "Completion service ready"
    );

    let session_store: Arc<dyn SessionStore> = match config.storage.session_backend {
        SessionBackend::Memory => Arc::new(InMemorySessionStore::new()),
        SessionBackend::File => {
            tracing::info!(dir = %config.storage.session_dir.display(), "Using file session store");
            Arc::new(FileSessionStore::new(&config.storage.session_dir))
        }
    };

    let file_store: Arc<dyn FileStore> = Arc::new(
        LocalFileStore::new(&config.storage.upload_dir)
            .with_max_bytes(config.storage.max_upload_bytes)
            .with_allowed_extensions(config.storage.extensions_list()),
    );

    let settings = TurnSettings {
        completion_timeout: config.ai.timeout(),
        temperature: config.ai.temperature,
        max_tokens: config.ai.max_tokens,
    };
    let handlers =
        SessionApiHandlers::from_ports(orchestrator, ai_provider, session_store, file_store, settings);
    let app = app_router(handlers, &config.server, config.storage.max_upload_bytes);

    let addr = config.server.socket_addr()?;
    tracing::info!(%addr, environment = ?config.server.environment, "Nurse Ally listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| server.log_level.clone().into());

    let (json, pretty) = match server.log_format {
        LogFormat::Json => (
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_span_list(false),
            ),
            None,
        ),
        LogFormat::Pretty => (None, Some(tracing_subscriber::fmt::layer())),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(pretty)
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
