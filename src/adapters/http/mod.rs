//! HTTP adapters - REST API implementations.

pub mod session_api;

use axum::{http::HeaderValue, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;

pub use session_api::{session_routes, ErrorResponse, SessionApiHandlers};

/// Builds the full application router with its middleware stack.
pub fn app_router(
    handlers: SessionApiHandlers,
    server: &ServerConfig,
    max_upload_bytes: u64,
) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/sessions", session_routes(handlers, max_upload_bytes))
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(cors_layer(server))
        .layer(TraceLayer::new_for_http())
}

async fn health() -> &'static str {
    "ok"
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}
