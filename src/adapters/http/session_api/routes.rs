//! HTTP routes for the session API.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use super::handlers::{
    create_session, get_session, reset_session, send_message, update_location, update_profile,
    upload_insurance_document, SessionApiHandlers,
};

/// Headroom above the file size cap for multipart framing.
const MULTIPART_OVERHEAD_BYTES: u64 = 64 * 1024;

/// Creates the session router with all endpoints.
///
/// `max_upload_bytes` caps the insurance document route's request body.
pub fn session_routes(handlers: SessionApiHandlers, max_upload_bytes: u64) -> Router {
    let body_limit = usize::try_from(max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES))
        .unwrap_or(usize::MAX);

    Router::new()
        .route("/", post(create_session))
        .route("/:session_id", get(get_session))
        .route("/:session_id/messages", post(send_message))
        .route("/:session_id/reset", post(reset_session))
        .route("/:session_id/profile", put(update_profile))
        .route("/:session_id/location", put(update_location))
        .route(
            "/:session_id/insurance-document",
            post(upload_insurance_document).layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(handlers)
}
