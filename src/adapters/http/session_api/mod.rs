//! HTTP adapter for session endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ArtifactsPayload, ErrorResponse, SendMessageRequest, SessionResponse, TurnResponse,
    UpdateLocationRequest,
};
pub use handlers::SessionApiHandlers;
pub use routes::session_routes;
