//! HTTP handlers for the session API.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::{
    GetSessionHandler, GetSessionQuery, ProcessTurnCommand, ProcessTurnError, ProcessTurnHandler,
    ResetSessionCommand, ResetSessionHandler, SessionCommandError, SessionLocks,
    StartSessionHandler, TurnSettings, UpdateLocationCommand, UpdateLocationHandler,
    UpdateProfileCommand, UpdateProfileHandler, UploadInsuranceDocumentCommand,
    UploadInsuranceDocumentError, UploadInsuranceDocumentHandler,
};
use crate::domain::conversation::{Orchestrator, ProfileUpdate};
use crate::domain::foundation::SessionId;
use crate::ports::{AIProvider, FileStore, FileStoreError, SessionStore};

use super::dto::{
    ErrorResponse, SendMessageRequest, SessionResponse, TurnResponse, UpdateLocationRequest,
};

/// Multipart field carrying the insurance document.
const UPLOAD_FIELD: &str = "file";

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct SessionApiHandlers {
    start_handler: Arc<StartSessionHandler>,
    get_handler: Arc<GetSessionHandler>,
    turn_handler: Arc<ProcessTurnHandler>,
    reset_handler: Arc<ResetSessionHandler>,
    profile_handler: Arc<UpdateProfileHandler>,
    location_handler: Arc<UpdateLocationHandler>,
    upload_handler: Arc<UploadInsuranceDocumentHandler>,
}

impl SessionApiHandlers {
    /// Builds every handler over one set of ports and one lock table.
    pub fn from_ports(
        orchestrator: Arc<Orchestrator>,
        ai_provider: Arc<dyn AIProvider>,
        store: Arc<dyn SessionStore>,
        files: Arc<dyn FileStore>,
        settings: TurnSettings,
    ) -> Self {
        let locks = Arc::new(SessionLocks::new());
        Self {
            start_handler: Arc::new(StartSessionHandler::new(store.clone())),
            get_handler: Arc::new(GetSessionHandler::new(store.clone())),
            turn_handler: Arc::new(
                ProcessTurnHandler::new(orchestrator, ai_provider, store.clone(), locks.clone())
                    .with_settings(settings),
            ),
            reset_handler: Arc::new(ResetSessionHandler::new(store.clone(), locks.clone())),
            profile_handler: Arc::new(UpdateProfileHandler::new(store.clone(), locks.clone())),
            location_handler: Arc::new(UpdateLocationHandler::new(store.clone(), locks.clone())),
            upload_handler: Arc::new(UploadInsuranceDocumentHandler::new(store, files, locks)),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/sessions - Start a new session
pub async fn create_session(State(handlers): State<SessionApiHandlers>) -> Response {
    match handlers.start_handler.handle().await {
        Ok(ctx) => (StatusCode::CREATED, Json(SessionResponse::from(&ctx))).into_response(),
        Err(e) => handle_session_error(e),
    }
}

/// GET /api/sessions/:session_id - Session snapshot
pub async fn get_session(
    State(handlers): State<SessionApiHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers.get_handler.handle(GetSessionQuery { session_id }).await {
        Ok(ctx) => (StatusCode::OK, Json(SessionResponse::from(&ctx))).into_response(),
        Err(e) => handle_session_error(e),
    }
}

/// POST /api/sessions/:session_id/messages - Run one conversation turn
pub async fn send_message(
    State(handlers): State<SessionApiHandlers>,
    Path(session_id): Path<String>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection(rejection),
    };

    let message = req.message.trim();
    if message.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Message cannot be empty")),
        )
            .into_response();
    }

    match handlers
        .turn_handler
        .handle(ProcessTurnCommand::new(session_id, message))
        .await
    {
        Ok(outcome) => (StatusCode::OK, Json(TurnResponse::from(outcome))).into_response(),
        Err(e) => handle_turn_error(e),
    }
}

/// POST /api/sessions/:session_id/reset - Clear the session
pub async fn reset_session(
    State(handlers): State<SessionApiHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers
        .reset_handler
        .handle(ResetSessionCommand { session_id })
        .await
    {
        Ok(ctx) => (StatusCode::OK, Json(SessionResponse::from(&ctx))).into_response(),
        Err(e) => handle_session_error(e),
    }
}

/// PUT /api/sessions/:session_id/profile - Merge profile attributes
pub async fn update_profile(
    State(handlers): State<SessionApiHandlers>,
    Path(session_id): Path<String>,
    payload: Result<Json<ProfileUpdate>, JsonRejection>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let update = match payload {
        Ok(Json(update)) => update,
        Err(rejection) => return json_rejection(rejection),
    };

    match handlers
        .profile_handler
        .handle(UpdateProfileCommand { session_id, update })
        .await
    {
        Ok(ctx) => (StatusCode::OK, Json(SessionResponse::from(&ctx))).into_response(),
        Err(e) => handle_session_error(e),
    }
}

/// PUT /api/sessions/:session_id/location - Record coordinates and place
pub async fn update_location(
    State(handlers): State<SessionApiHandlers>,
    Path(session_id): Path<String>,
    payload: Result<Json<UpdateLocationRequest>, JsonRejection>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection(rejection),
    };

    let cmd = UpdateLocationCommand {
        session_id,
        latitude: req.latitude,
        longitude: req.longitude,
        city: req.city,
        country: req.country,
    };

    match handlers.location_handler.handle(cmd).await {
        Ok(ctx) => (StatusCode::OK, Json(SessionResponse::from(&ctx))).into_response(),
        Err(e) => handle_session_error(e),
    }
}

/// POST /api/sessions/:session_id/insurance-document - Upload a document
pub async fn upload_insurance_document(
    State(handlers): State<SessionApiHandlers>,
    Path(session_id): Path<String>,
    mut multipart: Multipart,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let mut upload: Option<(String, Vec<u8>)> = None;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return multipart_error(e.status(), e.body_text()),
        };
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        match field.bytes().await {
            Ok(bytes) => upload = Some((file_name, bytes.to_vec())),
            Err(e) => return multipart_error(e.status(), e.body_text()),
        }
    }

    let Some((file_name, content)) = upload else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(format!(
                "Missing multipart field '{}'",
                UPLOAD_FIELD
            ))),
        )
            .into_response();
    };

    let cmd = UploadInsuranceDocumentCommand {
        session_id,
        file_name,
        content,
    };

    match handlers.upload_handler.handle(cmd).await {
        Ok(ctx) => (StatusCode::CREATED, Json(SessionResponse::from(&ctx))).into_response(),
        Err(e) => handle_upload_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn parse_session_id(raw: &str) -> Result<SessionId, Response> {
    raw.parse::<SessionId>().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Invalid session ID")),
        )
            .into_response()
    })
}

fn json_rejection(rejection: JsonRejection) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::bad_request(rejection.body_text())),
    )
        .into_response()
}

fn multipart_error(status: StatusCode, message: String) -> Response {
    let body = if status == StatusCode::PAYLOAD_TOO_LARGE {
        ErrorResponse::payload_too_large(message)
    } else {
        ErrorResponse::bad_request(message)
    };
    tracing::warn!(status = %status, "Failed to read multipart upload");
    (status, Json(body)).into_response()
}

fn not_found(id: SessionId) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::not_found("Session", &id.to_string())),
    )
        .into_response()
}

fn internal(message: String) -> Response {
    tracing::error!(error = %message, "Request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::internal(message)),
    )
        .into_response()
}

fn handle_session_error(error: SessionCommandError) -> Response {
    match error {
        SessionCommandError::NotFound(id) => not_found(id),
        SessionCommandError::Validation(e) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(e.to_string())),
        )
            .into_response(),
        SessionCommandError::Storage(msg) => internal(msg),
    }
}

fn handle_turn_error(error: ProcessTurnError) -> Response {
    match error {
        ProcessTurnError::SessionNotFound(id) => not_found(id),
        ProcessTurnError::Storage(msg) => internal(msg),
    }
}

fn handle_upload_error(error: UploadInsuranceDocumentError) -> Response {
    match error {
        UploadInsuranceDocumentError::SessionNotFound(id) => not_found(id),
        UploadInsuranceDocumentError::Rejected(e) => match e {
            FileStoreError::MissingName => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request(e.to_string())),
            )
                .into_response(),
            FileStoreError::ExtensionNotAllowed { .. } => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                Json(ErrorResponse::unsupported_media_type(e.to_string())),
            )
                .into_response(),
            FileStoreError::FileTooLarge { .. } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(ErrorResponse::payload_too_large(e.to_string())),
            )
                .into_response(),
            FileStoreError::Io { message } => internal(message),
        },
        UploadInsuranceDocumentError::Storage(msg) => internal(msg),
    }
}
