//! Request and response bodies for the session API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::TurnOutcome;
use crate::domain::conversation::{
    InsuranceDocument, LoggedMessage, ProgressFlags, SessionContext, TurnArtifacts, UserProfile,
};
use crate::domain::triage::{CareCategory, CoverageVerdict, FacilityRecord, UrgencyTier};

// ════════════════════════════════════════════════════════════════════════════
// Requests
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateLocationRequest {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Responses
// ════════════════════════════════════════════════════════════════════════════

/// Step results shared by turn and snapshot responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtifactsPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgency: Option<UrgencyTier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub care_category: Option<CareCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insurance_coverage: Option<CoverageVerdict>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_link: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub facilities: Vec<FacilityRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub checklist: Vec<String>,
}

impl From<TurnArtifacts> for ArtifactsPayload {
    fn from(artifacts: TurnArtifacts) -> Self {
        Self {
            urgency: artifacts.urgency,
            care_category: artifacts.care_category,
            insurance_coverage: artifacts.insurance_coverage,
            map_link: artifacts.map_link,
            facilities: artifacts.facilities,
            checklist: artifacts.checklist,
        }
    }
}

/// Response to a user message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnResponse {
    pub session_id: String,
    pub reply: String,
    pub emergency: bool,
    pub progress: ProgressFlags,
    #[serde(flatten)]
    pub artifacts: ArtifactsPayload,
}

impl From<TurnOutcome> for TurnResponse {
    fn from(outcome: TurnOutcome) -> Self {
        Self {
            session_id: outcome.context.session_id().to_string(),
            reply: outcome.reply,
            emergency: outcome.emergency,
            progress: outcome.context.progress(),
            artifacts: outcome.artifacts.into(),
        }
    }
}

/// Full session snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub progress: ProgressFlags,
    #[serde(flatten)]
    pub artifacts: ArtifactsPayload,
    pub profile: UserProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insurance_document: Option<InsuranceDocument>,
    pub messages: Vec<LoggedMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&SessionContext> for SessionResponse {
    fn from(ctx: &SessionContext) -> Self {
        Self {
            session_id: ctx.session_id().to_string(),
            progress: ctx.progress(),
            artifacts: TurnArtifacts::from_context(ctx).into(),
            profile: ctx.profile().clone(),
            insurance_document: ctx.insurance_document().cloned(),
            messages: ctx.message_log().to_vec(),
            created_at: ctx.created_at(),
            updated_at: ctx.updated_at(),
        }
    }
}

/// Error body returned by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self::new("NOT_FOUND", format!("{} not found: {}", resource_type, id))
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::new("PAYLOAD_TOO_LARGE", message)
    }

    pub fn unsupported_media_type(message: impl Into<String>) -> Self {
        Self::new("UNSUPPORTED_MEDIA_TYPE", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SessionId;

    #[test]
    fn location_request_city_is_optional() {
        let req: UpdateLocationRequest =
            serde_json::from_str(r#"{"latitude": 48.85, "longitude": 2.35}"#).unwrap();
        assert!(req.city.is_none());
        assert!(req.country.is_none());
    }

    #[test]
    fn empty_artifacts_are_omitted() {
        let ctx = SessionContext::new(SessionId::new());
        let json = serde_json::to_value(SessionResponse::from(&ctx)).unwrap();
        assert!(json.get("map_link").is_none());
        assert!(json.get("facilities").is_none());
        assert!(json.get("insurance_coverage").is_none());
        assert_eq!(json["progress"]["symptoms_assessed"], false);
        assert_eq!(json["profile"]["language"], "English");
    }

    #[test]
    fn artifacts_are_flattened_into_snapshot() {
        let mut ctx = SessionContext::new(SessionId::new());
        ctx.record_triage(UrgencyTier::Severe, CareCategory::Hospital);
        let json = serde_json::to_value(SessionResponse::from(&ctx)).unwrap();
        assert_eq!(json["urgency"], "severe");
        assert_eq!(json["care_category"], "hospital");
    }

    #[test]
    fn error_response_codes() {
        assert_eq!(ErrorResponse::bad_request("x").code, "BAD_REQUEST");
        assert_eq!(ErrorResponse::payload_too_large("x").code, "PAYLOAD_TOO_LARGE");
        assert_eq!(
            ErrorResponse::unsupported_media_type("x").code,
            "UNSUPPORTED_MEDIA_TYPE"
        );
        let not_found = ErrorResponse::not_found("Session", "abc-123");
        assert_eq!(not_found.code, "NOT_FOUND");
        assert!(not_found.message.contains("abc-123"));
    }
}
