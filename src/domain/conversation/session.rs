//! Session context - the full mutable state of one user's conversation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::SessionId;
use crate::domain::triage::{
    CareCategory, CoverageVerdict, FacilityRecord, FacilitySearch, UrgencyTier,
};

use super::profile::{InsuranceDocument, Location, ProfileUpdate, UserProfile};

/// Who said a logged message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

/// One entry in the message log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedMessage {
    pub speaker: Speaker,
    pub text: String,
    pub at: DateTime<Utc>,
}

impl LoggedMessage {
    fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
            at: Utc::now(),
        }
    }
}

/// Completion markers for each orchestration stage.
///
/// Flags only move from false to true. The only way back is a reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressFlags {
    pub symptoms_assessed: bool,
    pub insurance_checked: bool,
    pub facilities_recommended: bool,
    pub emergency_detected: bool,
}

impl ProgressFlags {
    /// True once triage, coverage and facility steps have all run.
    pub fn all_steps_complete(&self) -> bool {
        self.symptoms_assessed && self.insurance_checked && self.facilities_recommended
    }
}

/// Per-session state threaded through every turn.
///
/// Each `record_*` method sets a progress flag together with the data it
/// guards, so a flag is never observed without its data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    session_id: SessionId,
    message_log: Vec<LoggedMessage>,
    progress: ProgressFlags,
    urgency_tier: Option<UrgencyTier>,
    care_category: Option<CareCategory>,
    coverage: Option<CoverageVerdict>,
    facilities: Vec<FacilityRecord>,
    map_link: Option<String>,
    checklist: Vec<String>,
    profile: UserProfile,
    insurance_document: Option<InsuranceDocument>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SessionContext {
    /// Creates an empty context for a session.
    pub fn new(session_id: SessionId) -> Self {
        let now = Utc::now();
        Self {
            session_id,
            message_log: Vec::new(),
            progress: ProgressFlags::default(),
            urgency_tier: None,
            care_category: None,
            coverage: None,
            facilities: Vec::new(),
            map_link: None,
            checklist: Vec::new(),
            profile: UserProfile::default(),
            insurance_document: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns a fresh context for the same session.
    pub fn reset(&self) -> Self {
        Self::new(self.session_id)
    }

    // === Accessors ===

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn message_log(&self) -> &[LoggedMessage] {
        &self.message_log
    }

    pub fn progress(&self) -> ProgressFlags {
        self.progress
    }

    pub fn urgency_tier(&self) -> Option<UrgencyTier> {
        self.urgency_tier
    }

    pub fn care_category(&self) -> Option<CareCategory> {
        self.care_category
    }

    pub fn coverage(&self) -> Option<&CoverageVerdict> {
        self.coverage.as_ref()
    }

    pub fn facilities(&self) -> &[FacilityRecord] {
        &self.facilities
    }

    pub fn map_link(&self) -> Option<&str> {
        self.map_link.as_deref()
    }

    pub fn checklist(&self) -> &[String] {
        &self.checklist
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn insurance_document(&self) -> Option<&InsuranceDocument> {
        self.insurance_document.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// The most recent `n` log entries, oldest first.
    pub fn recent_messages(&self, n: usize) -> &[LoggedMessage] {
        let start = self.message_log.len().saturating_sub(n);
        &self.message_log[start..]
    }

    // === Step results ===

    pub fn record_triage(&mut self, urgency: UrgencyTier, care: CareCategory) {
        self.urgency_tier = Some(urgency);
        self.care_category = Some(care);
        self.progress.symptoms_assessed = true;
        self.touch();
    }

    pub fn record_coverage(&mut self, verdict: CoverageVerdict) {
        self.coverage = Some(verdict);
        self.progress.insurance_checked = true;
        self.touch();
    }

    /// Replaces any previous facility results.
    pub fn record_facilities(&mut self, search: FacilitySearch) {
        self.map_link = search.map_link;
        self.facilities = search.facilities;
        self.progress.facilities_recommended = true;
        self.touch();
    }

    pub fn record_checklist(&mut self, items: Vec<String>) {
        self.checklist = items;
        self.touch();
    }

    pub fn mark_emergency(&mut self) {
        self.progress.emergency_detected = true;
        self.touch();
    }

    /// Appends one user/assistant exchange to the log.
    pub fn record_exchange(&mut self, user_text: &str, reply: &str) {
        self.message_log.push(LoggedMessage::new(Speaker::User, user_text));
        self.message_log.push(LoggedMessage::new(Speaker::Assistant, reply));
        self.touch();
    }

    // === Caller-supplied data ===

    pub fn update_profile(&mut self, update: ProfileUpdate) {
        self.profile.apply(update);
        self.touch();
    }

    pub fn update_location(&mut self, location: Location, city: Option<String>, country: Option<String>) {
        self.profile.set_location(location, city, country);
        self.touch();
    }

    pub fn attach_insurance_document(&mut self, document: InsuranceDocument) {
        self.insurance_document = Some(document);
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::triage::Coverage;

    fn verdict() -> CoverageVerdict {
        CoverageVerdict {
            covered: Coverage::Maybe,
            note: "check".to_string(),
        }
    }

    #[test]
    fn new_context_has_no_progress() {
        let ctx = SessionContext::new(SessionId::new());
        assert_eq!(ctx.progress(), ProgressFlags::default());
        assert!(ctx.message_log().is_empty());
        assert!(ctx.urgency_tier().is_none());
    }

    #[test]
    fn record_triage_sets_flag_with_data() {
        let mut ctx = SessionContext::new(SessionId::new());
        ctx.record_triage(UrgencyTier::Moderate, CareCategory::WalkInClinic);

        assert!(ctx.progress().symptoms_assessed);
        assert_eq!(ctx.urgency_tier(), Some(UrgencyTier::Moderate));
        assert_eq!(ctx.care_category(), Some(CareCategory::WalkInClinic));
    }

    #[test]
    fn all_steps_complete_requires_three_flags() {
        let mut ctx = SessionContext::new(SessionId::new());
        ctx.record_triage(UrgencyTier::Mild, CareCategory::Pharmacy);
        ctx.record_coverage(verdict());
        assert!(!ctx.progress().all_steps_complete());

        ctx.record_facilities(FacilitySearch::default());
        assert!(ctx.progress().all_steps_complete());
    }

    #[test]
    fn record_exchange_logs_user_then_assistant() {
        let mut ctx = SessionContext::new(SessionId::new());
        ctx.record_exchange("hello", "hi");
        ctx.record_exchange("hello", "hi again");

        let speakers: Vec<_> = ctx.message_log().iter().map(|m| m.speaker).collect();
        assert_eq!(
            speakers,
            vec![Speaker::User, Speaker::Assistant, Speaker::User, Speaker::Assistant]
        );
        assert_eq!(ctx.message_log()[2].text, "hello");
    }

    #[test]
    fn recent_messages_returns_tail() {
        let mut ctx = SessionContext::new(SessionId::new());
        for i in 0..8 {
            ctx.record_exchange(&format!("q{i}"), &format!("a{i}"));
        }

        let recent = ctx.recent_messages(10);
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].text, "q3");
        assert_eq!(recent[9].text, "a7");
        assert_eq!(ctx.recent_messages(100).len(), 16);
    }

    #[test]
    fn reset_clears_everything_but_keeps_id() {
        let mut ctx = SessionContext::new(SessionId::new());
        ctx.record_triage(UrgencyTier::Severe, CareCategory::Hospital);
        ctx.record_coverage(verdict());
        ctx.mark_emergency();
        ctx.record_checklist(vec!["Receipt".to_string()]);
        ctx.record_exchange("hi", "hello");

        let fresh = ctx.reset();

        assert_eq!(fresh.session_id(), ctx.session_id());
        assert_eq!(fresh.progress(), ProgressFlags::default());
        assert!(fresh.message_log().is_empty());
        assert!(fresh.coverage().is_none());
        assert!(fresh.checklist().is_empty());
    }

    #[test]
    fn context_round_trips_through_yaml() {
        let mut ctx = SessionContext::new(SessionId::new());
        ctx.record_triage(UrgencyTier::Mild, CareCategory::Pharmacy);
        ctx.record_coverage(verdict());
        ctx.record_exchange("headache", "rest");

        let yaml = serde_yaml::to_string(&ctx).unwrap();
        let restored: SessionContext = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(restored, ctx);
    }
}
