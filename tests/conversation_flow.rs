//! Integration tests for the conversation turn flow.
//!
//! These drive `ProcessTurnHandler` end to end over the in-memory session
//! store and the mock completion service:
//! 1. Emergency short-circuit
//! 2. Triage -> coverage -> facilities walk-through
//! 3. Completion failure fallback
//! 4. Reset and per-session serialization

use std::sync::Arc;
use std::time::Duration;

use nurse_ally::adapters::ai::{MockAIProvider, MockError};
use nurse_ally::adapters::storage::InMemorySessionStore;
use nurse_ally::application::{
    ProcessTurnCommand, ProcessTurnHandler, ResetSessionCommand, ResetSessionHandler,
    SessionLocks, StartSessionHandler, UpdateProfileCommand, UpdateProfileHandler,
};
use nurse_ally::domain::conversation::{
    Orchestrator, ProfileUpdate, SessionContext, EMERGENCY_MESSAGE, FALLBACK_MESSAGE,
};
use nurse_ally::domain::foundation::SessionId;
use nurse_ally::domain::triage::{CareCategory, Coverage, TriageKeywords, UrgencyTier};
use nurse_ally::ports::SessionStore;

// =============================================================================
// Test Infrastructure
// =============================================================================

struct Harness {
    ai: MockAIProvider,
    store: Arc<InMemorySessionStore>,
    turns: ProcessTurnHandler,
    profiles: UpdateProfileHandler,
    resets: ResetSessionHandler,
}

impl Harness {
    fn new(ai: MockAIProvider) -> Self {
        let store = Arc::new(InMemorySessionStore::new());
        let locks = Arc::new(SessionLocks::new());
        Self {
            turns: ProcessTurnHandler::new(
                Arc::new(Orchestrator::new(&TriageKeywords::default())),
                Arc::new(ai.clone()),
                store.clone(),
                locks.clone(),
            ),
            profiles: UpdateProfileHandler::new(store.clone(), locks.clone()),
            resets: ResetSessionHandler::new(store.clone(), locks),
            ai,
            store,
        }
    }

    async fn start(&self) -> SessionId {
        StartSessionHandler::new(self.store.clone())
            .handle()
            .await
            .unwrap()
            .session_id()
    }

    async fn set_profile(&self, session_id: SessionId, insurance: &str, country: &str, city: &str) {
        let update = ProfileUpdate {
            insurance_type: Some(insurance.to_string()),
            country: Some(country.to_string()),
            city: Some(city.to_string()),
            ..Default::default()
        };
        self.profiles
            .handle(UpdateProfileCommand { session_id, update })
            .await
            .unwrap();
    }

    async fn say(&self, session_id: SessionId, message: &str) -> nurse_ally::application::TurnOutcome {
        self.turns
            .handle(ProcessTurnCommand::new(session_id, message))
            .await
            .unwrap()
    }

    async fn stored(&self, session_id: SessionId) -> SessionContext {
        self.store.load(session_id).await.unwrap()
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn chest_pain_gets_emergency_reply_without_completion() {
    let h = Harness::new(MockAIProvider::new());
    let id = h.start().await;

    let outcome = h.say(id, "I have CHEST PAIN and feel dizzy").await;

    assert_eq!(outcome.reply, EMERGENCY_MESSAGE);
    assert!(outcome.emergency);
    assert_eq!(h.ai.call_count(), 0);

    let stored = h.stored(id).await;
    let progress = stored.progress();
    assert!(progress.emergency_detected);
    assert!(!progress.symptoms_assessed);
    assert!(!progress.insurance_checked);
    assert!(!progress.facilities_recommended);
    assert!(stored.urgency_tier().is_none());
}

#[tokio::test]
async fn mild_headache_in_paris_walks_through_every_step() {
    let h = Harness::new(
        MockAIProvider::new()
            .with_response("That sounds mild. A pharmacist can help.")
            .with_response("Travel insurance rarely covers pharmacy visits.")
            .with_response("Here are some pharmacies near you."),
    );
    let id = h.start().await;
    h.set_profile(id, "Travel", "France", "Paris").await;

    let first = h.say(id, "I have a mild headache").await;
    assert_eq!(first.reply, "That sounds mild. A pharmacist can help.");
    assert_eq!(first.artifacts.urgency, Some(UrgencyTier::Mild));
    assert_eq!(first.artifacts.care_category, Some(CareCategory::Pharmacy));

    let second = h.say(id, "Will my insurance pay for this?").await;
    let verdict = second.artifacts.insurance_coverage.clone().unwrap();
    assert_eq!(verdict.covered, Coverage::NotCovered);
    assert!(verdict.note.contains("pharmacy"));

    let third = h.say(id, "Where can I go?").await;
    let map_link = third.artifacts.map_link.clone().unwrap();
    assert!(map_link.contains("pharmacies"));
    assert!(map_link.contains("Paris"));
    assert!(!third.artifacts.facilities.is_empty());
    assert!(third
        .artifacts
        .facilities
        .iter()
        .all(|f| f.address.ends_with("Paris")));
    assert!(third.artifacts.checklist.len() > 4);

    let stored = h.stored(id).await;
    assert!(stored.progress().all_steps_complete());
    assert_eq!(stored.message_log().len(), 6);
    assert_eq!(h.ai.call_count(), 3);
}

#[tokio::test]
async fn ehic_hospital_is_covered() {
    let h = Harness::new(MockAIProvider::new());
    let id = h.start().await;
    h.set_profile(id, "EHIC", "Spain", "Madrid").await;

    let first = h.say(id, "I have a high fever since yesterday").await;
    assert_eq!(first.artifacts.urgency, Some(UrgencyTier::Severe));
    assert_eq!(first.artifacts.care_category, Some(CareCategory::Hospital));

    let second = h.say(id, "Am I covered?").await;
    assert_eq!(
        second.artifacts.insurance_coverage.unwrap().covered,
        Coverage::Covered
    );
}

#[tokio::test]
async fn completion_failure_keeps_stored_session_as_before() {
    let h = Harness::new(
        MockAIProvider::new()
            .with_response("Noted.")
            .with_error(MockError::Network {
                message: "connection reset".to_string(),
            }),
    );
    let id = h.start().await;
    h.set_profile(id, "Private", "Germany", "Berlin").await;
    h.say(id, "I have an ear pain").await;
    let before = h.stored(id).await;

    let outcome = h.say(id, "Is that covered?").await;

    assert_eq!(outcome.reply, FALLBACK_MESSAGE);
    assert!(outcome.fallback);
    assert_eq!(h.stored(id).await, before);
    assert!(!before.progress().insurance_checked);
}

#[tokio::test]
async fn reset_after_turns_clears_flags_and_log() {
    let h = Harness::new(MockAIProvider::new());
    let id = h.start().await;
    h.set_profile(id, "Travel", "Italy", "Rome").await;
    for message in ["I have a rash", "What about insurance?", "Where should I go?"] {
        h.say(id, message).await;
    }
    assert!(h.stored(id).await.progress().all_steps_complete());

    let reset = h
        .resets
        .handle(ResetSessionCommand { session_id: id })
        .await
        .unwrap();

    assert_eq!(reset.session_id(), id);
    assert_eq!(reset.progress(), Default::default());
    assert!(reset.message_log().is_empty());
    assert!(reset.checklist().is_empty());
    assert!(reset.map_link().is_none());
    assert_eq!(h.stored(id).await, reset);
}

#[tokio::test]
async fn concurrent_sessions_stay_independent() {
    let h = Arc::new(Harness::new(
        MockAIProvider::new().with_delay(Duration::from_millis(5)),
    ));
    let a = h.start().await;
    let b = h.start().await;

    let mut tasks = Vec::new();
    for (id, message) in [(a, "I have a fever"), (b, "I have a sprain"), (a, "still hot"), (b, "it hurts")] {
        let h = Arc::clone(&h);
        tasks.push(tokio::spawn(async move { h.say(id, message).await }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    for id in [a, b] {
        let stored = h.stored(id).await;
        assert_eq!(stored.message_log().len(), 4);
        assert!(stored.progress().symptoms_assessed);
        assert!(stored.progress().insurance_checked);
        assert!(stored.urgency_tier().is_some());
    }
}
