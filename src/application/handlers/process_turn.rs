//! ProcessTurnHandler - runs one conversation turn end to end.
//!
//! The domain orchestrator decides which step runs and assembles the prompt;
//! this handler owns the parts with side effects: the session lock, the
//! store round-trip and the bounded completion call.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

use crate::domain::conversation::{
    Orchestrator, SessionContext, TurnArtifacts, TurnPlan, EMERGENCY_MESSAGE, FALLBACK_MESSAGE,
};
use crate::domain::foundation::SessionId;
use crate::ports::{AIError, AIProvider, CompletionRequest, RequestMetadata, SessionStore, SessionStoreError};

use super::session_locks::SessionLocks;

/// Command to process a user message.
#[derive(Debug, Clone)]
pub struct ProcessTurnCommand {
    pub session_id: SessionId,
    pub message: String,
}

impl ProcessTurnCommand {
    pub fn new(session_id: SessionId, message: impl Into<String>) -> Self {
        Self {
            session_id,
            message: message.into(),
        }
    }
}

/// Errors that can occur when processing a turn.
///
/// Completion failures are not errors here: they produce the fallback reply.
#[derive(Debug, Error)]
pub enum ProcessTurnError {
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("Session storage failed: {0}")]
    Storage(String),
}

impl From<SessionStoreError> for ProcessTurnError {
    fn from(err: SessionStoreError) -> Self {
        match err {
            SessionStoreError::NotFound(id) => Self::SessionNotFound(id),
            other => Self::Storage(other.to_string()),
        }
    }
}

/// Result of one turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub reply: String,
    /// The context after the turn. Equal to the input context when the
    /// completion call failed.
    pub context: SessionContext,
    pub artifacts: TurnArtifacts,
    /// This turn was short-circuited by an emergency keyword.
    pub emergency: bool,
    /// The completion call failed and the fallback reply was used.
    pub fallback: bool,
}

/// Generation settings applied to every completion request.
#[derive(Debug, Clone, Copy)]
pub struct TurnSettings {
    pub completion_timeout: Duration,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for TurnSettings {
    fn default() -> Self {
        Self {
            completion_timeout: Duration::from_secs(30),
            temperature: 0.7,
            max_tokens: 500,
        }
    }
}

/// Handler for conversation turns.
pub struct ProcessTurnHandler {
    orchestrator: Arc<Orchestrator>,
    ai_provider: Arc<dyn AIProvider>,
    store: Arc<dyn SessionStore>,
    locks: Arc<SessionLocks>,
    settings: TurnSettings,
}

impl ProcessTurnHandler {
    pub fn new(
        orchestrator: Arc<Orchestrator>,
        ai_provider: Arc<dyn AIProvider>,
        store: Arc<dyn SessionStore>,
        locks: Arc<SessionLocks>,
    ) -> Self {
        Self {
            orchestrator,
            ai_provider,
            store,
            locks,
            settings: TurnSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: TurnSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Loads the session, runs the turn and saves the result, holding the
    /// session's lock throughout.
    pub async fn handle(&self, cmd: ProcessTurnCommand) -> Result<TurnOutcome, ProcessTurnError> {
        let _guard = self.locks.acquire(cmd.session_id).await;

        let ctx = self.store.load(cmd.session_id).await?;
        let outcome = self.process_turn(&cmd.message, ctx).await;

        if !outcome.fallback {
            self.store.save(cmd.session_id, &outcome.context).await?;
        }
        Ok(outcome)
    }

    /// Runs one turn against `ctx`.
    ///
    /// The turn works on a copy of the context. If the completion call fails
    /// or times out the copy is dropped, so the returned context is exactly
    /// the one passed in.
    pub async fn process_turn(&self, message: &str, ctx: SessionContext) -> TurnOutcome {
        let mut working = ctx.clone();

        let (outcome, prompt) = match self.orchestrator.plan_turn(message, &mut working) {
            TurnPlan::Emergency { .. } => {
                working.record_exchange(message, EMERGENCY_MESSAGE);
                return Self::finished(EMERGENCY_MESSAGE.to_string(), working, true);
            }
            TurnPlan::Converse { outcome, prompt } => (outcome, prompt),
        };

        let session_id = working.session_id();
        let request = CompletionRequest::from_prompt(
            prompt,
            RequestMetadata::new(session_id, format!("turn-{}", Uuid::new_v4())),
        )
        .with_temperature(self.settings.temperature)
        .with_max_tokens(self.settings.max_tokens);

        match self.complete(request).await {
            Ok(reply) => {
                tracing::debug!(
                    session_id = %session_id,
                    step = ?outcome.step(),
                    reply_len = reply.len(),
                    "Turn completed"
                );
                working.record_exchange(message, &reply);
                Self::finished(reply, working, false)
            }
            Err(err) => {
                tracing::warn!(
                    session_id = %session_id,
                    provider = %self.ai_provider.provider_info().name,
                    step = ?outcome.step(),
                    error = %err,
                    "Completion failed, replying with fallback"
                );
                TurnOutcome {
                    reply: FALLBACK_MESSAGE.to_string(),
                    artifacts: TurnArtifacts::from_context(&ctx),
                    context: ctx,
                    emergency: false,
                    fallback: true,
                }
            }
        }
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, AIError> {
        let limit = self.settings.completion_timeout;
        match tokio::time::timeout(limit, self.ai_provider.complete(request)).await {
            Ok(Ok(response)) => Ok(response.content),
            Ok(Err(err)) => Err(err),
            Err(_) => Err(AIError::timeout(
                u32::try_from(limit.as_secs()).unwrap_or(u32::MAX),
            )),
        }
    }

    fn finished(reply: String, context: SessionContext, emergency: bool) -> TurnOutcome {
        TurnOutcome {
            reply,
            artifacts: TurnArtifacts::from_context(&context),
            context,
            emergency,
            fallback: false,
        }
    }
}
