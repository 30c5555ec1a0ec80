//! Conversation module - Session state and the orchestration state machine.
//!
//! - `SessionContext` - everything one session accumulates across turns
//! - `UserProfile` / `ProfileUpdate` - caller-supplied attributes
//! - `Orchestrator` - picks and runs the step for each turn
//! - `PromptBuilder` - assembles the completion prompt

mod orchestrator;
mod profile;
mod prompt;
mod session;

pub use orchestrator::{
    ConversationStep, Orchestrator, StepOutcome, TurnArtifacts, TurnPlan, EMERGENCY_MESSAGE,
    FALLBACK_MESSAGE,
};
pub use profile::{InsuranceDocument, Location, ProfileUpdate, UserProfile};
pub use prompt::{
    Prompt, PromptBuilder, PromptMessage, PromptRole, DEFAULT_HISTORY_WINDOW, PERSONA_PROMPT,
};
pub use session::{LoggedMessage, ProgressFlags, SessionContext, Speaker};
