//! Prompt assembly for the completion call.
//!
//! A prompt is the persona instruction plus an ordered message list:
//! the trailing window of history, the current user message, a profile
//! summary, and an annotation describing the step that ran.

use serde::{Deserialize, Serialize};

use super::orchestrator::StepOutcome;
use super::session::{SessionContext, Speaker};

/// Persona and safety instructions sent with every completion.
pub const PERSONA_PROMPT: &str = r#"You are Nurse Ally, a compassionate and professional health assistant helping users access the right level of healthcare while traveling, studying abroad, or living as digital nomads.

Your mission is to:
- Understand the user's symptoms
- Estimate the urgency of their situation (triage)
- Recommend what kind of care they should seek
- Inform them whether their insurance likely covers it
- Show nearby clinics or care providers if needed

You do not give medical diagnoses or prescriptions.

SAFETY BEHAVIOR:
If the user reports symptoms like chest pain, fainting, difficulty breathing, bleeding, or confusion, always respond with:
"This may be an emergency. Please go to the nearest hospital or call the local emergency number immediately."

Never provide medical diagnosis. Emphasize your role is to help users decide where to go and what's covered, not what illness they have.

STYLE GUIDE:
- Always use simple, clear, and reassuring language.
- Use bullet points when listing options or steps.
- Include links to maps or helpful resources using Markdown if supported.
- Refer to yourself as "Nurse Ally."
- Stay in character as a trusted assistant."#;

/// Number of prior log entries included in a prompt.
pub const DEFAULT_HISTORY_WINDOW: usize = 10;

/// Role of a prompt message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptRole {
    System,
    User,
    Assistant,
}

/// A message in an assembled prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: PromptRole,
    pub content: String,
}

impl PromptMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::Assistant,
            content: content.into(),
        }
    }
}

/// An assembled prompt, ready to be handed to a completion provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub messages: Vec<PromptMessage>,
}

/// Builds prompts from a session context and the outcome of the step
/// that ran this turn.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    persona: String,
    history_window: usize,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self {
            persona: PERSONA_PROMPT.to_string(),
            history_window: DEFAULT_HISTORY_WINDOW,
        }
    }

    /// Assembles the prompt. `ctx` must not yet contain this turn's exchange.
    pub fn build(&self, message: &str, ctx: &SessionContext, outcome: &StepOutcome) -> Prompt {
        let history = ctx.recent_messages(self.history_window);

        let mut messages: Vec<PromptMessage> = history
            .iter()
            .map(|entry| match entry.speaker {
                Speaker::User => PromptMessage::user(entry.text.clone()),
                Speaker::Assistant => PromptMessage::assistant(entry.text.clone()),
            })
            .collect();

        let already_last = history
            .last()
            .map(|e| e.speaker == Speaker::User && e.text == message)
            .unwrap_or(false);
        if !already_last {
            messages.push(PromptMessage::user(message));
        }

        messages.push(PromptMessage::system(profile_summary(ctx)));

        if let Some(annotation) = outcome.annotation() {
            messages.push(PromptMessage::system(annotation));
        }

        Prompt {
            system: self.persona.clone(),
            messages,
        }
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn profile_summary(ctx: &SessionContext) -> String {
    let mut summary = String::from("User profile information:\n");
    for line in ctx.profile().summary_lines() {
        summary.push_str("- ");
        summary.push_str(&line);
        summary.push('\n');
    }
    if let Some(document) = ctx.insurance_document() {
        summary.push_str(&format!(
            "- insurance_document: provided ({})\n",
            document.original_name
        ));
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::profile::{InsuranceDocument, ProfileUpdate};
    use crate::domain::foundation::SessionId;
    use crate::domain::triage::{CareCategory, UrgencyTier};
    use chrono::Utc;

    fn triaged() -> StepOutcome {
        StepOutcome::Triaged {
            urgency: UrgencyTier::Mild,
            care: CareCategory::Pharmacy,
        }
    }

    #[test]
    fn starts_with_persona_and_current_message() {
        let ctx = SessionContext::new(SessionId::new());
        let prompt = PromptBuilder::new().build("I have a headache", &ctx, &triaged());

        assert!(prompt.system.contains("Nurse Ally"));
        assert_eq!(prompt.messages[0], PromptMessage::user("I have a headache"));
    }

    #[test]
    fn history_is_limited_to_window() {
        let mut ctx = SessionContext::new(SessionId::new());
        for i in 0..10 {
            ctx.record_exchange(&format!("q{i}"), &format!("a{i}"));
        }

        let prompt = PromptBuilder::new().build("next", &ctx, &StepOutcome::Conversation);

        let conversational: Vec<_> = prompt
            .messages
            .iter()
            .filter(|m| m.role != PromptRole::System)
            .collect();
        assert_eq!(conversational.len(), 11);
        assert_eq!(conversational[0].content, "q5");
        assert_eq!(conversational[10].content, "next");
    }

    #[test]
    fn current_message_kept_when_it_repeats_last_reply() {
        let mut ctx = SessionContext::new(SessionId::new());
        ctx.record_exchange("hello", "Where are you now?");

        let prompt =
            PromptBuilder::new().build("Where are you now?", &ctx, &StepOutcome::Conversation);

        let roles: Vec<_> = prompt.messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                PromptRole::User,
                PromptRole::Assistant,
                PromptRole::User,
                PromptRole::System
            ]
        );
        let last_user = prompt
            .messages
            .iter()
            .rev()
            .find(|m| m.role == PromptRole::User)
            .map(|m| m.content.as_str());
        assert_eq!(last_user, Some("Where are you now?"));
    }

    #[test]
    fn current_message_not_repeated_when_last_user_entry() {
        let mut ctx = SessionContext::new(SessionId::new());
        ctx.record_exchange("hi", "Hello, how can I help?");
        let mut value = serde_json::to_value(&ctx).unwrap();
        value["message_log"]
            .as_array_mut()
            .unwrap()
            .push(serde_json::json!({"speaker": "user", "text": "my head hurts", "at": Utc::now()}));
        let ctx: SessionContext = serde_json::from_value(value).unwrap();

        let prompt = PromptBuilder::new().build("my head hurts", &ctx, &StepOutcome::Conversation);

        let users = prompt.messages.iter().filter(|m| m.role == PromptRole::User).count();
        assert_eq!(users, 2);
    }

    #[test]
    fn includes_profile_and_annotation() {
        let mut ctx = SessionContext::new(SessionId::new());
        ctx.update_profile(ProfileUpdate {
            city: Some("Paris".to_string()),
            ..Default::default()
        });
        ctx.attach_insurance_document(InsuranceDocument {
            original_name: "policy.pdf".to_string(),
            stored_name: "x_policy.pdf".to_string(),
            size_bytes: 10,
            sha256: "ab".to_string(),
            uploaded_at: Utc::now(),
        });

        let prompt = PromptBuilder::new().build("hi", &ctx, &triaged());
        let systems: Vec<_> = prompt
            .messages
            .iter()
            .filter(|m| m.role == PromptRole::System)
            .map(|m| m.content.as_str())
            .collect();

        assert!(systems[0].starts_with("User profile information:"));
        assert!(systems[0].contains("- city: Paris"));
        assert!(systems[0].contains("insurance_document: provided (policy.pdf)"));
        assert!(systems[1].starts_with("Based on my analysis:"));
        assert!(systems[1].contains("- Symptom urgency: mild"));
    }

    #[test]
    fn general_conversation_has_no_annotation() {
        let ctx = SessionContext::new(SessionId::new());
        let prompt = PromptBuilder::new().build("thanks", &ctx, &StepOutcome::Conversation);

        assert!(!prompt
            .messages
            .iter()
            .any(|m| m.content.starts_with("Based on my analysis")));
    }
}
