//! Orchestrator - Care navigation state machine.
//!
//! Decides which step runs on a turn, applies its result to the session
//! context, and prepares the prompt. Pure domain logic with no provider
//! knowledge: the completion call happens in the application layer.

use serde::{Deserialize, Serialize};

use crate::domain::triage::{
    CareCategory, ClaimChecklistBuilder, CoverageResolver, CoverageVerdict, EmergencyDetector,
    FacilityLocator, FacilityRecord, FacilitySearch, InsuranceType, TriageEvaluator,
    TriageKeywords, UrgencyTier,
};

use super::prompt::{Prompt, PromptBuilder};
use super::session::{ProgressFlags, SessionContext};

/// Reply returned verbatim when an emergency keyword is detected.
pub const EMERGENCY_MESSAGE: &str = "This may be an emergency. Please go to the nearest hospital or call the local emergency number immediately.";

/// Reply returned when the completion call fails.
pub const FALLBACK_MESSAGE: &str =
    "I'm having trouble processing your request right now. Please try again in a moment.";

/// The step a turn runs, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStep {
    EmergencyShortCircuit,
    Triage,
    InsuranceCheck,
    FacilitySearch,
    GeneralConversation,
}

impl ConversationStep {
    /// The first stage whose progress flag is still unset.
    pub fn first_pending(progress: &ProgressFlags) -> Self {
        if !progress.symptoms_assessed {
            ConversationStep::Triage
        } else if !progress.insurance_checked {
            ConversationStep::InsuranceCheck
        } else if !progress.facilities_recommended {
            ConversationStep::FacilitySearch
        } else {
            ConversationStep::GeneralConversation
        }
    }
}

/// Result of the step that ran on a non-emergency turn.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Triaged {
        urgency: UrgencyTier,
        care: CareCategory,
    },
    CoverageChecked {
        verdict: CoverageVerdict,
    },
    FacilitiesSearched {
        search: FacilitySearch,
        checklist: Option<Vec<String>>,
    },
    Conversation,
}

impl StepOutcome {
    pub fn step(&self) -> ConversationStep {
        match self {
            StepOutcome::Triaged { .. } => ConversationStep::Triage,
            StepOutcome::CoverageChecked { .. } => ConversationStep::InsuranceCheck,
            StepOutcome::FacilitiesSearched { .. } => ConversationStep::FacilitySearch,
            StepOutcome::Conversation => ConversationStep::GeneralConversation,
        }
    }

    /// System annotation describing what the step found.
    pub fn annotation(&self) -> Option<String> {
        let lines: Vec<String> = match self {
            StepOutcome::Triaged { urgency, care } => vec![
                format!("Symptom urgency: {}", urgency),
                format!("Recommended care level: {}", care.label()),
                "Now, let me check if your insurance is likely to cover this type of care."
                    .to_string(),
            ],
            StepOutcome::CoverageChecked { verdict } => vec![
                format!("Insurance coverage: {}", verdict.covered.describe()),
                format!("Coverage note: {}", verdict.note),
                "Let me help you find a suitable healthcare facility nearby.".to_string(),
            ],
            StepOutcome::FacilitiesSearched { search, checklist } => {
                let mut lines = Vec::new();
                if search.map_link.is_some() {
                    lines.push("I can provide a map link to nearby healthcare facilities.".to_string());
                } else {
                    lines.push(
                        "I don't have your location information to provide facility recommendations."
                            .to_string(),
                    );
                }
                if let Some(first) = search.facilities.first() {
                    lines.push(format!(
                        "Closest suggested facility: {} ({}, {})",
                        first.name, first.address, first.distance
                    ));
                }
                if checklist.as_ref().map(|c| !c.is_empty()).unwrap_or(false) {
                    lines.push(
                        "I can provide a checklist of documents needed for insurance claims."
                            .to_string(),
                    );
                }
                lines
            }
            StepOutcome::Conversation => return None,
        };

        let mut annotation = String::from("Based on my analysis:\n");
        for line in lines {
            annotation.push_str("- ");
            annotation.push_str(&line);
            annotation.push('\n');
        }
        Some(annotation)
    }
}

/// What the caller must do to finish a turn.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnPlan {
    /// Reply with `EMERGENCY_MESSAGE` without calling the completion service.
    Emergency { keyword: String },
    /// Send `prompt` to the completion service.
    Converse { outcome: StepOutcome, prompt: Prompt },
}

/// Structured results surfaced alongside the reply text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnArtifacts {
    pub urgency: Option<UrgencyTier>,
    pub care_category: Option<CareCategory>,
    pub insurance_coverage: Option<CoverageVerdict>,
    pub map_link: Option<String>,
    pub facilities: Vec<FacilityRecord>,
    pub checklist: Vec<String>,
}

impl TurnArtifacts {
    /// Collects everything the session has accumulated so far.
    pub fn from_context(ctx: &SessionContext) -> Self {
        Self {
            urgency: ctx.urgency_tier(),
            care_category: ctx.care_category(),
            insurance_coverage: ctx.coverage().cloned(),
            map_link: ctx.map_link().map(str::to_string),
            facilities: ctx.facilities().to_vec(),
            checklist: ctx.checklist().to_vec(),
        }
    }
}

fn stored_care(ctx: &SessionContext) -> CareCategory {
    ctx.care_category()
        .unwrap_or_else(|| CareCategory::for_urgency(ctx.urgency_tier()))
}

/// The care navigation state machine.
#[derive(Debug, Clone, Default)]
pub struct Orchestrator {
    detector: EmergencyDetector,
    evaluator: TriageEvaluator,
    resolver: CoverageResolver,
    locator: FacilityLocator,
    checklist: ClaimChecklistBuilder,
    prompts: PromptBuilder,
}

impl Orchestrator {
    /// Creates an orchestrator using the given keyword tables.
    pub fn new(keywords: &TriageKeywords) -> Self {
        Self {
            detector: EmergencyDetector::from_keywords(keywords),
            evaluator: TriageEvaluator::from_keywords(keywords),
            ..Self::default()
        }
    }

    /// The step this message would run, without running it.
    pub fn next_step(&self, message: &str, ctx: &SessionContext) -> ConversationStep {
        if self.detector.is_emergency(message) {
            ConversationStep::EmergencyShortCircuit
        } else {
            ConversationStep::first_pending(&ctx.progress())
        }
    }

    /// Runs the step for this turn against `ctx` and says how to finish.
    ///
    /// On the emergency path only `emergency_detected` changes. Otherwise
    /// the step's result is written into `ctx` and a prompt is assembled
    /// from the context as it stood before this turn's exchange.
    pub fn plan_turn(&self, message: &str, ctx: &mut SessionContext) -> TurnPlan {
        if let Some(keyword) = self.detector.detect(message) {
            let keyword = keyword.to_string();
            tracing::warn!(
                session_id = %ctx.session_id(),
                keyword = %keyword,
                "Emergency keyword detected, short-circuiting turn"
            );
            ctx.mark_emergency();
            return TurnPlan::Emergency { keyword };
        }

        let outcome = self.run_step(message, ctx);
        tracing::debug!(
            session_id = %ctx.session_id(),
            step = ?outcome.step(),
            "Orchestration step completed"
        );

        let prompt = self.prompts.build(message, ctx, &outcome);
        TurnPlan::Converse { outcome, prompt }
    }

    /// Runs the first pending step and records its result in `ctx`.
    pub fn run_step(&self, message: &str, ctx: &mut SessionContext) -> StepOutcome {
        match ConversationStep::first_pending(&ctx.progress()) {
            ConversationStep::Triage => {
                let urgency = self.evaluator.evaluate(message);
                let care = CareCategory::for_urgency(Some(urgency));
                tracing::info!(
                    session_id = %ctx.session_id(),
                    urgency = %urgency,
                    care_category = %care,
                    "Symptoms triaged"
                );
                ctx.record_triage(urgency, care);
                StepOutcome::Triaged { urgency, care }
            }
            ConversationStep::InsuranceCheck => {
                let insurance = InsuranceType::from_profile(ctx.profile().insurance_type());
                let care = stored_care(ctx);
                let verdict = self.resolver.resolve(&insurance, care, ctx.profile().country());
                tracing::info!(
                    session_id = %ctx.session_id(),
                    insurance = %insurance,
                    care_category = %care,
                    covered = verdict.covered.describe(),
                    "Insurance coverage checked"
                );
                ctx.record_coverage(verdict.clone());
                StepOutcome::CoverageChecked { verdict }
            }
            ConversationStep::FacilitySearch => {
                let care = stored_care(ctx);
                let search = self
                    .locator
                    .locate(ctx.profile().city(), care, ctx.urgency_tier());
                tracing::info!(
                    session_id = %ctx.session_id(),
                    care_category = %care,
                    facilities = search.facilities.len(),
                    has_map_link = search.map_link.is_some(),
                    "Facility search completed"
                );
                ctx.record_facilities(search.clone());

                let checklist = ctx.progress().all_steps_complete().then(|| {
                    let insurance = InsuranceType::from_profile(ctx.profile().insurance_type());
                    self.checklist.build(&insurance, ctx.care_category())
                });
                if let Some(items) = &checklist {
                    ctx.record_checklist(items.clone());
                }
                StepOutcome::FacilitiesSearched { search, checklist }
            }
            ConversationStep::GeneralConversation | ConversationStep::EmergencyShortCircuit => {
                StepOutcome::Conversation
            }
        }
    }
}
