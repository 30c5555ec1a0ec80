//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, errors)
//! - `triage` - Pure reasoning steps: emergency check, urgency, coverage, facilities, checklist
//! - `conversation` - Session context and the orchestration state machine

pub mod conversation;
pub mod foundation;
pub mod triage;
