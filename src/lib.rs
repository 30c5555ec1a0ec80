//! Nurse Ally - Care Navigation Assistant
//!
//! This crate walks a traveller or resident from a description of their
//! symptoms to an urgency assessment, an insurance coverage estimate, nearby
//! facilities and a claim checklist, replying through a language model in a
//! nurse persona. Emergencies short-circuit the whole flow.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
