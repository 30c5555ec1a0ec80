//! Urgency triage and the care-level mapping that follows from it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::keywords::{KeywordTable, TriageKeywords};

/// How urgently the reported symptoms need attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyTier {
    Severe,
    Moderate,
    Mild,
}

impl UrgencyTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyTier::Severe => "severe",
            UrgencyTier::Moderate => "moderate",
            UrgencyTier::Mild => "mild",
        }
    }
}

impl fmt::Display for UrgencyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies free text into an urgency tier.
///
/// Severe keywords are checked first and always win over moderate ones.
/// Text that matches neither tier is mild.
#[derive(Debug, Clone)]
pub struct TriageEvaluator {
    severe: KeywordTable,
    moderate: KeywordTable,
}

impl TriageEvaluator {
    pub fn new(severe: KeywordTable, moderate: KeywordTable) -> Self {
        Self { severe, moderate }
    }

    pub fn from_keywords(keywords: &TriageKeywords) -> Self {
        Self::new(keywords.severe.clone(), keywords.moderate.clone())
    }

    pub fn evaluate(&self, text: &str) -> UrgencyTier {
        if self.severe.matches(text) {
            UrgencyTier::Severe
        } else if self.moderate.matches(text) {
            UrgencyTier::Moderate
        } else {
            UrgencyTier::Mild
        }
    }
}

impl Default for TriageEvaluator {
    fn default() -> Self {
        Self::from_keywords(&TriageKeywords::default())
    }
}

/// The class of facility recommended for a given urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CareCategory {
    Hospital,
    WalkInClinic,
    Pharmacy,
}

impl CareCategory {
    /// Maps an urgency tier to a care category. An unset tier maps to a
    /// walk-in clinic.
    pub fn for_urgency(tier: Option<UrgencyTier>) -> Self {
        match tier {
            Some(UrgencyTier::Severe) => CareCategory::Hospital,
            Some(UrgencyTier::Moderate) => CareCategory::WalkInClinic,
            Some(UrgencyTier::Mild) => CareCategory::Pharmacy,
            None => CareCategory::WalkInClinic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CareCategory::Hospital => "hospital",
            CareCategory::WalkInClinic => "walk-in-clinic",
            CareCategory::Pharmacy => "pharmacy",
        }
    }

    /// Human-readable label used in replies.
    pub fn label(&self) -> &'static str {
        match self {
            CareCategory::Hospital => "hospital",
            CareCategory::WalkInClinic => "walk-in clinic",
            CareCategory::Pharmacy => "pharmacy",
        }
    }
}

impl fmt::Display for CareCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CareCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hospital" => Ok(CareCategory::Hospital),
            "walk-in-clinic" | "walk-in clinic" | "walk-in" => Ok(CareCategory::WalkInClinic),
            "pharmacy" => Ok(CareCategory::Pharmacy),
            other => Err(format!("unknown care category: {}", other)),
        }
    }
}
