//! Emergency detection - the check that runs before anything else on every turn.

use super::keywords::{KeywordTable, TriageKeywords};

/// Scans user text against the emergency keyword table.
#[derive(Debug, Clone)]
pub struct EmergencyDetector {
    keywords: KeywordTable,
}

impl EmergencyDetector {
    pub fn new(keywords: KeywordTable) -> Self {
        Self { keywords }
    }

    pub fn from_keywords(keywords: &TriageKeywords) -> Self {
        Self::new(keywords.emergency.clone())
    }

    /// Returns the emergency keyword found in `text`, if any.
    pub fn detect(&self, text: &str) -> Option<&str> {
        self.keywords.first_match(text)
    }

    pub fn is_emergency(&self, text: &str) -> bool {
        self.detect(text).is_some()
    }
}

impl Default for EmergencyDetector {
    fn default() -> Self {
        Self::from_keywords(&TriageKeywords::default())
    }
}
