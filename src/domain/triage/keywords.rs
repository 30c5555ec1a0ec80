//! Data-driven keyword tables for the emergency and triage classifiers.
//!
//! The built-in tables can be replaced wholesale (or per table) by a YAML
//! document of the form:
//!
//! ```yaml
//! emergency: ["chest pain", "stroke"]
//! severe: ["severe", "high fever"]
//! moderate: ["fever", "rash"]
//! ```

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// An ordered list of lowercase keywords matched as substrings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct KeywordTable(Vec<String>);

impl KeywordTable {
    /// Builds a table, normalizing entries to trimmed lowercase and
    /// dropping blanks.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        )
    }

    /// Returns the first keyword (in table order) found in `text`,
    /// compared case-insensitively.
    pub fn first_match(&self, text: &str) -> Option<&str> {
        let haystack = text.to_lowercase();
        self.0
            .iter()
            .find(|k| haystack.contains(k.as_str()))
            .map(String::as_str)
    }

    /// Returns true if any keyword occurs in `text`.
    pub fn matches(&self, text: &str) -> bool {
        self.first_match(text).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl From<Vec<String>> for KeywordTable {
    fn from(keywords: Vec<String>) -> Self {
        Self::new(keywords)
    }
}

impl From<KeywordTable> for Vec<String> {
    fn from(table: KeywordTable) -> Self {
        table.0
    }
}

static EMERGENCY_KEYWORDS: Lazy<KeywordTable> = Lazy::new(|| {
    KeywordTable::new([
        "chest pain",
        "heart attack",
        "stroke",
        "unconscious",
        "fainted",
        "fainting",
        "difficulty breathing",
        "can't breathe",
        "severe bleeding",
        "heavy bleeding",
        "head injury",
        "broken bone",
        "fracture",
        "seizure",
        "convulsion",
        "poisoning",
        "overdose",
        "suicide",
        "suicidal",
        "severe burn",
        "electric shock",
        "drowning",
        "choking",
        "anaphylaxis",
        "allergic reaction",
        "severe pain",
        "paralysis",
        "gunshot",
        "stab wound",
        "car accident",
        "traffic accident",
        "fall from height",
    ])
});

static SEVERE_KEYWORDS: Lazy<KeywordTable> = Lazy::new(|| {
    KeywordTable::new([
        "severe",
        "intense",
        "extreme",
        "unbearable",
        "excruciating",
        "chest pain",
        "difficulty breathing",
        "shortness of breath",
        "high fever",
        "fever above 103",
        "fever above 39.5",
        "coughing blood",
        "vomiting blood",
        "blood in stool",
        "blood in urine",
        "severe headache",
        "worst headache",
        "sudden headache",
        "confusion",
        "disorientation",
        "loss of consciousness",
        "unable to move",
        "paralysis",
        "stroke",
        "heart attack",
        "severe allergic reaction",
        "anaphylaxis",
        "swollen throat",
        "unable to swallow",
        "severe dehydration",
        "severe burn",
        "deep cut",
        "large wound",
        "heavy bleeding",
        "won't stop bleeding",
        "broken bone",
        "fracture",
        "dislocation",
        "head injury",
        "seizure",
        "convulsion",
        "poisoning",
        "overdose",
    ])
});

static MODERATE_KEYWORDS: Lazy<KeywordTable> = Lazy::new(|| {
    KeywordTable::new([
        "moderate",
        "significant",
        "concerning",
        "persistent",
        "fever",
        "high temperature",
        "infection",
        "infected",
        "ear pain",
        "sinus pain",
        "toothache",
        "dental pain",
        "sprain",
        "strain",
        "twisted ankle",
        "joint pain",
        "migraine",
        "vomiting",
        "diarrhea",
        "dehydration",
        "rash",
        "skin infection",
        "eye infection",
        "pink eye",
        "urinary tract infection",
        "uti",
        "kidney infection",
        "moderate pain",
        "unable to keep food down",
        "unable to keep liquids down",
        "asthma attack",
        "wheezing",
        "moderate allergic reaction",
        "cut requiring stitches",
        "minor burn",
        "insect bite with swelling",
        "flu symptoms",
        "covid symptoms",
        "strep throat",
        "bronchitis",
        "moderate bleeding",
        "minor injury",
        "sports injury",
    ])
});

/// Errors raised while loading keyword tables from disk.
#[derive(Debug, Error)]
pub enum KeywordTableError {
    #[error("Failed to read keyword file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse keyword file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// The three keyword tables consulted on every turn.
///
/// Tables missing from a YAML override fall back to the built-in lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageKeywords {
    #[serde(default = "default_emergency")]
    pub emergency: KeywordTable,
    #[serde(default = "default_severe")]
    pub severe: KeywordTable,
    #[serde(default = "default_moderate")]
    pub moderate: KeywordTable,
}

fn default_emergency() -> KeywordTable {
    EMERGENCY_KEYWORDS.clone()
}

fn default_severe() -> KeywordTable {
    SEVERE_KEYWORDS.clone()
}

fn default_moderate() -> KeywordTable {
    MODERATE_KEYWORDS.clone()
}

impl Default for TriageKeywords {
    fn default() -> Self {
        Self {
            emergency: default_emergency(),
            severe: default_severe(),
            moderate: default_moderate(),
        }
    }
}

impl TriageKeywords {
    /// Parses keyword tables from a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, KeywordTableError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Loads keyword tables from a YAML file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, KeywordTableError> {
        let content = tokio::fs::read_to_string(path.as_ref()).await?;
        Self::from_yaml(&content)
    }
}
