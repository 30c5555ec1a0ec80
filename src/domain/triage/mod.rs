//! Triage module - The pure reasoning steps of a care-navigation turn.
//!
//! Every step here is deterministic and infallible:
//!
//! - `EmergencyDetector` - keyword scan that can end a turn immediately
//! - `TriageEvaluator` - free text to `UrgencyTier`
//! - `CareCategory::for_urgency` - urgency to recommended facility class
//! - `CoverageResolver` - insurance type by care category lookup
//! - `FacilityLocator` - map-search link and synthetic facilities
//! - `ClaimChecklistBuilder` - documents needed to file a claim
//!
//! Keyword tables are data (`TriageKeywords`) and may be loaded from YAML.

mod checklist;
mod coverage;
mod emergency;
mod facilities;
mod keywords;
mod urgency;

pub use checklist::ClaimChecklistBuilder;
pub use coverage::{Coverage, CoverageResolver, CoverageVerdict, InsuranceType};
pub use emergency::EmergencyDetector;
pub use facilities::{
    search_term, FacilityLocator, FacilityRecord, FacilitySearch, DEFAULT_MAP_SEARCH_BASE,
};
pub use keywords::{KeywordTable, KeywordTableError, TriageKeywords};
pub use urgency::{CareCategory, TriageEvaluator, UrgencyTier};
