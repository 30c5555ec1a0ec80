//! Insurance coverage lookup.
//!
//! Coverage is a static table of insurance type by care category. The
//! country is accepted so callers can pass it through, but no table entry
//! varies by country.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::urgency::CareCategory;

/// The kind of insurance a user reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InsuranceType {
    Travel,
    Ehic,
    Private,
    Uninsured,
    /// Anything else, kept verbatim.
    Unrecognized(String),
}

impl InsuranceType {
    /// Parses a free-form insurance type, case-insensitively.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "travel" => InsuranceType::Travel,
            "ehic" => InsuranceType::Ehic,
            "private" => InsuranceType::Private,
            "none" => InsuranceType::Uninsured,
            _ => InsuranceType::Unrecognized(raw.to_string()),
        }
    }

    /// Missing insurance information is treated as unrecognized.
    pub fn from_profile(raw: Option<&str>) -> Self {
        raw.map(Self::parse)
            .unwrap_or_else(|| InsuranceType::Unrecognized(String::new()))
    }
}

impl fmt::Display for InsuranceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsuranceType::Travel => f.write_str("Travel"),
            InsuranceType::Ehic => f.write_str("EHIC"),
            InsuranceType::Private => f.write_str("Private"),
            InsuranceType::Uninsured => f.write_str("None"),
            InsuranceType::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

/// Tri-state coverage outcome.
///
/// Serialized as `true`, `false` or `"maybe"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Coverage {
    Covered,
    NotCovered,
    Maybe,
}

impl Coverage {
    pub fn describe(&self) -> &'static str {
        match self {
            Coverage::Covered => "covered",
            Coverage::NotCovered => "not covered",
            Coverage::Maybe => "possibly covered",
        }
    }
}

impl Serialize for Coverage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Coverage::Covered => serializer.serialize_bool(true),
            Coverage::NotCovered => serializer.serialize_bool(false),
            Coverage::Maybe => serializer.serialize_str("maybe"),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CoverageRepr {
    Flag(bool),
    Word(String),
}

impl<'de> Deserialize<'de> for Coverage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match CoverageRepr::deserialize(deserializer)? {
            CoverageRepr::Flag(true) => Ok(Coverage::Covered),
            CoverageRepr::Flag(false) => Ok(Coverage::NotCovered),
            CoverageRepr::Word(word) if word.eq_ignore_ascii_case("maybe") => Ok(Coverage::Maybe),
            CoverageRepr::Word(word) => Err(serde::de::Error::custom(format!(
                "invalid coverage value: {}",
                word
            ))),
        }
    }
}

/// Coverage outcome plus the note explaining it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageVerdict {
    pub covered: Coverage,
    pub note: String,
}

impl CoverageVerdict {
    fn new(covered: Coverage, note: &str) -> Self {
        Self {
            covered,
            note: note.to_string(),
        }
    }
}

const UNRECOGNIZED_NOTE: &str = "I don't have specific information about your insurance coverage. Please check with your provider.";

/// Resolves coverage verdicts from the static coverage table.
#[derive(Debug, Clone, Default)]
pub struct CoverageResolver;

impl CoverageResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(
        &self,
        insurance: &InsuranceType,
        care: CareCategory,
        country: Option<&str>,
    ) -> CoverageVerdict {
        if let Some(country) = country {
            tracing::debug!(country, "Country does not affect coverage lookup");
        }

        use CareCategory::*;
        use Coverage::*;

        match (insurance, care) {
            (InsuranceType::Travel, Hospital) => CoverageVerdict::new(
                Covered,
                "Most travel insurance covers emergency hospital visits, but you may need to pay upfront and claim later.",
            ),
            (InsuranceType::Travel, WalkInClinic) => CoverageVerdict::new(
                Covered,
                "Travel insurance typically covers urgent care clinics, but check your policy limits.",
            ),
            (InsuranceType::Travel, Pharmacy) => CoverageVerdict::new(
                NotCovered,
                "Most travel insurance doesn't cover routine pharmacy visits unless prescribed by a doctor they approved.",
            ),
            (InsuranceType::Ehic, Hospital) => CoverageVerdict::new(
                Covered,
                "EHIC covers emergency and necessary hospital treatment in EU countries at the same cost as locals.",
            ),
            (InsuranceType::Ehic, WalkInClinic) => CoverageVerdict::new(
                Maybe,
                "EHIC coverage for walk-in clinics varies by country. In some EU countries, you may need to visit public facilities only.",
            ),
            (InsuranceType::Ehic, Pharmacy) => CoverageVerdict::new(
                Maybe,
                "EHIC may provide reduced-cost prescriptions in EU countries, but over-the-counter medications are typically not covered.",
            ),
            (InsuranceType::Private, Hospital) => CoverageVerdict::new(
                Maybe,
                "Check if your private insurance has international coverage. You may need pre-authorization for hospital visits.",
            ),
            (InsuranceType::Private, WalkInClinic) => CoverageVerdict::new(
                Maybe,
                "Some private insurance plans cover international urgent care, but often with higher co-pays.",
            ),
            (InsuranceType::Private, Pharmacy) => CoverageVerdict::new(
                Maybe,
                "Private insurance coverage for international pharmacy visits varies widely by provider.",
            ),
            (InsuranceType::Uninsured, Hospital) => CoverageVerdict::new(
                NotCovered,
                "Without insurance, you'll be responsible for all hospital costs. Consider travel insurance for future trips.",
            ),
            (InsuranceType::Uninsured, WalkInClinic) => CoverageVerdict::new(
                NotCovered,
                "You'll need to pay out-of-pocket for walk-in clinic services.",
            ),
            (InsuranceType::Uninsured, Pharmacy) => CoverageVerdict::new(
                NotCovered,
                "You'll need to pay the full price for medications and pharmacy services.",
            ),
            (InsuranceType::Unrecognized(_), _) => CoverageVerdict::new(Maybe, UNRECOGNIZED_NOTE),
        }
    }
}
