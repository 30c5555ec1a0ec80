//! Claim document checklist.

use super::coverage::InsuranceType;
use super::urgency::CareCategory;

const BASE_ITEMS: [&str; 4] = [
    "Receipt with itemized costs from the healthcare provider",
    "Medical report or treatment summary",
    "Copy of your passport/ID",
    "Copy of your insurance card/policy",
];

fn insurance_items(insurance: &InsuranceType) -> &'static [&'static str] {
    match insurance {
        InsuranceType::Travel => &[
            "Completed claim form from your travel insurance provider",
            "Proof of travel (e.g., flight tickets or boarding passes)",
        ],
        InsuranceType::Ehic => &[
            "EHIC card details",
            "Any forms provided by the healthcare facility for EHIC patients",
        ],
        InsuranceType::Private => &[
            "Pre-authorization documentation (if required by your insurance)",
            "Referral documentation (if you were referred by another doctor)",
        ],
        InsuranceType::Uninsured => &[
            "Consider applying for emergency assistance from your embassy/consulate",
            "Ask the healthcare provider about payment plans or discounts for self-pay patients",
        ],
        InsuranceType::Unrecognized(_) => &[],
    }
}

fn care_items(care: CareCategory) -> &'static [&'static str] {
    match care {
        CareCategory::Hospital => &[
            "Discharge summary",
            "Any lab or test results",
            "Prescription copies for medications",
        ],
        CareCategory::WalkInClinic => &["Visit summary", "Follow-up instructions"],
        CareCategory::Pharmacy => &[
            "Prescription from doctor (if applicable)",
            "Packaging or information leaflets for medications purchased",
        ],
    }
}

/// Builds the ordered list of documents needed for an insurance claim:
/// base items, then insurance-specific, then care-specific.
#[derive(Debug, Clone, Default)]
pub struct ClaimChecklistBuilder;

impl ClaimChecklistBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, insurance: &InsuranceType, care: Option<CareCategory>) -> Vec<String> {
        BASE_ITEMS
            .iter()
            .chain(insurance_items(insurance))
            .chain(care.map(care_items).unwrap_or(&[]))
            .map(|item| item.to_string())
            .collect()
    }
}
