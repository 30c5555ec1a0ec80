//! Facility search.
//!
//! No real mapping service is queried. A known city yields a map-search
//! link plus a short deterministic list of synthetic facilities.

use reqwest::Url;
use serde::{Deserialize, Serialize};

use super::urgency::{CareCategory, UrgencyTier};

/// Default base for map-search links.
pub const DEFAULT_MAP_SEARCH_BASE: &str = "https://www.google.com/maps/search/";

const FACILITY_MAP_BASE: &str = "https://maps.google.com/";

/// A candidate facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityRecord {
    pub name: String,
    pub address: String,
    pub distance: String,
    #[serde(rename = "type")]
    pub facility_type: String,
    pub rating: f64,
    pub wait_estimate: String,
    pub phone: String,
    pub map_url: String,
}

/// Output of one facility search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacilitySearch {
    pub map_link: Option<String>,
    pub facilities: Vec<FacilityRecord>,
}

impl FacilitySearch {
    pub fn is_empty(&self) -> bool {
        self.map_link.is_none() && self.facilities.is_empty()
    }
}

/// Search term used in map links for each care category.
pub fn search_term(care: CareCategory) -> &'static str {
    match care {
        CareCategory::Hospital => "hospitals",
        CareCategory::WalkInClinic => "urgent care clinics",
        CareCategory::Pharmacy => "pharmacies",
    }
}

fn facility_types(urgency: Option<UrgencyTier>) -> &'static [&'static str] {
    match urgency {
        Some(UrgencyTier::Severe) => &["Emergency Room"],
        Some(UrgencyTier::Moderate) => &["Urgent Care", "Emergency Room"],
        Some(UrgencyTier::Mild) | None => &["Primary Care", "Urgent Care"],
    }
}

/// Builds map-search links and synthetic facility lists.
#[derive(Debug, Clone)]
pub struct FacilityLocator {
    map_search_base: String,
}

impl FacilityLocator {
    pub fn new() -> Self {
        Self {
            map_search_base: DEFAULT_MAP_SEARCH_BASE.to_string(),
        }
    }

    /// Overrides the map-search base URL.
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        self.map_search_base = base.into();
        self
    }

    /// Runs a search. A missing or blank city yields an empty result.
    pub fn locate(
        &self,
        city: Option<&str>,
        care: CareCategory,
        urgency: Option<UrgencyTier>,
    ) -> FacilitySearch {
        let city = match city.map(str::trim).filter(|c| !c.is_empty()) {
            Some(city) => city,
            None => return FacilitySearch::default(),
        };

        FacilitySearch {
            map_link: self.map_link(city, care),
            facilities: self.synthetic_facilities(city, urgency),
        }
    }

    /// Builds a map-search link for `"<term> in <city>"`.
    ///
    /// Returns `None` if the configured base is not a usable URL.
    pub fn map_link(&self, city: &str, care: CareCategory) -> Option<String> {
        let query = format!("{} in {}", search_term(care), city);
        let mut url = Url::parse(&self.map_search_base).ok()?;
        url.path_segments_mut().ok()?.pop_if_empty().push(&query);
        Some(url.to_string())
    }

    fn synthetic_facilities(&self, city: &str, urgency: Option<UrgencyTier>) -> Vec<FacilityRecord> {
        facility_types(urgency)
            .iter()
            .enumerate()
            .map(|(i, facility_type)| {
                let address = format!("{} Medical Parkway, {}", 100 + i, city);
                let map_url = Url::parse_with_params(FACILITY_MAP_BASE, &[("q", address.as_str())])
                    .map(|u| u.to_string())
                    .unwrap_or_default();
                let rating = ((4.5 - 0.2 * i as f64) * 10.0).round() / 10.0;

                FacilityRecord {
                    name: format!("{} Center {}", facility_type, i + 1),
                    address,
                    distance: format!("{} miles", i + 1),
                    facility_type: facility_type.to_string(),
                    rating,
                    wait_estimate: format!("{} minutes", (i + 1) * 15),
                    phone: format!("555-{}", 100 + i),
                    map_url,
                }
            })
            .collect()
    }
}

impl Default for FacilityLocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_link_percent_encodes_query() {
        let link = FacilityLocator::new().map_link("Paris", CareCategory::Pharmacy).unwrap();
        assert_eq!(link, "https://www.google.com/maps/search/pharmacies%20in%20Paris");
    }

    #[test]
    fn map_link_uses_category_search_term() {
        let link = FacilityLocator::new()
            .map_link("Lyon", CareCategory::WalkInClinic)
            .unwrap();
        assert!(link.contains("urgent%20care%20clinics%20in%20Lyon"));
    }

    #[test]
    fn map_link_rejects_unusable_base() {
        let locator = FacilityLocator::new().with_base_url("not a url");
        assert!(locator.map_link("Paris", CareCategory::Hospital).is_none());
    }

    #[test]
    fn no_city_yields_empty_result() {
        let locator = FacilityLocator::new();
        assert!(locator.locate(None, CareCategory::Hospital, Some(UrgencyTier::Severe)).is_empty());
        assert!(locator.locate(Some("   "), CareCategory::Hospital, None).is_empty());
    }

    #[test]
    fn severe_yields_single_emergency_room() {
        let result = FacilityLocator::new().locate(Some("Rome"), CareCategory::Hospital, Some(UrgencyTier::Severe));

        assert_eq!(result.facilities.len(), 1);
        let er = &result.facilities[0];
        assert_eq!(er.name, "Emergency Room Center 1");
        assert_eq!(er.address, "100 Medical Parkway, Rome");
        assert_eq!(er.rating, 4.5);
        assert_eq!(er.wait_estimate, "15 minutes");
        assert_eq!(er.phone, "555-100");
        assert!(er.map_url.starts_with("https://maps.google.com/?q=100+Medical+Parkway"));
    }

    #[test]
    fn mild_yields_two_records_with_decreasing_rating() {
        let result = FacilityLocator::new().locate(Some("Paris"), CareCategory::Pharmacy, Some(UrgencyTier::Mild));

        let types: Vec<_> = result.facilities.iter().map(|f| f.facility_type.as_str()).collect();
        assert_eq!(types, vec!["Primary Care", "Urgent Care"]);
        assert_eq!(result.facilities[1].rating, 4.3);
        assert_eq!(result.facilities[1].wait_estimate, "30 minutes");
        assert_eq!(result.facilities[1].distance, "2 miles");
        assert!(result.map_link.unwrap().contains("Paris"));
    }

    #[test]
    fn facility_type_serializes_as_type() {
        let result = FacilityLocator::new().locate(Some("Oslo"), CareCategory::WalkInClinic, Some(UrgencyTier::Moderate));
        let json = serde_json::to_value(&result.facilities[0]).unwrap();
        assert_eq!(json["type"], "Urgent Care");
    }
}
