//! User profile attributes supplied by the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::foundation::ValidationError;

fn default_language() -> String {
    "English".to_string()
}

/// Geographic coordinates reported by the user's device.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// Creates a location, rejecting out-of-range coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ValidationError::out_of_range("latitude", -90.0, 90.0, latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ValidationError::out_of_range("longitude", -180.0, 180.0, longitude));
        }
        Ok(Self { latitude, longitude })
    }
}

/// Reference to an uploaded insurance document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceDocument {
    pub original_name: String,
    pub stored_name: String,
    pub size_bytes: u64,
    pub sha256: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Profile attributes read by every step and never changed by them.
///
/// Blank strings and empty lists mean "not provided".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub nationality: String,
    #[serde(default)]
    pub insurance_type: String,
    #[serde(default)]
    pub insurance_provider: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub city: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub chronic_conditions: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub location: Option<Location>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            nationality: String::new(),
            insurance_type: String::new(),
            insurance_provider: String::new(),
            country: String::new(),
            city: String::new(),
            language: default_language(),
            chronic_conditions: Vec::new(),
            allergies: Vec::new(),
            location: None,
        }
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

impl UserProfile {
    pub fn insurance_type(&self) -> Option<&str> {
        non_blank(&self.insurance_type)
    }

    pub fn country(&self) -> Option<&str> {
        non_blank(&self.country)
    }

    pub fn city(&self) -> Option<&str> {
        non_blank(&self.city)
    }

    /// Applies a partial update. Absent fields are left untouched.
    pub fn apply(&mut self, update: ProfileUpdate) {
        let ProfileUpdate {
            nationality,
            insurance_type,
            insurance_provider,
            country,
            city,
            language,
            chronic_conditions,
            allergies,
        } = update;

        let assign = |slot: &mut String, value: Option<String>| {
            if let Some(value) = value {
                *slot = value.trim().to_string();
            }
        };
        assign(&mut self.nationality, nationality);
        assign(&mut self.insurance_type, insurance_type);
        assign(&mut self.insurance_provider, insurance_provider);
        assign(&mut self.country, country);
        assign(&mut self.city, city);
        assign(&mut self.language, language);

        if let Some(items) = chronic_conditions {
            self.chronic_conditions = items;
        }
        if let Some(items) = allergies {
            self.allergies = items;
        }
    }

    /// Records device coordinates, optionally with the city and country
    /// they resolve to.
    pub fn set_location(&mut self, location: Location, city: Option<String>, country: Option<String>) {
        self.location = Some(location);
        if let Some(city) = city.as_deref().and_then(non_blank) {
            self.city = city.to_string();
        }
        if let Some(country) = country.as_deref().and_then(non_blank) {
            self.country = country.to_string();
        }
    }

    /// `key: value` lines for every provided attribute, in a fixed order.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let scalars = [
            ("nationality", &self.nationality),
            ("insurance_type", &self.insurance_type),
            ("insurance_provider", &self.insurance_provider),
            ("country", &self.country),
            ("city", &self.city),
            ("language", &self.language),
        ];
        for (key, value) in scalars {
            if let Some(value) = non_blank(value) {
                lines.push(format!("{}: {}", key, value));
            }
        }
        for (key, items) in [
            ("chronic_conditions", &self.chronic_conditions),
            ("allergies", &self.allergies),
        ] {
            if !items.is_empty() {
                lines.push(format!("{}: {}", key, items.join(", ")));
            }
        }
        if let Some(location) = &self.location {
            lines.push(format!(
                "location: {:.4}, {:.4}",
                location.latitude, location.longitude
            ));
        }
        lines
    }
}

/// A partial profile update. Unknown keys are ignored.
///
/// List attributes accept either a JSON array or a comma-separated string.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub insurance_type: Option<String>,
    #[serde(default)]
    pub insurance_provider: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "list_or_comma_separated")]
    pub chronic_conditions: Option<Vec<String>>,
    #[serde(default, deserialize_with = "list_or_comma_separated")]
    pub allergies: Option<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListInput {
    List(Vec<String>),
    Text(String),
}

fn list_or_comma_separated<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let input = Option::<ListInput>::deserialize(deserializer)?;
    let items = match input {
        None => return Ok(None),
        Some(ListInput::List(items)) => items,
        Some(ListInput::Text(text)) => text.split(',').map(str::to_string).collect(),
    };
    Ok(Some(
        items
            .into_iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect(),
    ))
}
