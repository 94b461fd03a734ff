//! Tenant catalog records: practices and the providers who work at them.

use crate::types::{PracticeId, ProviderId, TenantId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

fn default_country() -> String {
    "AU".to_string()
}

/// Street address of a practice.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Street line.
    pub line1: String,
    /// Suburb or locality.
    pub suburb: String,
    /// State or territory.
    pub state: String,
    /// Postal code.
    pub postcode: String,
    /// ISO country code; defaults to `AU`.
    #[serde(default = "default_country")]
    pub country: String,
}

/// Geographic point for a practice.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Geo {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
}

/// Opening hours for one weekday.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningHours {
    /// Day of week, 0 (Sunday) through 6.
    pub day_of_week: u8,
    /// Opening time, `HH:MM`.
    pub open_time: String,
    /// Closing time, `HH:MM`.
    pub close_time: String,
}

/// A medical practice.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Practice {
    /// Unique identifier.
    pub practice_id: PracticeId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Display name.
    pub name: String,
    /// Australian Business Number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abn: Option<String>,
    /// Street address.
    pub address: Address,
    /// Location, when geocoded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo: Option<Geo>,
    /// Services offered.
    pub services: Vec<String>,
    /// Weekly opening hours.
    pub hours: Vec<OpeningHours>,
    /// Billing policy description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_policy: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Payload for registering a practice; identity, tenancy and timestamps
/// are stamped by the service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PracticeDraft {
    /// Display name.
    pub name: String,
    /// Australian Business Number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abn: Option<String>,
    /// Street address.
    pub address: Address,
    /// Location, when geocoded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo: Option<Geo>,
    /// Services offered.
    #[serde(default)]
    pub services: Vec<String>,
    /// Weekly opening hours.
    #[serde(default)]
    pub hours: Vec<OpeningHours>,
    /// Billing policy description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_policy: Option<String>,
}

/// Gender of a provider, as displayed to patients choosing one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Male.
    Male,
    /// Female.
    Female,
    /// Other.
    Other,
}

/// Session generation defaults for a provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRules {
    /// Default appointment length in minutes.
    pub default_session_duration: u32,
    /// Default break between appointments in minutes.
    pub default_break_duration: u32,
}

/// A practitioner working at a practice.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    /// Unique identifier.
    pub provider_id: ProviderId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// The practice this provider works at.
    pub practice_id: PracticeId,
    /// Display name.
    pub name: String,
    /// Gender, when shared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    /// Languages spoken.
    pub languages: Vec<String>,
    /// Clinical specialties.
    pub specialties: Vec<String>,
    /// Session generation defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_rules: Option<SessionRules>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Payload for registering a provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProviderDraft {
    /// The practice this provider works at.
    pub practice_id: PracticeId,
    /// Display name.
    pub name: String,
    /// Gender, when shared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    /// Languages spoken.
    #[serde(default)]
    pub languages: Vec<String>,
    /// Clinical specialties.
    #[serde(default)]
    pub specialties: Vec<String>,
    /// Session generation defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_rules: Option<SessionRules>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn address_country_defaults_to_au() {
        let address: Address = serde_json::from_value(json!({
            "line1": "1 Example St",
            "suburb": "Carlton",
            "state": "VIC",
            "postcode": "3053"
        }))
        .unwrap();
        assert_eq!(address.country, "AU");
    }

    #[test]
    fn practice_draft_rejects_server_stamped_fields() {
        let result: Result<PracticeDraft, _> = serde_json::from_value(json!({
            "name": "Carlton Family Medical",
            "practiceId": "prac_forged",
            "address": {
                "line1": "1 Example St",
                "suburb": "Carlton",
                "state": "VIC",
                "postcode": "3053"
            }
        }));
        assert!(result.is_err());
    }

    #[test]
    fn provider_draft_parses_with_defaults() {
        let draft: ProviderDraft = serde_json::from_value(json!({
            "practiceId": "prac_1",
            "name": "Dr Alex Nguyen"
        }))
        .unwrap();
        assert!(draft.languages.is_empty());
        assert!(draft.session_rules.is_none());
    }
}
