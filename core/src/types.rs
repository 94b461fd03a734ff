//! Identifier and value-object types shared across the platform.
//!
//! All entity identifiers are opaque strings. Ids generated by this system
//! take the form `<prefix>_<uuid>` (for example `book_6f9a…`); ids supplied
//! by callers (slot references, patient ids) are stored verbatim.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a booking. Assigned exactly once, at creation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(String);

impl BookingId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is empty after trimming.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The practice (or `public`) scope a record belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    /// The shared scope for records not owned by any practice.
    pub const PUBLIC: &'static str = "public";

    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The public tenant.
    #[must_use]
    pub fn public() -> Self {
        Self(Self::PUBLIC.to_string())
    }

    /// Derive the owning tenant from a slot's practice, falling back to the
    /// public scope when the practice id is empty.
    #[must_use]
    pub fn for_practice(practice: &PracticeId) -> Self {
        if practice.as_str().trim().is_empty() {
            Self::public()
        } else {
            Self(practice.as_str().to_string())
        }
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a practice.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PracticeId(String);

impl PracticeId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PracticeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a provider (a practitioner at a practice).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(String);

impl ProviderId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for a bookable time slot.
///
/// Slot ids are composed by the session read model
/// (`<sessionId>_<HH:MM>`) and treated as opaque by everything else.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(String);

impl SlotId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a per-provider, per-day session document.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for a registered patient, when the booking is linked to one.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientId(String);

impl PatientId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Token recorded at creation to let repeated submissions of the same
/// logical request be recognized as duplicates.
///
/// Internal-only: stored with the booking record and stripped from every
/// response.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdempotencyKey(String);

impl IdempotencyKey {
    /// Wrap a caller-supplied key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Confirmation code
// ============================================================================

/// Out-of-band secret returned to the booking creator and presented back
/// to authorize confirmation.
///
/// Always exactly [`ConfirmationCode::LENGTH`] characters drawn from
/// `A-Z0-9`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfirmationCode(String);

impl ConfirmationCode {
    /// Number of characters in a code.
    pub const LENGTH: usize = 6;

    const CHARSET: &'static [u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

    /// Wrap an existing code (used when loading stored records).
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Generate a fresh random code.
    #[must_use]
    pub fn random() -> Self {
        let mut rng = rand::thread_rng();
        let code = (0..Self::LENGTH)
            .map(|_| char::from(Self::CHARSET[rng.gen_range(0..Self::CHARSET.len())]))
            .collect();
        Self(code)
    }

    /// Constant-shape comparison against a caller-supplied code.
    #[must_use]
    pub fn matches(&self, supplied: &str) -> bool {
        self.0 == supplied
    }

    /// The code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfirmationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Contact snapshot
// ============================================================================

/// Preferred channel for reaching the patient.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Email (the default).
    #[default]
    Email,
    /// SMS text message.
    Sms,
    /// Voice call.
    Voice,
}

/// Denormalized patient contact details captured at booking time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Email address, used for confirmation delivery.
    pub email: String,
    /// Phone number.
    pub phone: String,
    /// Preferred channel; defaults to email when omitted.
    #[serde(default)]
    pub preferred_channel: Channel,
}

// ============================================================================
// Slot reference
// ============================================================================

/// Immutable reference to the slot being booked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotRef {
    /// The slot identifier, as returned by slot search.
    pub slot_id: SlotId,
    /// Provider the slot belongs to.
    pub provider_id: ProviderId,
    /// Practice the slot belongs to.
    pub practice_id: PracticeId,
    /// Slot start time.
    pub start: chrono::DateTime<chrono::Utc>,
    /// Slot end time.
    pub end: chrono::DateTime<chrono::Utc>,
}

impl SlotRef {
    /// The calendar day the referenced session document is keyed by.
    #[must_use]
    pub fn session_date(&self) -> chrono::NaiveDate {
        self.start.date_naive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn confirmation_code_shape() {
        let code = ConfirmationCode::random();
        assert_eq!(code.as_str().len(), ConfirmationCode::LENGTH);
        assert!(
            code.as_str()
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn confirmation_code_matching() {
        let code = ConfirmationCode::new("AB12CD");
        assert!(code.matches("AB12CD"));
        assert!(!code.matches("ab12cd"));
        assert!(!code.matches(""));
    }

    #[test]
    fn tenant_falls_back_to_public_for_blank_practice() {
        let tenant = TenantId::for_practice(&PracticeId::new(""));
        assert_eq!(tenant.as_str(), TenantId::PUBLIC);

        let tenant = TenantId::for_practice(&PracticeId::new("prac_1"));
        assert_eq!(tenant.as_str(), "prac_1");
    }

    #[test]
    fn channel_defaults_to_email() {
        let contact: Contact = serde_json::from_value(serde_json::json!({
            "firstName": "Jane",
            "lastName": "Doe",
            "email": "jane@example.com",
            "phone": "0400000000"
        }))
        .unwrap();
        assert_eq!(contact.preferred_channel, Channel::Email);
    }

    #[test]
    fn slot_ref_session_date_uses_start_day() {
        let slot_ref: SlotRef = serde_json::from_value(serde_json::json!({
            "slotId": "sess_1_09:00",
            "providerId": "prov_1",
            "practiceId": "prac_1",
            "start": "2025-03-10T09:00:00Z",
            "end": "2025-03-10T09:15:00Z"
        }))
        .unwrap();
        assert_eq!(slot_ref.session_date().to_string(), "2025-03-10");
    }

    proptest! {
        #[test]
        fn confirmation_codes_are_always_six_uppercase_alphanumerics(_seed in 0u32..64) {
            let code = ConfirmationCode::random();
            prop_assert_eq!(code.as_str().len(), 6);
            prop_assert!(code.as_str().chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        }
    }
}
