//! The booking entity and its status state machine.
//!
//! A booking is created once, possibly transitioned once (confirmation) and
//! is otherwise immutable. The only implemented transition is
//! `PENDING → CONFIRMED`, guarded at the storage layer by a compare-and-swap
//! on the current status.

use crate::types::{
    BookingId, ConfirmationCode, Contact, IdempotencyKey, PatientId, SlotRef, TenantId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a booking.
///
/// `Cancelled`, `Completed` and `NoShow` are part of the stored vocabulary
/// but no operation reaches them; callers must not assume they are
/// reachable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    /// Created, awaiting confirmation.
    Pending,
    /// Confirmed by the patient.
    Confirmed,
    /// Cancelled (declared, not reachable through this service).
    Cancelled,
    /// Appointment took place (declared, not reachable).
    Completed,
    /// Patient did not attend (declared, not reachable).
    NoShow,
}

impl BookingStatus {
    /// Whether a transition from `self` to `next` is permitted.
    ///
    /// The transition table is deliberately minimal: confirmation is the
    /// only implemented state change.
    #[must_use]
    pub fn can_become(self, next: Self) -> bool {
        matches!((self, next), (Self::Pending, Self::Confirmed))
    }

    /// Stable wire representation, matching the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
            Self::Completed => "COMPLETED",
            Self::NoShow => "NO_SHOW",
        }
    }

    /// Parse the stable wire representation.
    ///
    /// # Errors
    ///
    /// Returns the unrecognized input when it names no known status.
    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "CONFIRMED" => Ok(Self::Confirmed),
            "CANCELLED" => Ok(Self::Cancelled),
            "COMPLETED" => Ok(Self::Completed),
            "NO_SHOW" => Ok(Self::NoShow),
            other => Err(format!("unknown booking status: {other}")),
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The public booking representation.
///
/// This is the shape every API response carries. The idempotency key is not
/// part of it; see [`BookingRecord`] for the stored form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Unique identifier, assigned at creation.
    pub booking_id: BookingId,
    /// Owning tenant, derived from the slot's practice at creation.
    pub tenant_id: TenantId,
    /// Linked patient, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<PatientId>,
    /// Contact snapshot captured at booking time.
    pub contact: Contact,
    /// The slot being booked.
    pub slot_ref: SlotRef,
    /// Current lifecycle status.
    pub status: BookingStatus,
    /// Secret returned to the creator, presented back on confirmation.
    pub confirmation_code: ConfirmationCode,
    /// Free-form notes from the patient.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation.
    pub updated_at: DateTime<Utc>,
}

/// The stored form of a booking: the public representation plus the
/// internal idempotency key.
///
/// Responses are built from the inner [`Booking`], so the key is
/// structurally incapable of leaking to callers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    /// The public booking fields.
    #[serde(flatten)]
    pub booking: Booking,
    /// Duplicate-submission token; recorded, never returned.
    pub idempotency_key: IdempotencyKey,
}

impl BookingRecord {
    /// Pair a booking with its idempotency key.
    #[must_use]
    pub const fn new(booking: Booking, idempotency_key: IdempotencyKey) -> Self {
        Self {
            booking,
            idempotency_key,
        }
    }

    /// The record's key in the booking store.
    #[must_use]
    pub fn booking_id(&self) -> &BookingId {
        &self.booking.booking_id
    }
}

/// A booking creation payload, before the system has stamped identity,
/// tenancy, status and timestamps onto it.
///
/// Parsing is strict: unknown fields, missing required fields and malformed
/// timestamps are rejected at the JSON boundary rather than being carried
/// along.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BookingDraft {
    /// Linked patient, when the caller knows one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<PatientId>,
    /// Contact details for the person booking.
    pub contact: Contact,
    /// The slot to book.
    pub slot_ref: SlotRef,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
