//! Session documents: the per-provider, per-day availability read model.
//!
//! A session aggregates the day's slots for one provider. Booking creation
//! reads the session for the target practice and day as a best-effort
//! availability check; slot search flattens sessions into concrete
//! [`Slot`]s for clients.

use crate::types::{PracticeId, ProviderId, SessionId, SlotId, TenantId};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// One bookable interval inside a session document.
///
/// Times are stored as `HH:MM` wall-clock strings on the session's date.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSlot {
    /// Start time, `HH:MM`.
    pub start: String,
    /// End time, `HH:MM`.
    pub end: String,
    /// Whether the interval is still open for booking.
    pub available: bool,
    /// Appointment type offered in this interval.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appt_type_code: Option<String>,
}

/// A per-provider, per-day session document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Unique identifier.
    pub session_id: SessionId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// The provider whose day this is.
    pub provider_id: ProviderId,
    /// The practice the provider works at.
    pub practice_id: PracticeId,
    /// Calendar day, the range-queryable sort key.
    pub date: NaiveDate,
    /// The day's intervals.
    pub slots: Vec<SessionSlot>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// A concrete bookable slot, flattened out of a session document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    /// Composed identifier: `<sessionId>_<HH:MM>`.
    pub slot_id: SlotId,
    /// Provider the slot belongs to.
    pub provider_id: ProviderId,
    /// Practice the slot belongs to.
    pub practice_id: PracticeId,
    /// Absolute start time.
    pub start: DateTime<Utc>,
    /// Absolute end time.
    pub end: DateTime<Utc>,
    /// Appointment type code; `standard` when the session doesn't say.
    pub appt_type_code: String,
    /// Always true for flattened slots; unavailable intervals are skipped.
    pub available: bool,
}

impl Session {
    /// Flatten the session into concrete slots, keeping only available
    /// intervals.
    ///
    /// Intervals whose `HH:MM` strings fail to parse are skipped with a
    /// warning rather than failing the whole listing.
    #[must_use]
    pub fn available_slots(&self) -> Vec<Slot> {
        self.slots
            .iter()
            .filter(|slot| slot.available)
            .filter_map(|slot| self.materialize(slot))
            .collect()
    }

    fn materialize(&self, slot: &SessionSlot) -> Option<Slot> {
        let start = self.wall_clock(&slot.start)?;
        let end = self.wall_clock(&slot.end)?;
        Some(Slot {
            slot_id: SlotId::new(format!("{}_{}", self.session_id, slot.start)),
            provider_id: self.provider_id.clone(),
            practice_id: self.practice_id.clone(),
            start,
            end,
            appt_type_code: slot
                .appt_type_code
                .clone()
                .unwrap_or_else(|| "standard".to_string()),
            available: true,
        })
    }

    fn wall_clock(&self, hhmm: &str) -> Option<DateTime<Utc>> {
        match NaiveTime::parse_from_str(hhmm, "%H:%M") {
            Ok(time) => Some(self.date.and_time(time).and_utc()),
            Err(error) => {
                tracing::warn!(
                    session_id = %self.session_id,
                    time = hhmm,
                    %error,
                    "skipping slot with unparsable time"
                );
                None
            }
        }
    }
}
