//! Domain events emitted to external notification and scheduling
//! collaborators.
//!
//! The booking lifecycle announces state changes through this seam;
//! delivery (email, SMS, reminder scheduling) happens outside this
//! system. The production default just logs the event.

use crate::booking::Booking;

/// Sink for booking lifecycle events.
pub trait BookingEvents: Send + Sync {
    /// A booking was created and is awaiting confirmation.
    fn booking_created(&self, booking: &Booking);

    /// A booking moved from pending to confirmed. Reminder scheduling
    /// hangs off this event in downstream systems.
    fn booking_confirmed(&self, booking: &Booking);
}

/// Event sink that records the event in the structured log and nothing
/// else.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogBookingEvents;

impl BookingEvents for LogBookingEvents {
    fn booking_created(&self, booking: &Booking) {
        tracing::info!(
            booking_id = %booking.booking_id,
            practice_id = %booking.slot_ref.practice_id,
            provider_id = %booking.slot_ref.provider_id,
            slot_start = %booking.slot_ref.start,
            "booking created"
        );
    }

    fn booking_confirmed(&self, booking: &Booking) {
        tracing::info!(
            booking_id = %booking.booking_id,
            practice_id = %booking.slot_ref.practice_id,
            "booking confirmed"
        );
    }
}
