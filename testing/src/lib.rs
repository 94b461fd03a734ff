//! # Medbook Testing
//!
//! Testing utilities and deterministic doubles for the Medbook platform.
//!
//! This crate provides:
//! - Mock implementations of environment traits (fixed clock, sequential
//!   id source, recording event sink)
//! - In-memory store implementations with the same conditional-write
//!   semantics as the production stores
//! - Fixture builders for common test data
//!
//! ## Example
//!
//! ```ignore
//! use medbook_testing::{fixtures, mocks, InMemoryBookingStore};
//!
//! #[tokio::test]
//! async fn test_booking_flow() {
//!     let bookings = Arc::new(InMemoryBookingStore::new());
//!     let sessions = Arc::new(InMemorySessionStore::new());
//!     sessions.put(fixtures::session()).await.unwrap();
//!
//!     let lifecycle = BookingLifecycle::new(bookings, sessions, /* … */);
//!     let booking = lifecycle.create(fixtures::booking_draft(), None).await.unwrap();
//!     assert_eq!(booking.status, BookingStatus::Pending);
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod memory;

use chrono::{DateTime, Utc};
use medbook_core::environment::{Clock, IdSource};
use medbook_core::events::BookingEvents;
use medbook_core::types::{BookingId, ConfirmationCode};
use medbook_core::Booking;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Mock implementations for testing.
pub mod mocks {
    use super::{
        AtomicU64, Booking, BookingEvents, BookingId, Clock, ConfirmationCode, DateTime, IdSource,
        Mutex, Ordering, Utc,
    };

    /// Fixed clock for deterministic tests.
    ///
    /// Always returns the same time, making tests reproducible.
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time.
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC).
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// Predictable id source: ids count up per prefix invocation and the
    /// confirmation code is fixed.
    #[derive(Debug, Default)]
    pub struct SequentialIds {
        counter: AtomicU64,
        code: Option<ConfirmationCode>,
    }

    impl SequentialIds {
        /// Create a source starting at 1, with the default code `AB12CD`.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Use a specific confirmation code instead of the default.
        #[must_use]
        pub fn with_code(code: impl Into<String>) -> Self {
            Self {
                counter: AtomicU64::new(0),
                code: Some(ConfirmationCode::new(code)),
            }
        }
    }

    impl IdSource for SequentialIds {
        fn entity_id(&self, prefix: &str) -> String {
            let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
            format!("{prefix}_{n:04}")
        }

        fn confirmation_code(&self) -> ConfirmationCode {
            self.code
                .clone()
                .unwrap_or_else(|| ConfirmationCode::new("AB12CD"))
        }
    }

    /// A recorded lifecycle event.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum RecordedEvent {
        /// `booking_created` was emitted.
        Created(BookingId),
        /// `booking_confirmed` was emitted.
        Confirmed(BookingId),
    }

    /// Event sink that captures emitted events for assertions.
    #[derive(Debug, Default)]
    pub struct RecordingEvents {
        events: Mutex<Vec<RecordedEvent>>,
    }

    impl RecordingEvents {
        /// Create an empty sink.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Snapshot of everything emitted so far, in order.
        #[must_use]
        pub fn recorded(&self) -> Vec<RecordedEvent> {
            self.events
                .lock()
                .map(|events| events.clone())
                .unwrap_or_default()
        }
    }

    impl BookingEvents for RecordingEvents {
        fn booking_created(&self, booking: &Booking) {
            if let Ok(mut events) = self.events.lock() {
                events.push(RecordedEvent::Created(booking.booking_id.clone()));
            }
        }

        fn booking_confirmed(&self, booking: &Booking) {
            if let Ok(mut events) = self.events.lock() {
                events.push(RecordedEvent::Confirmed(booking.booking_id.clone()));
            }
        }
    }
}

/// Fixture builders for common test data.
pub mod fixtures {
    use chrono::{NaiveDate, TimeZone, Utc};
    use medbook_core::session::{Session, SessionSlot};
    use medbook_core::types::{
        Channel, Contact, PracticeId, ProviderId, SessionId, SlotId, SlotRef, TenantId,
    };
    use medbook_core::BookingDraft;

    /// The practice used by the standard fixtures.
    #[must_use]
    pub fn practice_id() -> PracticeId {
        PracticeId::new("prac_1")
    }

    /// The provider used by the standard fixtures.
    #[must_use]
    pub fn provider_id() -> ProviderId {
        ProviderId::new("prov_1")
    }

    /// The day the standard session covers (2025-03-10).
    ///
    /// # Panics
    ///
    /// Never; the date is hardcoded and valid.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn session_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).expect("hardcoded date is valid")
    }

    /// A session for `prac_1`/`prov_1` on the standard day with two open
    /// morning slots and one already taken.
    ///
    /// # Panics
    ///
    /// Never; the timestamps are hardcoded and valid.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn session() -> Session {
        let stamp = Utc
            .with_ymd_and_hms(2025, 3, 1, 0, 0, 0)
            .single()
            .expect("hardcoded timestamp is valid");
        Session {
            session_id: SessionId::new("sess_1"),
            tenant_id: TenantId::new("prac_1"),
            provider_id: provider_id(),
            practice_id: practice_id(),
            date: session_date(),
            slots: vec![
                SessionSlot {
                    start: "09:00".to_string(),
                    end: "09:15".to_string(),
                    available: true,
                    appt_type_code: None,
                },
                SessionSlot {
                    start: "09:15".to_string(),
                    end: "09:30".to_string(),
                    available: false,
                    appt_type_code: None,
                },
                SessionSlot {
                    start: "09:30".to_string(),
                    end: "09:45".to_string(),
                    available: true,
                    appt_type_code: Some("long".to_string()),
                },
            ],
            created_at: stamp,
            updated_at: stamp,
        }
    }

    /// A valid booking draft for the 09:00 slot of the standard session.
    ///
    /// # Panics
    ///
    /// Never; the timestamps are hardcoded and valid.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn booking_draft() -> BookingDraft {
        let start = Utc
            .with_ymd_and_hms(2025, 3, 10, 9, 0, 0)
            .single()
            .expect("hardcoded timestamp is valid");
        let end = Utc
            .with_ymd_and_hms(2025, 3, 10, 9, 15, 0)
            .single()
            .expect("hardcoded timestamp is valid");
        BookingDraft {
            patient_id: None,
            contact: Contact {
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                email: "jane@example.com".to_string(),
                phone: "0400000000".to_string(),
                preferred_channel: Channel::Email,
            },
            slot_ref: SlotRef {
                slot_id: SlotId::new("sess_1_09:00"),
                provider_id: provider_id(),
                practice_id: practice_id(),
                start,
                end,
            },
            notes: None,
        }
    }
}

// Re-export commonly used items
pub use memory::{
    FailingBookingStore, InMemoryBookingStore, InMemoryPracticeStore, InMemoryProviderStore,
    InMemorySessionStore,
};
pub use mocks::{FixedClock, RecordedEvent, RecordingEvents, SequentialIds, test_clock};
