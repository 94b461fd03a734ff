//! The booking lifecycle manager.
//!
//! Owns creation, retrieval and confirmation of bookings. Concurrency
//! safety comes entirely from the storage layer's conditional writes:
//! creation is a create-if-absent put, confirmation is a compare-and-swap
//! on the status field. The slot-availability check before creation is a
//! plain read of the session document for the target practice and day —
//! it does not reserve the slot, so two concurrent creations against the
//! same slot can both pass it (see DESIGN.md).
//!
//! ```text
//!         create
//!   [·] ───────────► PENDING
//!                       │ confirm (guarded: current == PENDING)
//!                       ▼
//!                   CONFIRMED
//! ```

use chrono::NaiveDate;
use medbook_core::booking::{Booking, BookingDraft, BookingRecord, BookingStatus};
use medbook_core::environment::{Clock, IdSource};
use medbook_core::events::BookingEvents;
use medbook_core::store::{BookingStore, SessionStore, StoreError};
use medbook_core::types::{BookingId, IdempotencyKey, PracticeId, TenantId};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// One field-level validation problem, reported back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// Dotted path of the offending field, e.g. `contact.email`.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl FieldViolation {
    fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Failures of the booking operations.
///
/// Every variant's display string is the stable message the HTTP layer
/// puts in the `error` field of the response body.
#[derive(Error, Debug)]
pub enum BookingError {
    /// The draft failed field-level validation.
    #[error("Validation failed")]
    Validation(Vec<FieldViolation>),

    /// No session document exists for the slot's practice and day.
    #[error("Slot no longer available")]
    SlotUnavailable {
        /// Practice the slot belongs to.
        practice: PracticeId,
        /// The day that was checked.
        date: NaiveDate,
    },

    /// The generated booking id already exists in the store.
    #[error("Duplicate booking request")]
    DuplicateRequest(BookingId),

    /// No booking with this id.
    #[error("Booking not found")]
    NotFound(BookingId),

    /// A confirmation code was supplied and does not match.
    #[error("Invalid confirmation code")]
    InvalidConfirmationCode(BookingId),

    /// The status guard failed: the booking already left PENDING.
    #[error("Booking is not in pending status")]
    NotPending(BookingId),

    /// The booking id path parameter was empty.
    #[error("Booking ID is required")]
    MissingBookingId,

    /// Unclassified storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Owns the booking state machine and the idempotent slot-reservation
/// flow.
///
/// Stateless across requests; every invocation goes straight to the
/// stores. Construct once and share via `Arc`.
pub struct BookingLifecycle {
    bookings: Arc<dyn BookingStore>,
    sessions: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdSource>,
    events: Arc<dyn BookingEvents>,
}

impl BookingLifecycle {
    /// Create a lifecycle manager over the given collaborators.
    #[must_use]
    pub fn new(
        bookings: Arc<dyn BookingStore>,
        sessions: Arc<dyn SessionStore>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdSource>,
        events: Arc<dyn BookingEvents>,
    ) -> Self {
        Self {
            bookings,
            sessions,
            clock,
            ids,
            events,
        }
    }

    /// Create a booking for the slot referenced by the draft.
    ///
    /// The caller-supplied idempotency key (or a generated one) is
    /// recorded on the stored record; it is not checked against prior
    /// submissions.
    ///
    /// # Errors
    ///
    /// - [`BookingError::Validation`]: the draft fails field-level checks
    /// - [`BookingError::SlotUnavailable`]: no session document for the
    ///   slot's practice and day
    /// - [`BookingError::DuplicateRequest`]: the generated booking id
    ///   already exists
    /// - [`BookingError::Store`]: storage failure
    pub async fn create(
        &self,
        draft: BookingDraft,
        supplied_key: Option<IdempotencyKey>,
    ) -> Result<Booking, BookingError> {
        validate_draft(&draft)?;

        let booking_id = self.ids.booking_id();
        let confirmation_code = self.ids.confirmation_code();
        let idempotency_key = supplied_key.unwrap_or_else(|| self.ids.idempotency_key());
        let tenant_id = TenantId::for_practice(&draft.slot_ref.practice_id);
        let date = draft.slot_ref.session_date();

        // Best-effort availability check: the session document must exist
        // for the practice and day. It is not a reservation; the slot
        // itself is not marked taken here.
        let session = self
            .sessions
            .find_for_day(draft.slot_ref.practice_id.clone(), date)
            .await?;
        if session.is_none() {
            tracing::warn!(
                practice_id = %draft.slot_ref.practice_id,
                %date,
                "no session document for requested slot"
            );
            return Err(BookingError::SlotUnavailable {
                practice: draft.slot_ref.practice_id.clone(),
                date,
            });
        }

        let now = self.clock.now();
        let booking = Booking {
            booking_id: booking_id.clone(),
            tenant_id,
            patient_id: draft.patient_id,
            contact: draft.contact,
            slot_ref: draft.slot_ref,
            status: BookingStatus::Pending,
            confirmation_code,
            notes: draft.notes,
            created_at: now,
            updated_at: now,
        };

        match self
            .bookings
            .put_new(BookingRecord::new(booking.clone(), idempotency_key))
            .await
        {
            Ok(()) => {}
            Err(error) if error.is_condition_failed() => {
                return Err(BookingError::DuplicateRequest(booking_id));
            }
            Err(error) => return Err(error.into()),
        }

        self.events.booking_created(&booking);
        Ok(booking)
    }

    /// Look up a booking by id.
    ///
    /// Returns the public representation; the idempotency key is not part
    /// of it.
    ///
    /// # Errors
    ///
    /// - [`BookingError::MissingBookingId`]: blank id
    /// - [`BookingError::NotFound`]: no such booking
    /// - [`BookingError::Store`]: storage failure
    pub async fn get(&self, id: &BookingId) -> Result<Booking, BookingError> {
        if id.is_blank() {
            return Err(BookingError::MissingBookingId);
        }

        match self.bookings.fetch(id.clone()).await? {
            Some(record) => Ok(record.booking),
            None => {
                tracing::warn!(booking_id = %id, "booking not found");
                Err(BookingError::NotFound(id.clone()))
            }
        }
    }

    /// Confirm a pending booking.
    ///
    /// When a confirmation code is supplied it must match the stored one.
    /// When it is omitted the check is skipped and a pending booking is
    /// confirmed without proof (see DESIGN.md). The transition itself is
    /// guarded: the status moves to CONFIRMED only if it is currently
    /// PENDING.
    ///
    /// # Errors
    ///
    /// - [`BookingError::MissingBookingId`]: blank id
    /// - [`BookingError::NotFound`]: no such booking
    /// - [`BookingError::InvalidConfirmationCode`]: supplied code differs
    ///   from the stored one
    /// - [`BookingError::NotPending`]: the booking already left PENDING
    /// - [`BookingError::Store`]: storage failure
    pub async fn confirm(
        &self,
        id: &BookingId,
        code: Option<&str>,
    ) -> Result<Booking, BookingError> {
        if id.is_blank() {
            return Err(BookingError::MissingBookingId);
        }

        let record = self
            .bookings
            .fetch(id.clone())
            .await?
            .ok_or_else(|| BookingError::NotFound(id.clone()))?;

        if let Some(code) = code {
            if !record.booking.confirmation_code.matches(code) {
                return Err(BookingError::InvalidConfirmationCode(id.clone()));
            }
        }

        // The read already shows a finished transition; the CAS below
        // would fail anyway, so fail fast on the explicit table.
        if !record.booking.status.can_become(BookingStatus::Confirmed) {
            return Err(BookingError::NotPending(id.clone()));
        }

        let updated = self
            .bookings
            .transition(
                id.clone(),
                BookingStatus::Pending,
                BookingStatus::Confirmed,
                self.clock.now(),
            )
            .await;

        match updated {
            Ok(record) => {
                self.events.booking_confirmed(&record.booking);
                Ok(record.booking)
            }
            Err(StoreError::ConditionFailed { .. }) => Err(BookingError::NotPending(id.clone())),
            Err(StoreError::NotFound { .. }) => Err(BookingError::NotFound(id.clone())),
            Err(error) => Err(error.into()),
        }
    }
}

fn validate_draft(draft: &BookingDraft) -> Result<(), BookingError> {
    let mut violations = Vec::new();

    if draft.contact.first_name.trim().is_empty() {
        violations.push(FieldViolation::new("contact.firstName", "is required"));
    }
    if draft.contact.last_name.trim().is_empty() {
        violations.push(FieldViolation::new("contact.lastName", "is required"));
    }
    if draft.contact.phone.trim().is_empty() {
        violations.push(FieldViolation::new("contact.phone", "is required"));
    }
    if !is_valid_email(&draft.contact.email) {
        violations.push(FieldViolation::new(
            "contact.email",
            "must be a valid email address",
        ));
    }
    if draft.slot_ref.slot_id.as_str().trim().is_empty() {
        violations.push(FieldViolation::new("slotRef.slotId", "is required"));
    }
    if draft.slot_ref.provider_id.as_str().trim().is_empty() {
        violations.push(FieldViolation::new("slotRef.providerId", "is required"));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(BookingError::Validation(violations))
    }
}

fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use medbook_testing::{
        FailingBookingStore, InMemoryBookingStore, InMemorySessionStore, RecordedEvent,
        RecordingEvents, SequentialIds, fixtures, test_clock,
    };

    struct Harness {
        lifecycle: BookingLifecycle,
        bookings: Arc<InMemoryBookingStore>,
        sessions: Arc<InMemorySessionStore>,
        events: Arc<RecordingEvents>,
    }

    fn harness() -> Harness {
        let bookings = Arc::new(InMemoryBookingStore::new());
        let sessions = Arc::new(InMemorySessionStore::new());
        let events = Arc::new(RecordingEvents::new());
        let lifecycle = BookingLifecycle::new(
            bookings.clone(),
            sessions.clone(),
            Arc::new(test_clock()),
            Arc::new(SequentialIds::new()),
            events.clone(),
        );
        Harness {
            lifecycle,
            bookings,
            sessions,
            events,
        }
    }

    async fn seeded() -> Harness {
        let harness = harness();
        harness.sessions.put(fixtures::session()).await.unwrap();
        harness
    }

    #[tokio::test]
    async fn create_returns_pending_booking_with_code() {
        let harness = seeded().await;

        let booking = harness
            .lifecycle
            .create(fixtures::booking_draft(), None)
            .await
            .unwrap();

        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.booking_id.as_str(), "book_0001");
        assert_eq!(booking.tenant_id.as_str(), "prac_1");
        assert_eq!(booking.confirmation_code.as_str().len(), 6);
        assert_eq!(booking.created_at, booking.updated_at);
        assert_eq!(
            harness.events.recorded(),
            vec![RecordedEvent::Created(booking.booking_id.clone())]
        );
    }

    #[tokio::test]
    async fn create_records_supplied_idempotency_key() {
        let harness = seeded().await;

        let booking = harness
            .lifecycle
            .create(
                fixtures::booking_draft(),
                Some(IdempotencyKey::new("idem_caller")),
            )
            .await
            .unwrap();

        let record = harness
            .bookings
            .fetch(booking.booking_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.idempotency_key.as_str(), "idem_caller");
    }

    #[tokio::test]
    async fn create_without_session_is_slot_unavailable_and_persists_nothing() {
        let harness = harness(); // no session seeded

        let error = harness
            .lifecycle
            .create(fixtures::booking_draft(), None)
            .await
            .unwrap_err();

        assert!(matches!(error, BookingError::SlotUnavailable { .. }));
        assert!(harness.bookings.is_empty());
        assert!(harness.events.recorded().is_empty());
    }

    #[tokio::test]
    async fn create_rejects_invalid_drafts_with_field_details() {
        let harness = seeded().await;
        let mut draft = fixtures::booking_draft();
        draft.contact.first_name = "  ".to_string();
        draft.contact.email = "not-an-email".to_string();

        let error = harness.lifecycle.create(draft, None).await.unwrap_err();

        let BookingError::Validation(violations) = error else {
            panic!("expected validation error");
        };
        let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["contact.firstName", "contact.email"]);
        assert!(harness.bookings.is_empty());
    }

    #[tokio::test]
    async fn simulated_id_collision_is_a_duplicate_request() {
        let harness = seeded().await;

        // SequentialIds restarts at book_0001 for the second manager, so
        // the second create collides with the stored record.
        harness
            .lifecycle
            .create(fixtures::booking_draft(), None)
            .await
            .unwrap();

        let colliding = BookingLifecycle::new(
            harness.bookings.clone(),
            harness.sessions.clone(),
            Arc::new(test_clock()),
            Arc::new(SequentialIds::new()),
            Arc::new(RecordingEvents::new()),
        );
        let error = colliding
            .create(fixtures::booking_draft(), None)
            .await
            .unwrap_err();

        assert!(matches!(error, BookingError::DuplicateRequest(_)));
        assert_eq!(harness.bookings.len(), 1);
    }

    #[tokio::test]
    async fn get_returns_the_public_shape() {
        let harness = seeded().await;
        let created = harness
            .lifecycle
            .create(fixtures::booking_draft(), None)
            .await
            .unwrap();

        let fetched = harness.lifecycle.get(&created.booking_id).await.unwrap();
        assert_eq!(fetched, created);

        let value = serde_json::to_value(&fetched).unwrap();
        assert!(value.get("idempotencyKey").is_none());
    }

    #[tokio::test]
    async fn get_unknown_id_is_not_found() {
        let harness = harness();
        let error = harness
            .lifecycle
            .get(&BookingId::new("book_missing"))
            .await
            .unwrap_err();
        assert!(matches!(error, BookingError::NotFound(_)));
    }

    #[tokio::test]
    async fn get_blank_id_is_missing_parameter() {
        let harness = harness();
        let error = harness
            .lifecycle
            .get(&BookingId::new("   "))
            .await
            .unwrap_err();
        assert!(matches!(error, BookingError::MissingBookingId));
    }

    #[tokio::test]
    async fn confirm_with_matching_code_transitions_to_confirmed() {
        let harness = seeded().await;
        let created = harness
            .lifecycle
            .create(fixtures::booking_draft(), None)
            .await
            .unwrap();

        let confirmed = harness
            .lifecycle
            .confirm(
                &created.booking_id,
                Some(created.confirmation_code.as_str()),
            )
            .await
            .unwrap();

        assert_eq!(confirmed.status, BookingStatus::Confirmed);
        assert_eq!(
            harness.events.recorded().last().unwrap(),
            &RecordedEvent::Confirmed(created.booking_id.clone())
        );
    }

    #[tokio::test]
    async fn confirm_without_code_is_permitted() {
        let harness = seeded().await;
        let created = harness
            .lifecycle
            .create(fixtures::booking_draft(), None)
            .await
            .unwrap();

        let confirmed = harness
            .lifecycle
            .confirm(&created.booking_id, None)
            .await
            .unwrap();
        assert_eq!(confirmed.status, BookingStatus::Confirmed);
    }

    #[tokio::test]
    async fn confirm_with_wrong_code_fails_and_leaves_status_unchanged() {
        let harness = seeded().await;
        let created = harness
            .lifecycle
            .create(fixtures::booking_draft(), None)
            .await
            .unwrap();

        let error = harness
            .lifecycle
            .confirm(&created.booking_id, Some("WRONG1"))
            .await
            .unwrap_err();

        assert!(matches!(error, BookingError::InvalidConfirmationCode(_)));
        let current = harness.lifecycle.get(&created.booking_id).await.unwrap();
        assert_eq!(current.status, BookingStatus::Pending);
    }

    #[tokio::test]
    async fn second_confirm_is_not_pending() {
        let harness = seeded().await;
        let created = harness
            .lifecycle
            .create(fixtures::booking_draft(), None)
            .await
            .unwrap();

        harness
            .lifecycle
            .confirm(&created.booking_id, None)
            .await
            .unwrap();
        let error = harness
            .lifecycle
            .confirm(&created.booking_id, None)
            .await
            .unwrap_err();

        assert!(matches!(error, BookingError::NotPending(_)));
    }

    #[tokio::test]
    async fn confirm_refreshes_updated_at_only() {
        let harness = seeded().await;
        let created = harness
            .lifecycle
            .create(fixtures::booking_draft(), None)
            .await
            .unwrap();

        let confirmed = harness
            .lifecycle
            .confirm(&created.booking_id, None)
            .await
            .unwrap();

        assert_eq!(confirmed.created_at, created.created_at);
        // FixedClock: updated_at equals the (pinned) confirmation time.
        assert_eq!(confirmed.updated_at, test_clock().now());
    }

    #[tokio::test]
    async fn confirm_unknown_booking_is_not_found() {
        let harness = harness();
        let error = harness
            .lifecycle
            .confirm(&BookingId::new("book_missing"), None)
            .await
            .unwrap_err();
        assert!(matches!(error, BookingError::NotFound(_)));
    }

    #[tokio::test]
    async fn store_failures_surface_as_store_errors() {
        let sessions = Arc::new(InMemorySessionStore::new());
        sessions.put(fixtures::session()).await.unwrap();
        let lifecycle = BookingLifecycle::new(
            Arc::new(FailingBookingStore::new()),
            sessions,
            Arc::new(test_clock()),
            Arc::new(SequentialIds::new()),
            Arc::new(RecordingEvents::new()),
        );

        let error = lifecycle
            .create(fixtures::booking_draft(), None)
            .await
            .unwrap_err();
        assert!(matches!(error, BookingError::Store(_)));
    }

    #[test]
    fn email_validation_accepts_plausible_addresses_only() {
        assert!(is_valid_email("jane@example.com"));
        assert!(is_valid_email("j.doe+tag@clinic.net.au"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("jane"));
        assert!(!is_valid_email("jane@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("jane@localhost"));
        assert!(!is_valid_email("jane doe@example.com"));
    }
}
