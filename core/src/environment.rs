//! Injected dependencies: time and identifier generation.
//!
//! Business logic never calls `Utc::now()` or generates ids directly;
//! it goes through these traits so tests can pin time and make ids
//! predictable.

use crate::types::{BookingId, ConfirmationCode, IdempotencyKey};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Clock trait - abstracts time operations for testability.
pub trait Clock: Send + Sync {
    /// Get the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Source of generated identifiers and confirmation codes.
///
/// Generated entity ids take the form `<prefix>_<uuid>`; the per-entity
/// helpers fix the conventional prefixes.
pub trait IdSource: Send + Sync {
    /// A fresh id with the given prefix.
    fn entity_id(&self, prefix: &str) -> String;

    /// A fresh confirmation code.
    fn confirmation_code(&self) -> ConfirmationCode;

    /// A fresh booking id (`book_…`).
    fn booking_id(&self) -> BookingId {
        BookingId::new(self.entity_id("book"))
    }

    /// A fresh idempotency key (`idem_…`), for callers that didn't supply
    /// one.
    fn idempotency_key(&self) -> IdempotencyKey {
        IdempotencyKey::new(self.entity_id("idem"))
    }
}

/// Production id source: UUID v4 entity ids and random confirmation codes.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn entity_id(&self, prefix: &str) -> String {
        format!("{prefix}_{}", Uuid::new_v4().simple())
    }

    fn confirmation_code(&self) -> ConfirmationCode {
        ConfirmationCode::random()
    }
}
