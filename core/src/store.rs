//! Store traits over the platform's document collections.
//!
//! The storage layer is the system's only concurrency-correctness
//! mechanism, so the contract here is precise about the two conditional
//! writes:
//!
//! - [`BookingStore::put_new`] must fail atomically when the key already
//!   exists (create-if-absent)
//! - [`BookingStore::transition`] must update the status **only if** the
//!   current value equals the expected one (record-level compare-and-swap)
//!
//! Everything else is plain point lookups and range queries. No
//! distributed locks, no multi-record transactions.
//!
//! # Implementations
//!
//! - `medbook-postgres`: production stores, one table per collection
//! - `medbook-testing`: in-memory stores for deterministic tests
//!
//! # Dyn Compatibility
//!
//! The traits use explicit `Pin<Box<dyn Future>>` returns instead of
//! `async fn` so that stores can be held as trait objects
//! (`Arc<dyn BookingStore>`) by the lifecycle manager and handlers.

use crate::booking::{BookingRecord, BookingStatus};
use crate::catalog::{Practice, Provider};
use crate::session::Session;
use crate::types::{BookingId, PracticeId, ProviderId};
use chrono::{DateTime, NaiveDate, Utc};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Boxed future returned by store operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Errors surfaced by store implementations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A conditional write was rejected: the key already existed on
    /// create, or the guarded field no longer held its expected value.
    #[error("conditional write failed for {key}")]
    ConditionFailed {
        /// The key the condition was evaluated against.
        key: String,
    },

    /// The addressed record does not exist.
    #[error("record not found: {key}")]
    NotFound {
        /// The missing key.
        key: String,
    },

    /// Connection or query failure in the backend.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A stored document failed to round-trip through serialization.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    /// Whether this error is a rejected conditional write.
    #[must_use]
    pub const fn is_condition_failed(&self) -> bool {
        matches!(self, Self::ConditionFailed { .. })
    }
}

/// Persistence for booking records.
pub trait BookingStore: Send + Sync {
    /// Write a record, failing with [`StoreError::ConditionFailed`] if a
    /// record with the same booking id already exists. The existence check
    /// and the write are a single atomic operation.
    ///
    /// # Errors
    ///
    /// - `ConditionFailed`: the key already exists
    /// - `Backend` / `Serialization`: storage failure
    fn put_new(&self, record: BookingRecord) -> StoreFuture<'_, ()>;

    /// Point lookup by booking id. Returns `Ok(None)` when absent.
    ///
    /// # Errors
    ///
    /// - `Backend` / `Serialization`: storage failure
    fn fetch(&self, id: BookingId) -> StoreFuture<'_, Option<BookingRecord>>;

    /// Set the status and `updatedAt` of a record, **only if** its current
    /// status equals `expected`. The comparison and the update are a single
    /// atomic operation; on success the updated record is returned.
    ///
    /// # Errors
    ///
    /// - `NotFound`: no record with this id
    /// - `ConditionFailed`: current status differs from `expected`
    /// - `Backend` / `Serialization`: storage failure
    fn transition(
        &self,
        id: BookingId,
        expected: BookingStatus,
        next: BookingStatus,
        at: DateTime<Utc>,
    ) -> StoreFuture<'_, BookingRecord>;
}

/// Read and seed access to session documents.
///
/// Sessions are keyed by practice with the calendar day as a
/// range-queryable sort key.
pub trait SessionStore: Send + Sync {
    /// The session document for one practice and day, if any.
    ///
    /// # Errors
    ///
    /// - `Backend` / `Serialization`: storage failure
    fn find_for_day(
        &self,
        practice: PracticeId,
        date: NaiveDate,
    ) -> StoreFuture<'_, Option<Session>>;

    /// All session documents for a practice within an inclusive date
    /// range, ordered by date.
    ///
    /// # Errors
    ///
    /// - `Backend` / `Serialization`: storage failure
    fn query_range(
        &self,
        practice: PracticeId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreFuture<'_, Vec<Session>>;

    /// Upsert a session document (seeding and schedule management).
    ///
    /// # Errors
    ///
    /// - `Backend` / `Serialization`: storage failure
    fn put(&self, session: Session) -> StoreFuture<'_, ()>;
}

/// Persistence for practice records.
pub trait PracticeStore: Send + Sync {
    /// Upsert a practice.
    ///
    /// # Errors
    ///
    /// - `Backend` / `Serialization`: storage failure
    fn put(&self, practice: Practice) -> StoreFuture<'_, ()>;

    /// Point lookup by practice id. Returns `Ok(None)` when absent.
    ///
    /// # Errors
    ///
    /// - `Backend` / `Serialization`: storage failure
    fn fetch(&self, id: PracticeId) -> StoreFuture<'_, Option<Practice>>;

    /// Most recently created practices, newest first.
    ///
    /// # Errors
    ///
    /// - `Backend` / `Serialization`: storage failure
    fn list_recent(&self, limit: u32) -> StoreFuture<'_, Vec<Practice>>;
}

/// Persistence for provider records.
pub trait ProviderStore: Send + Sync {
    /// Upsert a provider.
    ///
    /// # Errors
    ///
    /// - `Backend` / `Serialization`: storage failure
    fn put(&self, provider: Provider) -> StoreFuture<'_, ()>;

    /// Point lookup by provider id. Returns `Ok(None)` when absent.
    ///
    /// # Errors
    ///
    /// - `Backend` / `Serialization`: storage failure
    fn fetch(&self, id: ProviderId) -> StoreFuture<'_, Option<Provider>>;

    /// All providers, optionally narrowed to one practice.
    ///
    /// # Errors
    ///
    /// - `Backend` / `Serialization`: storage failure
    fn list(&self, practice: Option<PracticeId>) -> StoreFuture<'_, Vec<Provider>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_failed_display_names_the_key() {
        let error = StoreError::ConditionFailed {
            key: "book_123".to_string(),
        };
        assert_eq!(format!("{error}"), "conditional write failed for book_123");
        assert!(error.is_condition_failed());
    }

    #[test]
    fn not_found_is_not_a_condition_failure() {
        let error = StoreError::NotFound {
            key: "book_missing".to_string(),
        };
        assert!(!error.is_condition_failed());
        assert!(format!("{error}").contains("book_missing"));
    }
}
