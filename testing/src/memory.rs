//! In-memory store implementations.
//!
//! These back the integration tests and mirror the production stores'
//! conditional-write semantics exactly: `put_new` fails when the key
//! exists, `transition` is a compare-and-swap on the status field. Both
//! are atomic here by virtue of holding the map's write lock.

use chrono::{DateTime, NaiveDate, Utc};
use medbook_core::booking::{BookingRecord, BookingStatus};
use medbook_core::catalog::{Practice, Provider};
use medbook_core::session::Session;
use medbook_core::store::{
    BookingStore, PracticeStore, ProviderStore, SessionStore, StoreError, StoreFuture,
};
use medbook_core::types::{BookingId, PracticeId, ProviderId};
use std::collections::HashMap;
use std::sync::RwLock;

fn poisoned() -> StoreError {
    StoreError::Backend("store lock poisoned".to_string())
}

/// In-memory booking store.
#[derive(Debug, Default)]
pub struct InMemoryBookingStore {
    records: RwLock<HashMap<String, BookingRecord>>,
}

impl InMemoryBookingStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().map(|map| map.len()).unwrap_or(0)
    }

    /// Whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BookingStore for InMemoryBookingStore {
    fn put_new(&self, record: BookingRecord) -> StoreFuture<'_, ()> {
        let result = (|| {
            let mut records = self.records.write().map_err(|_| poisoned())?;
            let key = record.booking_id().as_str().to_string();
            if records.contains_key(&key) {
                return Err(StoreError::ConditionFailed { key });
            }
            records.insert(key, record);
            Ok(())
        })();
        Box::pin(async move { result })
    }

    fn fetch(&self, id: BookingId) -> StoreFuture<'_, Option<BookingRecord>> {
        let result = self
            .records
            .read()
            .map_err(|_| poisoned())
            .map(|records| records.get(id.as_str()).cloned());
        Box::pin(async move { result })
    }

    fn transition(
        &self,
        id: BookingId,
        expected: BookingStatus,
        next: BookingStatus,
        at: DateTime<Utc>,
    ) -> StoreFuture<'_, BookingRecord> {
        let result = (|| {
            let mut records = self.records.write().map_err(|_| poisoned())?;
            let record = records
                .get_mut(id.as_str())
                .ok_or_else(|| StoreError::NotFound {
                    key: id.as_str().to_string(),
                })?;
            if record.booking.status != expected {
                return Err(StoreError::ConditionFailed {
                    key: id.as_str().to_string(),
                });
            }
            record.booking.status = next;
            record.booking.updated_at = at;
            Ok(record.clone())
        })();
        Box::pin(async move { result })
    }
}

/// In-memory session store, keyed by practice and day.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<(String, NaiveDate), Session>>,
}

impl InMemorySessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn find_for_day(
        &self,
        practice: PracticeId,
        date: NaiveDate,
    ) -> StoreFuture<'_, Option<Session>> {
        let result = self
            .sessions
            .read()
            .map_err(|_| poisoned())
            .map(|sessions| {
                sessions
                    .get(&(practice.as_str().to_string(), date))
                    .cloned()
            });
        Box::pin(async move { result })
    }

    fn query_range(
        &self,
        practice: PracticeId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreFuture<'_, Vec<Session>> {
        let result = self
            .sessions
            .read()
            .map_err(|_| poisoned())
            .map(|sessions| {
                let mut found: Vec<Session> = sessions
                    .values()
                    .filter(|session| {
                        session.practice_id == practice
                            && session.date >= from
                            && session.date <= to
                    })
                    .cloned()
                    .collect();
                found.sort_by_key(|session| session.date);
                found
            });
        Box::pin(async move { result })
    }

    fn put(&self, session: Session) -> StoreFuture<'_, ()> {
        let result = self.sessions.write().map_err(|_| poisoned()).map(
            |mut sessions| {
                sessions.insert(
                    (session.practice_id.as_str().to_string(), session.date),
                    session,
                );
            },
        );
        Box::pin(async move { result })
    }
}

/// In-memory practice store.
#[derive(Debug, Default)]
pub struct InMemoryPracticeStore {
    practices: RwLock<HashMap<String, Practice>>,
}

impl InMemoryPracticeStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PracticeStore for InMemoryPracticeStore {
    fn put(&self, practice: Practice) -> StoreFuture<'_, ()> {
        let result = self
            .practices
            .write()
            .map_err(|_| poisoned())
            .map(|mut practices| {
                practices.insert(practice.practice_id.as_str().to_string(), practice);
            });
        Box::pin(async move { result })
    }

    fn fetch(&self, id: PracticeId) -> StoreFuture<'_, Option<Practice>> {
        let result = self
            .practices
            .read()
            .map_err(|_| poisoned())
            .map(|practices| practices.get(id.as_str()).cloned());
        Box::pin(async move { result })
    }

    fn list_recent(&self, limit: u32) -> StoreFuture<'_, Vec<Practice>> {
        let result = self
            .practices
            .read()
            .map_err(|_| poisoned())
            .map(|practices| {
                let mut found: Vec<Practice> = practices.values().cloned().collect();
                found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                found.truncate(limit as usize);
                found
            });
        Box::pin(async move { result })
    }
}

/// In-memory provider store.
#[derive(Debug, Default)]
pub struct InMemoryProviderStore {
    providers: RwLock<HashMap<String, Provider>>,
}

impl InMemoryProviderStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProviderStore for InMemoryProviderStore {
    fn put(&self, provider: Provider) -> StoreFuture<'_, ()> {
        let result = self
            .providers
            .write()
            .map_err(|_| poisoned())
            .map(|mut providers| {
                providers.insert(provider.provider_id.as_str().to_string(), provider);
            });
        Box::pin(async move { result })
    }

    fn fetch(&self, id: ProviderId) -> StoreFuture<'_, Option<Provider>> {
        let result = self
            .providers
            .read()
            .map_err(|_| poisoned())
            .map(|providers| providers.get(id.as_str()).cloned());
        Box::pin(async move { result })
    }

    fn list(&self, practice: Option<PracticeId>) -> StoreFuture<'_, Vec<Provider>> {
        let result = self
            .providers
            .read()
            .map_err(|_| poisoned())
            .map(|providers| {
                let mut found: Vec<Provider> = providers
                    .values()
                    .filter(|provider| {
                        practice
                            .as_ref()
                            .is_none_or(|practice| provider.practice_id == *practice)
                    })
                    .cloned()
                    .collect();
                found.sort_by(|a, b| a.provider_id.as_str().cmp(b.provider_id.as_str()));
                found
            });
        Box::pin(async move { result })
    }
}

/// Booking store whose every operation fails with a backend error.
///
/// Used to exercise the internal-error path of handlers.
#[derive(Debug, Default)]
pub struct FailingBookingStore;

impl FailingBookingStore {
    /// Create the failing store.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn unavailable() -> StoreError {
        StoreError::Backend("storage unavailable".to_string())
    }
}

impl BookingStore for FailingBookingStore {
    fn put_new(&self, _record: BookingRecord) -> StoreFuture<'_, ()> {
        Box::pin(async move { Err(Self::unavailable()) })
    }

    fn fetch(&self, _id: BookingId) -> StoreFuture<'_, Option<BookingRecord>> {
        Box::pin(async move { Err(Self::unavailable()) })
    }

    fn transition(
        &self,
        _id: BookingId,
        _expected: BookingStatus,
        _next: BookingStatus,
        _at: DateTime<Utc>,
    ) -> StoreFuture<'_, BookingRecord> {
        Box::pin(async move { Err(Self::unavailable()) })
    }
}
