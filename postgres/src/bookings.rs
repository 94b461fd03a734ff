//! PostgreSQL booking store.

use crate::checked_table_name;
use chrono::{DateTime, Utc};
use medbook_core::booking::{BookingRecord, BookingStatus};
use medbook_core::store::{BookingStore, StoreError, StoreFuture};
use medbook_core::types::BookingId;
use sqlx::PgPool;

/// Booking store backed by a PostgreSQL table.
///
/// The full record is stored as a JSONB document alongside the columns
/// the conditional writes key on (`booking_id`, `status`). The
/// `practice_id`/`slot_start` columns exist for operational queries and
/// mirror the slot reference inside the document.
pub struct PostgresBookingStore {
    pool: PgPool,
    table: String,
}

impl PostgresBookingStore {
    /// Create a store over the given pool and configured table name.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] when the table name is not a plain
    /// lowercase identifier.
    pub fn new(pool: PgPool, table: &str) -> Result<Self, StoreError> {
        Ok(Self {
            pool,
            table: checked_table_name(table)?,
        })
    }

    fn backend(error: sqlx::Error) -> StoreError {
        StoreError::Backend(error.to_string())
    }

    fn decode(document: serde_json::Value) -> Result<BookingRecord, StoreError> {
        serde_json::from_value(document).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}

impl BookingStore for PostgresBookingStore {
    fn put_new(&self, record: BookingRecord) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            let document = serde_json::to_value(&record)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            let booking = &record.booking;

            let query = format!(
                "INSERT INTO {table} \
                     (booking_id, tenant_id, practice_id, slot_start, status, document, created_at, updated_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
                 ON CONFLICT (booking_id) DO NOTHING",
                table = self.table
            );

            let result = sqlx::query(&query)
                .bind(booking.booking_id.as_str())
                .bind(booking.tenant_id.as_str())
                .bind(booking.slot_ref.practice_id.as_str())
                .bind(booking.slot_ref.start)
                .bind(booking.status.as_str())
                .bind(&document)
                .bind(booking.created_at)
                .bind(booking.updated_at)
                .execute(&self.pool)
                .await
                .map_err(Self::backend)?;

            if result.rows_affected() == 0 {
                return Err(StoreError::ConditionFailed {
                    key: booking.booking_id.as_str().to_string(),
                });
            }
            Ok(())
        })
    }

    fn fetch(&self, id: BookingId) -> StoreFuture<'_, Option<BookingRecord>> {
        Box::pin(async move {
            let query = format!(
                "SELECT document FROM {table} WHERE booking_id = $1",
                table = self.table
            );

            let row: Option<(serde_json::Value,)> = sqlx::query_as(&query)
                .bind(id.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(Self::backend)?;

            row.map(|(document,)| Self::decode(document)).transpose()
        })
    }

    fn transition(
        &self,
        id: BookingId,
        expected: BookingStatus,
        next: BookingStatus,
        at: DateTime<Utc>,
    ) -> StoreFuture<'_, BookingRecord> {
        Box::pin(async move {
            // The document patch uses the same serde formats the rest of
            // the record is stored with.
            let patch = serde_json::json!({
                "status": next,
                "updatedAt": at,
            });

            let query = format!(
                "UPDATE {table} \
                 SET status = $3, updated_at = $4, document = document || $5 \
                 WHERE booking_id = $1 AND status = $2 \
                 RETURNING document",
                table = self.table
            );

            let row: Option<(serde_json::Value,)> = sqlx::query_as(&query)
                .bind(id.as_str())
                .bind(expected.as_str())
                .bind(next.as_str())
                .bind(at)
                .bind(&patch)
                .fetch_optional(&self.pool)
                .await
                .map_err(Self::backend)?;

            match row {
                Some((document,)) => Self::decode(document),
                None => {
                    // Guard failed or the record is gone; distinguish for
                    // the caller.
                    let exists_query = format!(
                        "SELECT EXISTS (SELECT 1 FROM {table} WHERE booking_id = $1)",
                        table = self.table
                    );
                    let (exists,): (bool,) = sqlx::query_as(&exists_query)
                        .bind(id.as_str())
                        .fetch_one(&self.pool)
                        .await
                        .map_err(Self::backend)?;

                    if exists {
                        Err(StoreError::ConditionFailed {
                            key: id.as_str().to_string(),
                        })
                    } else {
                        Err(StoreError::NotFound {
                            key: id.as_str().to_string(),
                        })
                    }
                }
            }
        })
    }
}
