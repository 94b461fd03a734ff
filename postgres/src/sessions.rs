//! PostgreSQL session store.
//!
//! Sessions are keyed by practice with the calendar day as the sort key,
//! one document per practice per day, so the availability check of
//! booking creation and the date-range query of slot search are both
//! index walks.

use crate::checked_table_name;
use chrono::NaiveDate;
use medbook_core::session::Session;
use medbook_core::store::{SessionStore, StoreError, StoreFuture};
use medbook_core::types::PracticeId;
use sqlx::PgPool;

/// Session store backed by a PostgreSQL table.
pub struct PostgresSessionStore {
    pool: PgPool,
    table: String,
}

impl PostgresSessionStore {
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

    fn decode(document: serde_json::Value) -> Result<Session, StoreError> {
        serde_json::from_value(document).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}

impl SessionStore for PostgresSessionStore {
    fn find_for_day(
        &self,
        practice: PracticeId,
        date: NaiveDate,
    ) -> StoreFuture<'_, Option<Session>> {
        Box::pin(async move {
            let query = format!(
                "SELECT document FROM {table} WHERE practice_id = $1 AND session_date = $2",
                table = self.table
            );

            let row: Option<(serde_json::Value,)> = sqlx::query_as(&query)
                .bind(practice.as_str())
                .bind(date)
                .fetch_optional(&self.pool)
                .await
                .map_err(Self::backend)?;

            row.map(|(document,)| Self::decode(document)).transpose()
        })
    }

    fn query_range(
        &self,
        practice: PracticeId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreFuture<'_, Vec<Session>> {
        Box::pin(async move {
            let query = format!(
                "SELECT document FROM {table} \
                 WHERE practice_id = $1 AND session_date BETWEEN $2 AND $3 \
                 ORDER BY session_date",
                table = self.table
            );

            let rows: Vec<(serde_json::Value,)> = sqlx::query_as(&query)
                .bind(practice.as_str())
                .bind(from)
                .bind(to)
                .fetch_all(&self.pool)
                .await
                .map_err(Self::backend)?;

            rows.into_iter()
                .map(|(document,)| Self::decode(document))
                .collect()
        })
    }

    fn put(&self, session: Session) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            let document = serde_json::to_value(&session)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;

            let query = format!(
                "INSERT INTO {table} \
                     (practice_id, session_date, provider_id, document, created_at, updated_at) \
                 VALUES ($1, $2, $3, $4, $5, $6) \
                 ON CONFLICT (practice_id, session_date) DO UPDATE \
                 SET provider_id = EXCLUDED.provider_id, \
                     document = EXCLUDED.document, \
                     updated_at = EXCLUDED.updated_at",
                table = self.table
            );

            sqlx::query(&query)
                .bind(session.practice_id.as_str())
                .bind(session.date)
                .bind(session.provider_id.as_str())
                .bind(&document)
                .bind(session.created_at)
                .bind(session.updated_at)
                .execute(&self.pool)
                .await
                .map_err(Self::backend)?;

            Ok(())
        })
    }
}
