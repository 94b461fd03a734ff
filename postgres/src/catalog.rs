//! PostgreSQL practice and provider stores.

use crate::checked_table_name;
use medbook_core::catalog::{Practice, Provider};
use medbook_core::store::{PracticeStore, ProviderStore, StoreError, StoreFuture};
use medbook_core::types::{PracticeId, ProviderId};
use sqlx::PgPool;

fn backend(error: sqlx::Error) -> StoreError {
    StoreError::Backend(error.to_string())
}

fn serialization(error: serde_json::Error) -> StoreError {
    StoreError::Serialization(error.to_string())
}

/// Practice store backed by a PostgreSQL table.
pub struct PostgresPracticeStore {
    pool: PgPool,
    table: String,
}

impl PostgresPracticeStore {
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
}

impl PracticeStore for PostgresPracticeStore {
    fn put(&self, practice: Practice) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            let document = serde_json::to_value(&practice).map_err(serialization)?;

            let query = format!(
                "INSERT INTO {table} (practice_id, tenant_id, document, created_at, updated_at) \
                 VALUES ($1, $2, $3, $4, $5) \
                 ON CONFLICT (practice_id) DO UPDATE \
                 SET tenant_id = EXCLUDED.tenant_id, \
                     document = EXCLUDED.document, \
                     updated_at = EXCLUDED.updated_at",
                table = self.table
            );

            sqlx::query(&query)
                .bind(practice.practice_id.as_str())
                .bind(practice.tenant_id.as_str())
                .bind(&document)
                .bind(practice.created_at)
                .bind(practice.updated_at)
                .execute(&self.pool)
                .await
                .map_err(backend)?;

            Ok(())
        })
    }

    fn fetch(&self, id: PracticeId) -> StoreFuture<'_, Option<Practice>> {
        Box::pin(async move {
            let query = format!(
                "SELECT document FROM {table} WHERE practice_id = $1",
                table = self.table
            );

            let row: Option<(serde_json::Value,)> = sqlx::query_as(&query)
                .bind(id.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(backend)?;

            row.map(|(document,)| serde_json::from_value(document).map_err(serialization))
                .transpose()
        })
    }

    fn list_recent(&self, limit: u32) -> StoreFuture<'_, Vec<Practice>> {
        Box::pin(async move {
            let query = format!(
                "SELECT document FROM {table} ORDER BY created_at DESC LIMIT $1",
                table = self.table
            );

            let rows: Vec<(serde_json::Value,)> = sqlx::query_as(&query)
                .bind(i64::from(limit))
                .fetch_all(&self.pool)
                .await
                .map_err(backend)?;

            rows.into_iter()
                .map(|(document,)| serde_json::from_value(document).map_err(serialization))
                .collect()
        })
    }
}

/// Provider store backed by a PostgreSQL table.
pub struct PostgresProviderStore {
    pool: PgPool,
    table: String,
}

impl PostgresProviderStore {
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
}

impl ProviderStore for PostgresProviderStore {
    fn put(&self, provider: Provider) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            let document = serde_json::to_value(&provider).map_err(serialization)?;

            let query = format!(
                "INSERT INTO {table} \
                     (provider_id, practice_id, tenant_id, document, created_at, updated_at) \
                 VALUES ($1, $2, $3, $4, $5, $6) \
                 ON CONFLICT (provider_id) DO UPDATE \
                 SET practice_id = EXCLUDED.practice_id, \
                     tenant_id = EXCLUDED.tenant_id, \
                     document = EXCLUDED.document, \
                     updated_at = EXCLUDED.updated_at",
                table = self.table
            );

            sqlx::query(&query)
                .bind(provider.provider_id.as_str())
                .bind(provider.practice_id.as_str())
                .bind(provider.tenant_id.as_str())
                .bind(&document)
                .bind(provider.created_at)
                .bind(provider.updated_at)
                .execute(&self.pool)
                .await
                .map_err(backend)?;

            Ok(())
        })
    }

    fn fetch(&self, id: ProviderId) -> StoreFuture<'_, Option<Provider>> {
        Box::pin(async move {
            let query = format!(
                "SELECT document FROM {table} WHERE provider_id = $1",
                table = self.table
            );

            let row: Option<(serde_json::Value,)> = sqlx::query_as(&query)
                .bind(id.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(backend)?;

            row.map(|(document,)| serde_json::from_value(document).map_err(serialization))
                .transpose()
        })
    }

    fn list(&self, practice: Option<PracticeId>) -> StoreFuture<'_, Vec<Provider>> {
        Box::pin(async move {
            let rows: Vec<(serde_json::Value,)> = if let Some(practice) = practice {
                let query = format!(
                    "SELECT document FROM {table} WHERE practice_id = $1 ORDER BY provider_id",
                    table = self.table
                );
                sqlx::query_as(&query)
                    .bind(practice.as_str().to_string())
                    .fetch_all(&self.pool)
                    .await
                    .map_err(backend)?
            } else {
                let query = format!(
                    "SELECT document FROM {table} ORDER BY provider_id",
                    table = self.table
                );
                sqlx::query_as(&query)
                    .fetch_all(&self.pool)
                    .await
                    .map_err(backend)?
            };

            rows.into_iter()
                .map(|(document,)| serde_json::from_value(document).map_err(serialization))
                .collect()
        })
    }
}
