//! PostgreSQL store implementations for the Medbook platform.
//!
//! Each collection lives in its own table: the full document as JSONB
//! plus the key and guard columns the conditional writes need. The two
//! concurrency-bearing operations map onto single SQL statements, so the
//! database provides the atomicity the store contract requires:
//!
//! - create-if-absent: `INSERT … ON CONFLICT DO NOTHING`, zero rows
//!   affected means the key existed
//! - status compare-and-swap: `UPDATE … WHERE booking_id = $1 AND
//!   status = $expected`, zero rows affected means the guard failed
//!
//! Table names are supplied by the application's configuration at
//! construction time and validated against a conservative identifier
//! shape; nothing in this crate reads process environment.
//!
//! # Example
//!
//! ```ignore
//! use medbook_postgres::PostgresBookingStore;
//!
//! async fn example(pool: sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
//!     let bookings = PostgresBookingStore::new(pool, "bookings")?;
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bookings;
pub mod catalog;
pub mod sessions;

pub use bookings::PostgresBookingStore;
pub use catalog::{PostgresPracticeStore, PostgresProviderStore};
pub use sessions::PostgresSessionStore;

use medbook_core::store::StoreError;

/// Validate a configured table name against a conservative identifier
/// shape (`[a-z_][a-z0-9_]*`), so config values can be interpolated into
/// SQL safely.
///
/// # Errors
///
/// Returns [`StoreError::Backend`] when the name doesn't fit the shape.
pub(crate) fn checked_table_name(name: &str) -> Result<String, StoreError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_lowercase() || first == '_')
                && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(name.to_string())
    } else {
        Err(StoreError::Backend(format!(
            "invalid table name: {name:?}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_identifiers() {
        for name in ["bookings", "medbook_sessions", "_private", "t2"] {
            assert!(checked_table_name(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn rejects_anything_that_could_escape_a_statement() {
        for name in ["", "Bookings", "book-ings", "bookings; drop table x", "1st", "a.b"] {
            assert!(checked_table_name(name).is_err(), "{name}");
        }
    }
}
