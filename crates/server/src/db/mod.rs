//! Database operations for the embedded `SQLite` store.
//!
//! ## Tables
//!
//! - `admin` - Dashboard accounts (Argon2id password hashes)
//! - `contact_submission` - Contact form posts, never updated
//! - `visa_application` - Visa and quick-apply posts; only `status` changes
//! - `tower_sessions` - Session storage, created by the session store itself
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/`, embedded at compile
//! time, and run at startup (unless `SITE_AUTO_MIGRATE=false`) or via:
//! ```bash
//! cargo run -p visa-desk-cli -- migrate
//! ```

pub mod admins;
pub mod applications;
pub mod contacts;

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;

pub use admins::AdminRepository;
pub use applications::ApplicationRepository;
pub use contacts::ContactRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// The database file is created if it does not exist. Connections use WAL
/// journaling and enforce foreign keys.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the database cannot be opened.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Run the embedded schema migrations.
///
/// # Errors
///
/// Returns `MigrateError` if a migration fails or the applied history
/// diverges from the embedded set.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Parse a stored RFC 3339 timestamp.
pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid timestamp '{raw}': {e}")))
}

/// Map a unique-constraint failure to `Conflict`, anything else to `Database`.
pub(crate) fn map_unique_violation(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    #[test]
    fn test_parse_timestamp_millis() {
        let ts = parse_timestamp("2026-03-14T09:26:53.589Z").unwrap();
        assert_eq!(ts.year(), 2026);
        assert_eq!(ts.second(), 53);
        assert_eq!(ts.timestamp_subsec_millis(), 589);
    }

    #[test]
    fn test_parse_timestamp_corrupt() {
        assert!(matches!(
            parse_timestamp("yesterday"),
            Err(RepositoryError::DataCorruption(_))
        ));
    }
}
