//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! visa-desk-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `SITE_DATABASE_URL` / `DATABASE_URL` - `SQLite` URL (default: sqlite://visa-desk.db)
//!
//! Runs the embedded schema migrations from `crates/server/migrations/`, then
//! creates the session table used by the session store.

use thiserror::Error;

use visa_desk_server::config::database_url_from_env;
use visa_desk_server::db;
use visa_desk_server::middleware::create_session_store;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Session table could not be created.
    #[error("Session store error: {0}")]
    SessionStore(sqlx::Error),
}

/// Run all database migrations.
pub async fn run() -> Result<(), MigrationError> {
    let database_url = database_url_from_env();

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Running schema migrations...");
    db::migrate(&pool).await?;

    tracing::info!("Creating session table...");
    create_session_store(&pool)
        .migrate()
        .await
        .map_err(MigrationError::SessionStore)?;

    tracing::info!("Migrations complete!");
    Ok(())
}
