//! Admin account management commands.
//!
//! # Usage
//!
//! ```bash
//! visa-desk-cli admin create -e admin@example.com -n "Admin Name" --password '...'
//!
//! # or take the password from the environment
//! SITE_ADMIN_PASSWORD='...' visa-desk-cli admin create -e admin@example.com -n "Admin Name"
//! ```
//!
//! # Environment Variables
//!
//! - `SITE_DATABASE_URL` / `DATABASE_URL` - `SQLite` URL
//! - `SITE_ADMIN_PASSWORD` - Password when `--password` is not given

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use visa_desk_server::config::database_url_from_env;
use visa_desk_server::db;
use visa_desk_server::services::auth::{AuthError, AuthService, NewAdmin};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema is missing or out of date.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Admin already exists.
    #[error("Admin already exists with email: {0}")]
    UserExists(String),

    /// Email, name or password rejected.
    #[error("{0}")]
    Invalid(AuthError),
}

/// Create a new admin account.
///
/// # Arguments
///
/// * `email` - Admin's email address
/// * `name` - Admin's display name
/// * `password` - Login password
///
/// # Returns
///
/// The ID of the created admin.
pub async fn create_user(
    email: &str,
    name: &str,
    password: &SecretString,
) -> Result<i64, AdminError> {
    let database_url = database_url_from_env();

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;
    db::migrate(&pool).await?;

    tracing::info!("Creating admin: {}", email);

    let admin = AuthService::new(&pool)
        .register(NewAdmin {
            email,
            name,
            password: password.expose_secret(),
        })
        .await
        .map_err(|e| match e {
            AuthError::AdminAlreadyExists => AdminError::UserExists(email.to_owned()),
            other => AdminError::Invalid(other),
        })?;

    tracing::info!(
        "Admin created successfully! ID: {}, Email: {}",
        admin.id,
        admin.email
    );

    Ok(admin.id.as_i64())
}
