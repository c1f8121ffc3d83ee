//! Session middleware configuration.
//!
//! Sets up `SQLite`-backed sessions using tower-sessions with signed cookies,
//! SameSite=Strict and a 24hr inactivity expiry.

use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use thiserror::Error;
use tower_sessions::cookie::Key;
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use crate::config::SiteConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "visa_desk_session";

/// Session expiry time in seconds (24 hours).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Errors building the session layer.
#[derive(Debug, Error)]
pub enum SessionLayerError {
    /// The session secret cannot be used as a cookie signing key.
    #[error("invalid session signing key: {0}")]
    InvalidKey(String),
}

/// Create the `SQLite` session store.
///
/// The `tower_sessions` table is created by [`SqliteStore::migrate`].
#[must_use]
pub fn create_session_store(pool: &SqlitePool) -> SqliteStore {
    SqliteStore::new(pool.clone())
}

/// Create the session layer with the `SQLite` store.
///
/// # Arguments
///
/// * `store` - Session store sharing the application pool
/// * `config` - Site configuration (for signing secret and HTTPS mode)
///
/// # Errors
///
/// Returns `SessionLayerError::InvalidKey` if the secret is shorter than the
/// 64 bytes a signing key needs.
pub fn create_session_layer(
    store: SqliteStore,
    config: &SiteConfig,
) -> Result<SessionManagerLayer<SqliteStore, SignedCookie>, SessionLayerError> {
    let key = Key::try_from(config.session_secret.expose_secret().as_bytes())
        .map_err(|e| SessionLayerError::InvalidKey(e.to_string()))?;

    Ok(SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
        .with_signed(key))
}
