//! Authentication extractors for the admin dashboard and admin API.
//!
//! Provides extractors for requiring admin authentication in route handlers.

use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::db::AdminRepository;
use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::models::{CurrentAdmin, session::keys};
use crate::state::AppState;

/// Login page path that browser requests are redirected to.
pub const LOGIN_PATH: &str = "/admin/login";

/// Extractor that requires admin authentication.
///
/// The session must name an admin that still exists in the database. If not,
/// returns a redirect to the login page for browser requests, or 401 JSON for
/// `/api/` requests. A session naming a deleted admin is flushed first.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdminAuth(admin): RequireAdminAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", admin.name)
/// }
/// ```
pub struct RequireAdminAuth(pub CurrentAdmin);

/// Error returned when admin authentication is required but the user is not logged in.
pub enum AdminAuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (for API requests).
    Unauthorized,
    /// The admin lookup itself failed.
    Internal(AppError),
}

impl AdminAuthRejection {
    /// Pick the rejection for a request.
    ///
    /// Nested routers see the path with their prefix stripped, so the
    /// original URI is preferred when the router recorded it.
    fn for_request(parts: &Parts) -> Self {
        let path = parts
            .extensions
            .get::<OriginalUri>()
            .map_or_else(|| parts.uri.path(), |original| original.path());
        Self::for_path(path)
    }

    fn for_path(path: &str) -> Self {
        if path.starts_with("/api/") {
            Self::Unauthorized
        } else {
            Self::RedirectToLogin
        }
    }
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::Unauthorized => {
                AppError::Unauthorized("Authentication required".to_string()).into_response()
            }
            Self::Internal(e) => e.into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireAdminAuth {
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let rejection = || AdminAuthRejection::for_request(parts);

        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(AdminAuthRejection::Unauthorized)?;

        // Get the current admin from the session
        let admin: CurrentAdmin = session
            .get(keys::CURRENT_ADMIN)
            .await
            .ok()
            .flatten()
            .ok_or_else(rejection)?;

        // The account may have been removed since login
        let exists = AdminRepository::new(state.pool())
            .get_by_id(admin.id)
            .await
            .map_err(|e| AdminAuthRejection::Internal(e.into()))?
            .is_some();

        if !exists {
            tracing::warn!(admin_id = %admin.id, "Session names a missing admin, flushing");
            if let Err(e) = session.flush().await {
                tracing::error!(error = %e, "Failed to flush stale session");
            }
            clear_sentry_user();
            return Err(rejection());
        }

        set_sentry_user(admin.id.as_i64(), Some(admin.email.as_str()));
        Ok(Self(admin))
    }
}

/// Extractor that optionally gets the current admin.
///
/// Unlike `RequireAdminAuth`, this does not reject the request and does not
/// hit the database. Used by the login and signup pages to skip ahead when a
/// session already exists.
pub struct OptionalAdminAuth(pub Option<CurrentAdmin>);

impl<S> FromRequestParts<S> for OptionalAdminAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let admin = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentAdmin>(keys::CURRENT_ADMIN)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(admin))
    }
}

/// Helper to set the current admin in the session.
///
/// Cycles the session ID first so a pre-login session ID cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_admin(
    session: &Session,
    admin: &CurrentAdmin,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(keys::CURRENT_ADMIN, admin).await
}

/// Helper to clear the session on logout.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_admin(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
