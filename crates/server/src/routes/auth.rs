//! Admin login, signup and logout.
//!
//! Forms post urlencoded bodies; outcomes are reported back to the page
//! through `?error=` and `?success=` codes.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::filters;
use crate::middleware::{OptionalAdminAuth, clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::services::auth::{AuthError, AuthService, MIN_PASSWORD_LENGTH, NewAdmin};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Signup form data.
#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
    pub signup_enabled: bool,
}

/// Signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/signup.html")]
pub struct SignupTemplate {
    pub error: Option<String>,
    pub enabled: bool,
    pub min_password_length: usize,
}

/// Human-readable text for an `?error=` code.
fn error_message(code: &str) -> String {
    match code {
        "credentials" => "Invalid email or password.".to_string(),
        "session" => "Could not start a session. Please try again.".to_string(),
        "disabled" => "Signup is disabled on this site.".to_string(),
        "email" => "Please enter a valid email address.".to_string(),
        "name" => "Please enter your name.".to_string(),
        "weak_password" => {
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters.")
        }
        "password_mismatch" => "Passwords do not match.".to_string(),
        "exists" => "An account with this email already exists.".to_string(),
        _ => "Something went wrong. Please try again.".to_string(),
    }
}

/// Human-readable text for a `?success=` code.
fn success_message(code: &str) -> String {
    match code {
        "created" => "Account created. You can now sign in.".to_string(),
        "logged_out" => "You have been signed out.".to_string(),
        _ => String::new(),
    }
}

/// `?error=` code for a failed signup.
const fn signup_error_code(error: &AuthError) -> &'static str {
    match error {
        AuthError::InvalidEmail(_) => "email",
        AuthError::MissingName => "name",
        AuthError::WeakPassword(_) => "weak_password",
        AuthError::PasswordMismatch => "password_mismatch",
        AuthError::AdminAlreadyExists => "exists",
        AuthError::InvalidCredentials | AuthError::Repository(_) | AuthError::PasswordHash => {
            "failed"
        }
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page, skipping ahead if already signed in.
///
/// GET /admin/login
pub async fn login_page(
    State(state): State<AppState>,
    OptionalAdminAuth(admin): OptionalAdminAuth,
    Query(query): Query<MessageQuery>,
) -> Response {
    if admin.is_some() {
        return Redirect::to("/admin").into_response();
    }

    LoginTemplate {
        error: query.error.as_deref().map(error_message),
        success: query
            .success
            .as_deref()
            .map(success_message)
            .filter(|s| !s.is_empty()),
        signup_enabled: state.config().allow_signup,
    }
    .into_response()
}

/// Handle login form submission.
///
/// POST /admin/login
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let admin = match AuthService::new(state.pool())
        .login(&form.email, &form.password)
        .await
    {
        Ok(admin) => admin,
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!("Admin login failed: invalid credentials");
            return Redirect::to("/admin/login?error=credentials").into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, "Admin login failed");
            return Redirect::to("/admin/login?error=failed").into_response();
        }
    };

    if let Err(e) = set_current_admin(&session, &CurrentAdmin::from(&admin)).await {
        tracing::error!("Failed to set session: {}", e);
        return Redirect::to("/admin/login?error=session").into_response();
    }

    tracing::info!(admin_id = %admin.id, "Admin logged in");
    Redirect::to("/admin").into_response()
}

// =============================================================================
// Signup Routes
// =============================================================================

/// Display the signup page.
///
/// GET /admin/signup
pub async fn signup_page(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    SignupTemplate {
        error: query.error.as_deref().map(error_message),
        enabled: state.config().allow_signup,
        min_password_length: MIN_PASSWORD_LENGTH,
    }
}

/// Handle signup form submission.
///
/// POST /admin/signup
///
/// Refused unless signup is enabled. The new admin must still sign in.
pub async fn signup(State(state): State<AppState>, Form(form): Form<SignupForm>) -> Response {
    if !state.config().allow_signup {
        tracing::warn!("Signup attempted while disabled");
        return Redirect::to("/admin/signup?error=disabled").into_response();
    }

    let new_admin = NewAdmin {
        email: &form.email,
        name: &form.name,
        password: &form.password,
    };

    match AuthService::new(state.pool())
        .signup(new_admin, &form.password_confirm)
        .await
    {
        Ok(_) => Redirect::to("/admin/login?success=created").into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Signup failed");
            let code = signup_error_code(&e);
            Redirect::to(&format!("/admin/signup?error={code}")).into_response()
        }
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Logout and clear session.
///
/// GET|POST /admin/logout
pub async fn logout(session: Session) -> impl IntoResponse {
    if let Err(e) = clear_current_admin(&session).await {
        tracing::error!("Failed to clear session: {}", e);
    }
    crate::error::clear_sentry_user();

    Redirect::to("/admin/login?success=logged_out")
}
