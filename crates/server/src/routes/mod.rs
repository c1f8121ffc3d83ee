//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Health check
//! GET  /health/ready                    - Readiness (database ping)
//!
//! # Public intake (CORS enabled)
//! POST /api/visa                        - Visa application
//! POST /api/visa-submissions            - Alias of /api/visa
//! POST /api/quick-apply                 - Alias of /api/visa
//! POST /api/contact                     - Contact message
//!
//! # Admin API (session required, 401 otherwise)
//! GET    /api/applications              - List applications (?status=)
//! GET    /api/applications/refresh      - Applications plus counts, for polling
//! GET    /api/applications/{id}         - Application detail
//! PUT    /api/applications/{id}/status  - Change status
//! DELETE /api/applications/{id}         - Delete application
//! GET    /api/contacts                  - List contact messages
//!
//! # Admin pages (session required, redirect to login otherwise)
//! GET  /admin                           - Dashboard (?status=)
//! GET  /admin/applications/{id}         - Application detail page
//!
//! # Auth
//! GET|POST /admin/login                 - Login
//! GET|POST /admin/signup                - Signup (when enabled)
//! GET|POST /admin/logout                - Logout
//!
//! # Assets
//! /static/*                             - Dashboard CSS and JS
//! everything else                       - Public site directory
//! ```

pub mod applications;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod intake;

use std::time::Duration;

use axum::{
    Router,
    http::{HeaderValue, Method, header::CONTENT_TYPE},
    middleware::from_fn,
    routing::{get, post, put},
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tower_sessions_sqlx_store::SqliteStore;
use tracing::Span;

use crate::config::CorsConfig;
use crate::middleware::{
    REQUEST_ID_HEADER, SessionLayerError, create_session_layer, request_id_middleware,
    security_headers_middleware,
};
use crate::state::AppState;

/// Build the CORS layer for the public intake endpoints.
///
/// No configured origins means any origin may post.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins = if config.allowed_origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let parsed: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(%origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60))
}

/// Create the public intake routes router.
pub fn intake_routes(cors: &CorsConfig) -> Router<AppState> {
    Router::new()
        .route("/visa", post(intake::submit_visa))
        .route("/visa-submissions", post(intake::submit_visa))
        .route("/quick-apply", post(intake::submit_visa))
        .route("/contact", post(intake::submit_contact))
        .layer(cors_layer(cors))
}

/// Create the admin JSON API router.
pub fn admin_api_routes() -> Router<AppState> {
    Router::new()
        .route("/applications", get(applications::list))
        .route("/applications/refresh", get(applications::refresh))
        .route(
            "/applications/{id}",
            get(applications::show).delete(applications::delete),
        )
        .route("/applications/{id}/status", put(applications::update_status))
        .route("/contacts", get(applications::contacts))
        .layer(from_fn(security_headers_middleware))
}

/// Create the admin pages router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .route("/applications/{id}", get(dashboard::show))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/logout", get(auth::logout).post(auth::logout))
        .layer(from_fn(security_headers_middleware))
}

/// Create all application routes (without state or outer layers).
pub fn routes(cors: &CorsConfig) -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api", intake_routes(cors).merge(admin_api_routes()))
        .nest("/admin", admin_routes())
}

/// Build the complete application.
///
/// Static assets and the public site are served from the configured
/// directories; every unmatched path falls through to the public site.
///
/// # Errors
///
/// Returns `SessionLayerError` if the session secret cannot sign cookies.
pub fn app(state: AppState, store: SqliteStore) -> Result<Router, SessionLayerError> {
    let config = state.config();
    let session_layer = create_session_layer(store, config)?;

    let router = routes(&config.cors)
        .nest_service("/static", ServeDir::new(&config.static_dir))
        .fallback_service(ServeDir::new(&config.public_dir))
        .layer(session_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    let request_id = request
                        .headers()
                        .get(REQUEST_ID_HEADER)
                        .and_then(|value| value.to_str().ok())
                        .unwrap_or_default();
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state);

    Ok(router)
}
