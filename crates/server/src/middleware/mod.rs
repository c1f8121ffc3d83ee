//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, added in `main`)
//! 2. Request ID (accept or generate `x-request-id`)
//! 3. `TraceLayer` (request span with the request ID)
//! 4. Session layer (tower-sessions with `SQLite` store)
//! 5. Per-group layers: CORS on intake routes, security headers on admin routes
//! 6. Auth extractors in protected handlers

pub mod auth;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{OptionalAdminAuth, RequireAdminAuth, clear_current_admin, set_current_admin};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use security_headers::security_headers_middleware;
pub use session::{SessionLayerError, create_session_layer, create_session_store};
