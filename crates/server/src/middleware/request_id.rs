//! Request ID middleware for request tracing and correlation.
//!
//! Runs outside the `TraceLayer`, so the ID is already on the request headers
//! when the request span is created.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream request ID accepted as-is.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Pick the incoming ID when it is usable, otherwise generate a UUID v4.
fn resolve_request_id(incoming: Option<&HeaderValue>) -> HeaderValue {
    incoming
        .filter(|value| {
            let bytes = value.as_bytes();
            !bytes.is_empty()
                && bytes.len() <= MAX_REQUEST_ID_LEN
                && bytes.iter().all(u8::is_ascii_graphic)
        })
        .cloned()
        .unwrap_or_else(|| {
            HeaderValue::from_str(&Uuid::new_v4().to_string())
                .unwrap_or_else(|_| HeaderValue::from_static("unknown"))
        })
}

/// Middleware that ensures every request has a request ID.
///
/// The ID is written back onto the request headers (for the trace span and
/// handlers), tagged on the Sentry scope, and echoed in the response.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = resolve_request_id(request.headers().get(REQUEST_ID_HEADER));

    request
        .headers_mut()
        .insert(HeaderName::from_static(REQUEST_ID_HEADER), request_id.clone());

    if let Ok(id) = request_id.to_str() {
        sentry::configure_scope(|scope| {
            scope.set_tag("request_id", id);
        });
    }

    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(HeaderName::from_static(REQUEST_ID_HEADER), request_id);
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_upstream_id() {
        let incoming = HeaderValue::from_static("cf-1234abcd");
        assert_eq!(resolve_request_id(Some(&incoming)), incoming);
    }

    #[test]
    fn test_generates_uuid_when_missing() {
        let generated = resolve_request_id(None);
        let text = generated.to_str().unwrap_or_default();
        assert!(Uuid::parse_str(text).is_ok());
    }

    #[test]
    fn test_replaces_unusable_id() {
        let spaced = HeaderValue::from_static("has spaces in it");
        assert_ne!(resolve_request_id(Some(&spaced)), spaced);

        let long = HeaderValue::from_str(&"a".repeat(MAX_REQUEST_ID_LEN + 1))
            .unwrap_or_else(|_| HeaderValue::from_static("x"));
        assert_ne!(resolve_request_id(Some(&long)), long);
    }
}
