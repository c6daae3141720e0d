//! Request ID generation and request spans

use axum::http::Request;
use tracing::Span;
use uuid::Uuid;

/// Generate a new request ID using UUID v4
///
/// # Examples
///
/// ```
/// use nordicsense::logging::generate_request_id;
///
/// let request_id = generate_request_id();
/// assert!(!request_id.is_empty());
/// ```
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span for one HTTP request, used as the `TraceLayer` span factory.
///
/// Everything logged while the request is handled (cache hits, provider
/// failures) is attached to this span and so carries the request id.
pub fn request_span<B>(request: &Request<B>) -> Span {
    tracing::info_span!(
        "request",
        request_id = %generate_request_id(),
        method = %request.method(),
        path = %request.uri().path(),
    )
}
