//! Content negotiation gate
//!
//! The API only speaks JSON: every request except `OPTIONS` must carry
//! `Accept: application/json` exactly, or it is answered with 406 before any
//! handler runs.

use axum::{
    extract::Request,
    http::{header, HeaderMap, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::handlers::ApiError;

pub const JSON_MEDIA_TYPE: &str = "application/json";

/// `axum::middleware::from_fn` gate rejecting non-JSON clients
pub async fn require_json(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS || accepts_json(request.headers()) {
        return next.run(request).await;
    }

    tracing::debug!(
        method = %request.method(),
        path = %request.uri().path(),
        accept = ?request.headers().get(header::ACCEPT),
        "Rejecting request without JSON Accept header"
    );
    ApiError::not_acceptable().into_response()
}

/// True when `Accept` is exactly the JSON media type
///
/// Surrounding whitespace and letter case are ignored; lists, wildcards and
/// parameters are not accepted.
pub fn accepts_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.trim().eq_ignore_ascii_case(JSON_MEDIA_TYPE))
}
