//! Request handling ahead of dispatch.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) and echo it on the response
//! - Redirect paths with a trailing slash to their canonical form
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - An incoming `x-request-id` is kept, not replaced
//! - Trailing-slash redirects are 301 and keep the query string

use axum::{
    extract::Request,
    http::{header, HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Layer that assigns a request ID to requests lacking one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID), MakeRequestUuid)
}

/// Layer that copies the request ID onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID))
}

/// Read access to the request ID header.
pub trait RequestIdExt {
    fn request_id(&self) -> Option<&str>;
}

impl<B> RequestIdExt for axum::http::Request<B> {
    fn request_id(&self) -> Option<&str> {
        self.headers().get(X_REQUEST_ID).and_then(|v| v.to_str().ok())
    }
}

/// Canonical form of `path`, if it differs only by a trailing slash.
pub fn trimmed_path(path: &str) -> Option<&str> {
    if path == "/" || !path.ends_with('/') {
        return None;
    }
    let trimmed = path.trim_end_matches('/');
    Some(if trimmed.is_empty() { "/" } else { trimmed })
}

/// Middleware redirecting `/path/` to `/path`.
pub async fn strip_trailing_slash(request: Request, next: Next) -> Response {
    let Some(trimmed) = trimmed_path(request.uri().path()) else {
        return next.run(request).await;
    };

    let location = match request.uri().query() {
        Some(query) => format!("{trimmed}?{query}"),
        None => trimmed.to_string(),
    };
    match HeaderValue::try_from(location) {
        Ok(location) => (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response(),
        Err(_) => next.run(request).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trimmed_path() {
        assert_eq!(trimmed_path("/admin/logout/"), Some("/admin/logout"));
        assert_eq!(trimmed_path("/modules//"), Some("/modules"));
        assert_eq!(trimmed_path("//"), Some("/"));
        assert_eq!(trimmed_path("/"), None);
        assert_eq!(trimmed_path("/modules"), None);
    }

    #[test]
    fn test_request_id_ext() {
        let request = axum::http::Request::builder()
            .header(X_REQUEST_ID, "abc")
            .body(())
            .unwrap();
        assert_eq!(request.request_id(), Some("abc"));
    }
}
