//! Response construction shared by the dispatcher and controllers.
//!
//! # Responsibilities
//! - Build the 302, HTML and JSON responses replies normalize into
//! - Build the diagnostic body that echoes module identity back to callers
//!
//! # Design Decisions
//! - Redirects are 302 Found, not axum's default 303
//! - Diagnostic bodies never carry internal failure detail

use axum::{
    body::Body,
    http::{header, header::InvalidHeaderValue, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::manifest::ModuleDescriptor;

/// Error text when a controller returned nothing recognizable.
pub const FALLBACK_MESSAGE: &str = "Controller completed without sending response";

/// Error text for any controller load or execution failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error. Check logs.";

/// 302 Found pointing at `url`.
pub fn found(url: &str) -> Result<Response, InvalidHeaderValue> {
    let location = HeaderValue::try_from(url)?;
    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

/// 200 with an HTML body.
pub fn html(content: String) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, HeaderValue::from_static("text/html; charset=utf-8"))],
        Body::from(content),
    )
        .into_response()
}

/// 200 with a JSON body.
pub fn json(data: serde_json::Value) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

/// Body describing which module answered and why.
#[derive(Debug, Serialize)]
pub struct ModuleReport<'a> {
    pub module: &'a str,
    pub module_info: &'a ModuleDescriptor,
    pub error: &'a str,
}

/// JSON diagnostic response carrying the module key and descriptor.
pub fn module_report(
    status: StatusCode,
    module: &str,
    descriptor: &ModuleDescriptor,
    error: &str,
) -> Response {
    let report = ModuleReport {
        module,
        module_info: descriptor,
        error,
    };
    (status, Json(report)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_found_sets_location() {
        let response = found("/modules").unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/modules");

        assert!(found("/bad\nurl").is_err());
    }

    #[test]
    fn test_html_content_type() {
        let response = html("<p>hi</p>".into());
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html; charset=utf-8");
    }
}
