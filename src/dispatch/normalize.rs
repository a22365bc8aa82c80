//! Reply → HTTP response.

use axum::{http::StatusCode, response::Response};

use crate::controller::ControllerReply;
use crate::http::response::{self, FALLBACK_MESSAGE, INTERNAL_ERROR_MESSAGE};
use crate::routing::BoundRoute;

/// Turn a controller reply into the response sent to the caller.
///
/// Only called when the controller did not commit a response itself.
pub fn normalize(reply: ControllerReply, route: &BoundRoute) -> Response {
    match reply {
        ControllerReply::Redirect { url } => match response::found(&url) {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(
                    module = %route.module_key,
                    url = %url,
                    error = %e,
                    "Controller returned an unusable redirect url"
                );
                internal_error(route)
            }
        },
        ControllerReply::Html { content } => response::html(content),
        ControllerReply::Json { data } => response::json(data),
        ControllerReply::HandledDirectly => fallback(route, None),
        ControllerReply::Unrecognized { error } => fallback(route, error.as_deref()),
    }
}

/// Diagnostic body for replies the dispatcher cannot emit.
pub fn fallback(route: &BoundRoute, error: Option<&str>) -> Response {
    let error = error.filter(|e| !e.is_empty()).unwrap_or(FALLBACK_MESSAGE);
    response::module_report(StatusCode::OK, &route.module_key, &route.descriptor, error)
}

/// 500 for controller load or execution failures.
pub fn internal_error(route: &BoundRoute) -> Response {
    response::module_report(
        StatusCode::INTERNAL_SERVER_ERROR,
        &route.module_key,
        &route.descriptor,
        INTERNAL_ERROR_MESSAGE,
    )
}
