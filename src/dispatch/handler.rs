//! Per-request dispatch.
//!
//! ```text
//! Received → ControllerLoading → ControllerExecuting
//!     → committed by controller    → sent as-is
//!     → reply recognized           → normalized
//!     → reply unrecognized         → diagnostic JSON
//!     ↘ load/exec failure, nothing committed → 500 JSON
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::Request,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures_util::FutureExt;
use tracing::Instrument;

use crate::controller::{ControllerError, ControllerReply, ControllerRequest, ResponseContext};
use crate::dispatch::normalize::{internal_error, normalize};
use crate::dispatch::DispatchOptions;
use crate::http::request::RequestIdExt;
use crate::http::response::module_report;
use crate::observability::metrics;
use crate::routing::BoundRoute;

/// Serve one request for `route`.
pub async fn dispatch(
    route: Arc<BoundRoute>,
    options: Arc<DispatchOptions>,
    params: HashMap<String, String>,
    request: Request,
) -> Response {
    let request_id = request.request_id().unwrap_or("unknown").to_string();
    let span = tracing::info_span!(
        "dispatch",
        request_id = %request_id,
        namespace = %route.namespace,
        module = %route.module_key,
    );
    serve(route, options, params, request).instrument(span).await
}

async fn serve(
    route: Arc<BoundRoute>,
    options: Arc<DispatchOptions>,
    params: HashMap<String, String>,
    request: Request,
) -> Response {
    let start = Instant::now();
    tracing::info!(verb = %route.verb, route = %route.pattern, "Request received");
    if !params.is_empty() {
        tracing::debug!(?params, "Params");
    }

    let deadline = tokio::time::Instant::now() + options.request_timeout;

    let (parts, body) = request.into_parts();
    let read = tokio::time::timeout_at(deadline, axum::body::to_bytes(body, options.max_body_size));
    let raw_body = match read.await {
        Ok(Ok(bytes)) => bytes,
        Err(_) => {
            tracing::warn!(timeout = ?options.request_timeout, "Request body not received in time");
            metrics::record_dispatch(&route.module_key, route.verb.as_str(), "error", start);
            return module_report(
                StatusCode::REQUEST_TIMEOUT,
                &route.module_key,
                &route.descriptor,
                "Request body not received in time",
            );
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, limit = options.max_body_size, "Rejecting request body");
            metrics::record_dispatch(&route.module_key, route.verb.as_str(), "error", start);
            return module_report(
                StatusCode::PAYLOAD_TOO_LARGE,
                &route.module_key,
                &route.descriptor,
                "Request body too large or unreadable",
            );
        }
    };

    let controller_request = ControllerRequest::new(parts.method, parts.uri)
        .with_route(route.pattern.clone())
        .with_params(params)
        .with_headers(parts.headers)
        .with_body(raw_body);
    if let Some(body) = &controller_request.body {
        tracing::debug!(%body, "Request body");
    }

    let mut response = ResponseContext::new();
    let result = run_controller(&route, &options, deadline, controller_request, &mut response).await;

    let (outcome, reply) = match (response.take(), result) {
        (Some(committed), result) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Controller failed after committing a response");
            }
            ("committed", committed)
        }
        (None, Ok(reply)) => {
            let kind = reply.kind();
            (kind, normalize(reply, &route))
        }
        (None, Err(e)) => {
            tracing::error!(error = %e, load_failure = e.is_load_failure(), "Route handler error");
            ("error", internal_error(&route))
        }
    };

    metrics::record_dispatch(&route.module_key, route.verb.as_str(), outcome, start);
    tracing::debug!(
        outcome,
        status = reply.status().as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Request dispatched"
    );
    reply
}

/// Load and invoke the controller, folding panics and timeouts into errors.
///
/// The run ends at `deadline` or after the controller timeout, whichever
/// comes first.
async fn run_controller(
    route: &BoundRoute,
    options: &DispatchOptions,
    deadline: tokio::time::Instant,
    request: ControllerRequest,
    response: &mut ResponseContext,
) -> Result<ControllerReply, ControllerError> {
    let controller = route.controller.load()?;

    let started = tokio::time::Instant::now();
    let cutoff = match options.controller_timeout {
        Some(limit) => deadline.min(started + limit),
        None => deadline,
    };

    let invocation = AssertUnwindSafe(controller.handle(request, response)).catch_unwind();
    let outcome = tokio::time::timeout_at(cutoff, invocation)
        .await
        .map_err(|_| ControllerError::TimedOut(cutoff.saturating_duration_since(started)))?;

    outcome.unwrap_or_else(|payload| Err(ControllerError::Panicked(panic_message(payload.as_ref()))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Root redirect to the module listing.
pub async fn redirect_root(listing_path: Arc<str>) -> Response {
    crate::http::response::found(&listing_path).unwrap_or_else(|e| {
        tracing::error!(listing_path = %listing_path, error = %e, "Invalid listing path");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    })
}
