//! Request dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! RouteTable (startup)
//!     → mod.rs (one axum MethodRouter per path, plus GET / redirect)
//!
//! Request
//!     → handler.rs (load controller, invoke, catch failures)
//!     → normalize.rs (ControllerReply → Response)
//!     → Send to client
//! ```
//!
//! # Design Decisions
//! - Handlers capture their BoundRoute; no lookup at request time
//! - A committed response always wins over the returned reply
//! - Failures never escape as transport errors; callers get a 500 JSON body
//! - Dispatched routes carry their own deadline, so a slow controller still
//!   gets the 500 JSON body rather than a bare timeout status

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Request},
    routing::{get, MethodFilter, MethodRouter},
    Router,
};
use indexmap::IndexMap;

use crate::config::AppConfig;
use crate::manifest::Verb;
use crate::routing::{BoundRoute, RouteTable};

pub mod handler;
pub mod normalize;

pub use handler::dispatch;
pub use normalize::normalize;

/// Per-request dispatch settings.
#[derive(Debug, Clone)]
pub struct DispatchOptions {
    /// Where `GET /` redirects to.
    pub listing_path: String,
    /// Deadline for the whole dispatch: body read plus controller run.
    pub request_timeout: Duration,
    /// Tighter bound on the controller run alone, if any.
    pub controller_timeout: Option<Duration>,
    /// Largest request body buffered for a controller.
    pub max_body_size: usize,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        DispatchOptions::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for DispatchOptions {
    fn from(config: &AppConfig) -> Self {
        let dispatcher = &config.dispatcher;
        Self {
            listing_path: dispatcher.listing_path.clone(),
            request_timeout: Duration::from_secs(config.timeouts.request_secs),
            controller_timeout: dispatcher.controller_timeout_secs.map(Duration::from_secs),
            max_body_size: dispatcher.max_body_size,
        }
    }
}

fn method_filter(verb: Verb) -> MethodFilter {
    match verb {
        Verb::Get => MethodFilter::GET,
        Verb::Post => MethodFilter::POST,
        Verb::Put => MethodFilter::PUT,
        Verb::Delete => MethodFilter::DELETE,
    }
}

fn endpoint(route: Arc<BoundRoute>, options: Arc<DispatchOptions>) -> MethodRouter {
    let filter = method_filter(route.verb);
    let handler = move |params: Option<Path<HashMap<String, String>>>, request: Request| {
        let route = route.clone();
        let options = options.clone();
        async move {
            let params = params.map(|Path(params)| params).unwrap_or_default();
            dispatch(route, options, params, request).await
        }
    };
    MethodRouter::new().on(filter, handler)
}

/// Build the axum router serving every route in `table`.
pub fn router(table: &RouteTable, options: DispatchOptions) -> Router {
    let options = Arc::new(options);
    let listing_path: Arc<str> = Arc::from(options.listing_path.as_str());

    let mut by_path: IndexMap<&str, Vec<&Arc<BoundRoute>>> = IndexMap::new();
    for route in table.routes() {
        by_path.entry(route.path.as_str()).or_default().push(route);
    }

    let root = get(move || handler::redirect_root(listing_path.clone()));
    by_path
        .into_iter()
        .fold(Router::new().route("/", root), |router, (path, routes)| {
            let method_router = routes
                .into_iter()
                .map(|route| endpoint(route.clone(), options.clone()))
                .fold(MethodRouter::new(), |merged, next| merged.merge(next));
            router.route(path, method_router)
        })
}
