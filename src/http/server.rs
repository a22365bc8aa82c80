//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the route table and the Axum Router from it
//! - Wire up middleware (tracing, request ID, CORS, trailing slash)
//! - Bound unmatched requests by the request timeout
//! - Serve static assets for unmatched paths when configured
//! - Bind server to listener and shut down gracefully

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{StatusCode, Uri},
    middleware,
    response::IntoResponse,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::controller::ControllerRegistry;
use crate::dispatch::{self, DispatchOptions};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, strip_trailing_slash};
use crate::lifecycle::signals::shutdown_signal;
use crate::namespace::Aggregator;
use crate::routing::RouteTable;

/// Error type for serving.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP server for the module dispatcher.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
    table: Arc<RouteTable>,
}

impl HttpServer {
    /// Build the route table from `aggregator` and the router around it.
    pub fn new(config: AppConfig, aggregator: &dyn Aggregator, controllers: &ControllerRegistry) -> Self {
        let table = Arc::new(RouteTable::build(aggregator, controllers));
        let router = Self::build_router(&config, &table);
        Self { router, config, table }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, table: &RouteTable) -> Router {
        let router = dispatch::router(table, DispatchOptions::from(config));

        // Dispatched routes enforce `request_secs` themselves; the layer
        // bounds only what falls through to the fallback.
        let fallback = match &config.http.static_dir {
            Some(dir) => Router::new().fallback_service(ServeDir::new(dir)),
            None => Router::new().fallback(not_found),
        }
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)));
        let router = router.fallback_service(fallback);

        let router = if config.http.strip_trailing_slash {
            router.layer(middleware::from_fn(strip_trailing_slash))
        } else {
            router
        };

        let router = if config.http.cors_permissive {
            router.layer(CorsLayer::permissive())
        } else {
            router
        };

        router
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// A handle to the fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// The routes this server dispatches.
    pub fn routes(&self) -> &RouteTable {
        &self.table
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run the server until Ctrl+C, SIGTERM or `shutdown` fires.
    pub async fn run(self, listener: TcpListener, shutdown: broadcast::Receiver<()>) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.table.len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn not_found(uri: Uri) -> impl IntoResponse {
    (StatusCode::NOT_FOUND, format!("Cannot find {}", uri.path()))
}
