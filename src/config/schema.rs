//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the dispatcher.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the module dispatcher.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Process-level HTTP behavior around the dispatcher.
    pub http: HttpConfig,

    /// Dispatch and listing settings.
    pub dispatcher: DispatcherConfig,

    /// Where namespace manifests come from.
    pub manifests: ManifestConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// HTTP bootstrap settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Redirect `/path/` to `/path` with 301.
    pub strip_trailing_slash: bool,

    /// Answer CORS preflights for any origin.
    pub cors_permissive: bool,

    /// Directory served for requests no route matches.
    pub static_dir: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            strip_trailing_slash: true,
            cors_permissive: true,
            static_dir: None,
        }
    }
}

/// Dispatcher configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Target of the `GET /` redirect.
    pub listing_path: String,

    /// Module key excluded from its own listing.
    pub display_module: String,

    /// Upper bound on a controller run, in seconds. Must be below
    /// `timeouts.request_secs`, which bounds the run when this is unset.
    pub controller_timeout_secs: Option<u64>,

    /// Maximum request body size in bytes.
    pub max_body_size: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            listing_path: "/modules".to_string(),
            display_module: "DisplayModules".to_string(),
            controller_timeout_secs: None,
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Namespace manifest configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ManifestConfig {
    /// Directory of `*.toml` namespace manifests.
    pub directory: Option<String>,

    /// Serve the built-in RestAPI sample namespace.
    pub include_samples: bool,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            directory: None,
            include_samples: true,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format: "pretty" or "json".
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
