//! Manifest-driven HTTP module dispatcher.

pub mod config;
pub mod controller;
pub mod dispatch;
pub mod http;
pub mod lifecycle;
pub mod listing;
pub mod manifest;
pub mod namespace;
pub mod namespaces;
pub mod observability;
pub mod routing;

pub use config::AppConfig;
pub use controller::{Controller, ControllerError, ControllerRegistry, ControllerReply};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use manifest::{ModuleDescriptor, NamespaceRegistry};
pub use namespace::{Aggregator, StaticAggregator};
