//! Namespace discovery and indexing.
//!
//! # Data Flow
//! ```text
//! registration fns ──┐
//!                    ├→ aggregator.rs (StaticAggregator, keyed by namespace)
//! manifest dir ──────┘    ↑ loader.rs (ManifestAggregator, one TOML per namespace)
//!     → NamespaceResolution { error, namespace_data } per key
//!     → listing (read-only) and routing (startup)
//! ```
//!
//! # Design Decisions
//! - Fully resolved before routing starts; consumers never wait on it
//! - A broken namespace is a value, not a process abort
//! - First registration of a namespace name wins

pub mod aggregator;
pub mod loader;

pub use aggregator::{Aggregator, ManifestError, NamespaceResolution, StaticAggregator};
pub use loader::ManifestAggregator;
