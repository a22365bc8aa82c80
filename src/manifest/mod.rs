//! Module manifest schema.
//!
//! # Data Flow
//! ```text
//! registration fn / manifest file
//!     → registry.rs (NamespaceRegistry: name + ordered modules)
//!     → descriptor.rs (ModuleDescriptor per module)
//!     → consumed read-only by listing and routing
//! ```
//!
//! # Design Decisions
//! - Registries are immutable once built and shared via Arc
//! - Module order is declaration order; listings depend on it
//! - Visibility is a three-valued enum, not a string flag

pub mod descriptor;
pub mod registry;

pub use descriptor::{ModuleDescriptor, Verb, Visibility};
pub use registry::{NamespaceRegistry, Registration};
