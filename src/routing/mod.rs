//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     Aggregator (namespaces → modules → verb routes)
//!     → path.rs (route string → axum path)
//!     → table.rs (bind controller, drop duplicates)
//!     → Freeze as immutable RouteTable
//!     → dispatch builds the axum Router from it
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Broken namespaces contribute nothing
//! - First registration of a (verb, path) wins
//! - Path parameters are extracted by axum, not here

pub mod path;
pub mod table;

pub use path::{to_axum_path, InvalidPath};
pub use table::{BoundRoute, ControllerSlot, RouteTable};
