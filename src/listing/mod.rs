//! Module listing for navigation.
//!
//! Read-only derivation over the namespace index; rebuilt on every call.

pub mod enumerator;

pub use enumerator::{enumerate_modules, is_listed, MenuEntry, ModuleListing};
