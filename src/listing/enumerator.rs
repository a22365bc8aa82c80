//! Flattens every resolved namespace into the module listing.

use indexmap::IndexMap;
use serde::Serialize;

use crate::manifest::{ModuleDescriptor, Verb};
use crate::namespace::Aggregator;

/// Display projection of one visible module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuEntry {
    pub name: String,
    /// GET route, without leading slash.
    pub route: String,
    pub path: String,
}

/// Menu entries keyed by module key, in namespace then module order.
pub type ModuleListing = IndexMap<String, MenuEntry>;

/// Whether a module belongs in the listing.
///
/// Excluded: modules without a GET route, the listing module itself, and
/// modules explicitly hidden.
pub fn is_listed(key: &str, descriptor: &ModuleDescriptor, display_module: &str) -> bool {
    descriptor.route(Verb::Get).is_some()
        && key != display_module
        && !descriptor.display_in_modules.is_hidden()
}

/// Build the module listing from every namespace that resolved cleanly.
pub fn enumerate_modules(aggregator: &dyn Aggregator, display_module: &str) -> ModuleListing {
    let mut listing = ModuleListing::new();

    for key in aggregator.namespace_keys() {
        let resolution = aggregator.namespace(&key);
        let Some(registry) = resolution.registry() else {
            tracing::debug!(namespace = %key, error = %resolution.error, "Namespace excluded from listing");
            continue;
        };

        for (module_key, descriptor) in registry.iter() {
            if !is_listed(module_key, descriptor, display_module) {
                continue;
            }
            let Some(route) = descriptor.route(Verb::Get) else {
                continue;
            };
            listing.insert(
                module_key.to_string(),
                MenuEntry {
                    name: module_key.to_string(),
                    route: route.to_string(),
                    path: descriptor.module_path.clone(),
                },
            );
        }
    }

    listing
}
