//! Route table: one bound route per (namespace, module, verb).
//!
//! # Responsibilities
//! - Walk every cleanly resolved namespace in key order
//! - Bind each declared verb route to its controller
//! - Drop duplicate (verb, path) pairs, keeping the first
//! - Drop paths the axum router would refuse next to those already kept
//!
//! # Design Decisions
//! - Immutable after construction (shared via Arc, no locks)
//! - Controller lookups happen here, once; a missing controller is kept as a
//!   slot that fails every request instead of failing startup

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::controller::{Controller, ControllerError, ControllerRegistry};
use crate::manifest::{ModuleDescriptor, Verb};
use crate::namespace::Aggregator;
use crate::routing::path::to_axum_path;

/// The controller a route is bound to.
#[derive(Clone)]
pub enum ControllerSlot {
    Bound(Arc<dyn Controller>),
    /// The descriptor names a controller nobody registered.
    Unregistered(String),
    /// The descriptor declares routes but no controller.
    Unspecified,
}

impl ControllerSlot {
    fn resolve(descriptor: &ModuleDescriptor, controllers: &ControllerRegistry) -> Self {
        match descriptor.controller_path.as_deref().filter(|key| !key.is_empty()) {
            Some(key) => match controllers.get(key) {
                Some(controller) => ControllerSlot::Bound(controller),
                None => ControllerSlot::Unregistered(key.to_string()),
            },
            None => ControllerSlot::Unspecified,
        }
    }

    /// Load the controller for one request.
    pub fn load(&self) -> Result<Arc<dyn Controller>, ControllerError> {
        match self {
            ControllerSlot::Bound(controller) => Ok(controller.clone()),
            ControllerSlot::Unregistered(key) => Err(ControllerError::NotRegistered(key.clone())),
            ControllerSlot::Unspecified => Err(ControllerError::Unspecified),
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self, ControllerSlot::Bound(_))
    }
}

impl fmt::Debug for ControllerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerSlot::Bound(_) => f.write_str("Bound"),
            ControllerSlot::Unregistered(key) => f.debug_tuple("Unregistered").field(key).finish(),
            ControllerSlot::Unspecified => f.write_str("Unspecified"),
        }
    }
}

/// A registered endpoint.
#[derive(Debug, Clone)]
pub struct BoundRoute {
    pub namespace: String,
    /// Key of the module within its namespace.
    pub module_key: String,
    pub descriptor: Arc<ModuleDescriptor>,
    pub verb: Verb,
    /// Route string as declared.
    pub pattern: String,
    /// Path registered with axum.
    pub path: String,
    pub controller: ControllerSlot,
}

/// Shadow of the path tree axum builds from the table.
///
/// axum panics when a path conflicts with one it already holds
/// (`/items/{id}` next to `/items/{handle}`, or `/files/{*rest}` next to
/// `/files/{name}`). Inserting into the same matcher first turns that into a
/// skipped route.
struct PathTree {
    matcher: matchit::Router<()>,
    paths: HashSet<String>,
}

impl PathTree {
    fn new() -> Self {
        let mut tree = Self {
            matcher: matchit::Router::new(),
            paths: HashSet::new(),
        };
        // The dispatcher always serves `GET /`.
        if tree.admit("/").is_err() {
            tracing::error!("Root path rejected by the path matcher");
        }
        tree
    }

    fn admit(&mut self, path: &str) -> Result<(), matchit::InsertError> {
        if self.paths.contains(path) {
            return Ok(());
        }
        self.matcher.insert(path, ())?;
        self.paths.insert(path.to_string());
        Ok(())
    }
}

/// Every endpoint the dispatcher serves, in registration order.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Arc<BoundRoute>>,
}

impl RouteTable {
    /// Build the table from the namespace index.
    pub fn build(aggregator: &dyn Aggregator, controllers: &ControllerRegistry) -> Self {
        let mut routes = Vec::new();
        let mut seen: HashSet<(Verb, String)> = HashSet::new();
        let mut tree = PathTree::new();

        for key in aggregator.namespace_keys() {
            let resolution = aggregator.namespace(&key);
            let Some(registry) = resolution.registry() else {
                tracing::warn!(
                    namespace = %key,
                    error = %resolution.error,
                    "Error found in namespace, skipping its modules"
                );
                continue;
            };

            for (module_key, descriptor) in registry.iter() {
                if descriptor.is_inert() {
                    continue;
                }
                let descriptor_arc = Arc::new(descriptor.clone());
                let controller = ControllerSlot::resolve(descriptor, controllers);

                if !controller.is_bound() {
                    tracing::warn!(
                        namespace = %key,
                        module = %module_key,
                        controller = ?controller,
                        "Module routes have no loadable controller; requests will fail"
                    );
                }

                for (verb, pattern) in descriptor.routes() {
                    let path = match to_axum_path(pattern) {
                        Ok(path) => path,
                        Err(e) => {
                            tracing::error!(
                                namespace = %key,
                                module = %module_key,
                                verb = %verb,
                                error = %e,
                                "Skipping route"
                            );
                            continue;
                        }
                    };

                    if let Err(e) = tree.admit(&path) {
                        tracing::warn!(
                            namespace = %key,
                            module = %module_key,
                            verb = %verb,
                            path = %path,
                            error = %e,
                            "Route conflicts with a registered path, skipping"
                        );
                        continue;
                    }

                    if !seen.insert((verb, path.clone())) {
                        tracing::warn!(
                            namespace = %key,
                            module = %module_key,
                            verb = %verb,
                            path = %path,
                            "Route already registered by another module, skipping"
                        );
                        continue;
                    }

                    tracing::debug!(namespace = %key, module = %module_key, verb = %verb, path = %path, "Route registered");
                    routes.push(Arc::new(BoundRoute {
                        namespace: key.clone(),
                        module_key: module_key.to_string(),
                        descriptor: descriptor_arc.clone(),
                        verb,
                        pattern: pattern.to_string(),
                        path,
                        controller: controller.clone(),
                    }));
                }
            }
        }

        tracing::info!(routes = routes.len(), "Route table built");
        Self { routes }
    }

    pub fn routes(&self) -> &[Arc<BoundRoute>] {
        &self.routes
    }

    /// Look up the route bound to `verb` at the registered `path`.
    pub fn find(&self, verb: Verb, path: &str) -> Option<&Arc<BoundRoute>> {
        self.routes.iter().find(|r| r.verb == verb && r.path == path)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
