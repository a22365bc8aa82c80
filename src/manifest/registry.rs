//! Namespace registry: a named, ordered collection of module descriptors.

use indexmap::IndexMap;
use serde::Serialize;

use crate::manifest::descriptor::ModuleDescriptor;

/// Zero-argument registration function a namespace exposes.
pub type Registration = fn() -> NamespaceRegistry;

/// All modules declared by one namespace, in declaration order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceRegistry {
    pub namespace_name: String,
    pub modules: IndexMap<String, ModuleDescriptor>,
}

impl NamespaceRegistry {
    pub fn new(namespace_name: impl Into<String>) -> Self {
        Self {
            namespace_name: namespace_name.into(),
            modules: IndexMap::new(),
        }
    }

    /// Add a module under `key`.
    ///
    /// A key that is already present keeps its position and takes the new
    /// descriptor.
    pub fn module(mut self, key: impl Into<String>, descriptor: ModuleDescriptor) -> Self {
        self.modules.insert(key.into(), descriptor);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ModuleDescriptor> {
        self.modules.get(key)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModuleDescriptor)> {
        self.modules.iter().map(|(key, descriptor)| (key.as_str(), descriptor))
    }
}
