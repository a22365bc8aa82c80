//! Namespace aggregation: the index the listing and the router walk.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::manifest::{NamespaceRegistry, Registration};

/// Error type for building a namespace index.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to read manifest {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse manifest {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("namespace {0} is already registered")]
    DuplicateNamespace(String),
}

/// Outcome of resolving one namespace.
///
/// A non-empty `error` marks the namespace as broken; consumers must skip it
/// entirely even if `namespace_data` happens to be present.
#[derive(Debug, Clone, Default)]
pub struct NamespaceResolution {
    pub error: String,
    pub namespace_data: Option<Arc<NamespaceRegistry>>,
}

impl NamespaceResolution {
    pub fn resolved(registry: impl Into<Arc<NamespaceRegistry>>) -> Self {
        Self {
            error: String::new(),
            namespace_data: Some(registry.into()),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        let mut error = error.into();
        if error.is_empty() {
            error.push_str("namespace failed to resolve");
        }
        Self {
            error,
            namespace_data: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_empty() && self.namespace_data.is_some()
    }

    /// The registry, only when the namespace resolved without error.
    pub fn registry(&self) -> Option<&NamespaceRegistry> {
        if !self.error.is_empty() {
            return None;
        }
        self.namespace_data.as_deref()
    }
}

/// Source of resolved namespaces, indexed by namespace name.
pub trait Aggregator: Send + Sync {
    /// Namespace keys in traversal order.
    fn namespace_keys(&self) -> Vec<String>;

    /// Resolution result for one key. Unknown keys resolve to a failure.
    fn namespace(&self, key: &str) -> NamespaceResolution;
}

/// In-memory aggregator, fully resolved at construction.
#[derive(Debug, Clone, Default)]
pub struct StaticAggregator {
    namespaces: IndexMap<String, NamespaceResolution>,
}

impl StaticAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from registration functions, keyed by each registry's name.
    ///
    /// Later registrations reusing a namespace name are skipped.
    pub fn from_registrations(registrations: &[Registration]) -> Self {
        let mut aggregator = Self::new();
        for registration in registrations {
            if let Err(e) = aggregator.register(*registration) {
                tracing::warn!(error = %e, "Skipping namespace registration");
            }
        }
        aggregator
    }

    /// Run a registration function and index its registry.
    pub fn register(&mut self, registration: Registration) -> Result<(), ManifestError> {
        let registry = registration();
        let key = registry.namespace_name.clone();
        self.insert(key, NamespaceResolution::resolved(registry))
    }

    /// Index a resolution under `key`. The first resolution for a key wins.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        resolution: NamespaceResolution,
    ) -> Result<(), ManifestError> {
        let key = key.into();
        if self.namespaces.contains_key(&key) {
            return Err(ManifestError::DuplicateNamespace(key));
        }
        self.namespaces.insert(key, resolution);
        Ok(())
    }

    /// Copy every namespace of `other` after the ones already indexed.
    pub fn merge(&mut self, other: &dyn Aggregator) {
        for key in other.namespace_keys() {
            let resolution = other.namespace(&key);
            if let Err(e) = self.insert(key, resolution) {
                tracing::warn!(error = %e, "Skipping duplicate namespace");
            }
        }
    }

    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }
}

impl Aggregator for StaticAggregator {
    fn namespace_keys(&self) -> Vec<String> {
        self.namespaces.keys().cloned().collect()
    }

    fn namespace(&self, key: &str) -> NamespaceResolution {
        self.namespaces
            .get(key)
            .cloned()
            .unwrap_or_else(|| NamespaceResolution::failed(format!("unknown namespace: {key}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::ModuleDescriptor;

    fn alpha() -> NamespaceRegistry {
        NamespaceRegistry::new("Alpha").module("One", ModuleDescriptor::new("One").get("one"))
    }

    fn beta() -> NamespaceRegistry {
        NamespaceRegistry::new("Beta").module("Two", ModuleDescriptor::new("Two").get("two"))
    }

    fn alpha_again() -> NamespaceRegistry {
        NamespaceRegistry::new("Alpha")
    }

    #[test]
    fn test_registrations_keep_order_and_first_wins() {
        let aggregator = StaticAggregator::from_registrations(&[beta, alpha, alpha_again]);

        assert_eq!(aggregator.namespace_keys(), vec!["Beta", "Alpha"]);
        let alpha = aggregator.namespace("Alpha");
        assert!(alpha.is_ok());
        assert_eq!(alpha.registry().unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_namespace_is_a_failure() {
        let aggregator = StaticAggregator::new();
        let resolution = aggregator.namespace("Missing");
        assert_eq!(resolution.error, "unknown namespace: Missing");
        assert!(resolution.registry().is_none());
    }

    #[test]
    fn test_error_wins_over_data() {
        let resolution = NamespaceResolution {
            error: "boom".into(),
            namespace_data: Some(Arc::new(alpha())),
        };
        assert!(!resolution.is_ok());
        assert!(resolution.registry().is_none());
        assert_eq!(NamespaceResolution::failed("").error, "namespace failed to resolve");
    }

    #[test]
    fn test_merge_appends_and_skips_duplicates() {
        let mut base = StaticAggregator::from_registrations(&[alpha]);
        let mut other = StaticAggregator::new();
        other.insert("Broken", NamespaceResolution::failed("bad manifest")).unwrap();
        other.insert("Alpha", NamespaceResolution::failed("shadow")).unwrap();

        base.merge(&other);

        assert_eq!(base.namespace_keys(), vec!["Alpha", "Broken"]);
        assert!(base.namespace("Alpha").is_ok());
        assert_eq!(base.namespace("Broken").error, "bad manifest");
    }
}
