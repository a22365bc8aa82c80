//! Namespace discovery from a directory of TOML manifests.
//!
//! One file per namespace:
//!
//! ```toml
//! namespace = "RestAPI"
//!
//! [modules.Suppliers]
//! module_name = "Suppliers"
//! controller = "rest_api::suppliers"
//! get_route = "api/suppliers/:handle"
//! post_route = "api/suppliers"
//! display_in_modules = false
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::manifest::{ModuleDescriptor, NamespaceRegistry, Visibility};
use crate::namespace::aggregator::{Aggregator, ManifestError, NamespaceResolution, StaticAggregator};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestFile {
    namespace: String,
    #[serde(default)]
    modules: IndexMap<String, ManifestModule>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestModule {
    module_name: Option<String>,
    module_path: Option<String>,
    #[serde(alias = "controller_path")]
    controller: Option<String>,
    #[serde(alias = "public_route")]
    get_route: Option<String>,
    post_route: Option<String>,
    put_route: Option<String>,
    delete_route: Option<String>,
    #[serde(default)]
    display_in_modules: Visibility,
}

impl ManifestModule {
    fn into_descriptor(self, key: &str, base_dir: &Path) -> ModuleDescriptor {
        let module_path = match self.module_path {
            Some(path) if Path::new(&path).is_absolute() => PathBuf::from(path),
            Some(path) => base_dir.join(path),
            None => base_dir.join(key),
        };

        ModuleDescriptor {
            module_name: self.module_name.unwrap_or_else(|| key.to_string()),
            module_path: module_path.to_string_lossy().into_owned(),
            controller_path: self.controller,
            get_route: self.get_route,
            post_route: self.post_route,
            put_route: self.put_route,
            delete_route: self.delete_route,
            display_in_modules: self.display_in_modules,
        }
    }
}

/// Parse a single namespace manifest.
///
/// Relative module paths resolve against the manifest's directory.
pub fn parse_manifest(content: &str, path: &Path) -> Result<NamespaceRegistry, ManifestError> {
    let file: ManifestFile = toml::from_str(content).map_err(|source| ManifestError::Parse {
        path: path.display().to_string(),
        source,
    })?;

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut registry = NamespaceRegistry::new(file.namespace);
    for (key, module) in file.modules {
        let descriptor = module.into_descriptor(&key, base_dir);
        registry = registry.module(key, descriptor);
    }
    Ok(registry)
}

/// Read and parse a single namespace manifest from disk.
pub fn load_manifest(path: &Path) -> Result<NamespaceRegistry, ManifestError> {
    let content = fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_manifest(&content, path)
}

/// Aggregator backed by the `*.toml` manifests of one directory.
#[derive(Debug, Clone)]
pub struct ManifestAggregator {
    dir: PathBuf,
    inner: StaticAggregator,
}

impl ManifestAggregator {
    /// Load every manifest in `dir`, in file-name order.
    ///
    /// A manifest that fails to load becomes a failed resolution keyed by its
    /// file stem. Only an unreadable directory is an error; a missing one
    /// yields no namespaces.
    pub fn load(dir: &Path) -> Result<Self, ManifestError> {
        let mut inner = StaticAggregator::new();

        if !dir.exists() {
            tracing::warn!(dir = %dir.display(), "Manifest directory not found, no namespaces loaded");
            return Ok(Self { dir: dir.to_path_buf(), inner });
        }

        let entries = fs::read_dir(dir).map_err(|source| ManifestError::Io {
            path: dir.display().to_string(),
            source,
        })?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "toml"))
            .collect();
        files.sort();

        for path in files {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();

            let (key, resolution) = match load_manifest(&path) {
                Ok(registry) => {
                    tracing::debug!(
                        namespace = %registry.namespace_name,
                        modules = registry.len(),
                        path = %path.display(),
                        "Loaded namespace manifest"
                    );
                    (registry.namespace_name.clone(), NamespaceResolution::resolved(registry))
                }
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "Failed to load namespace manifest");
                    (stem, NamespaceResolution::failed(e.to_string()))
                }
            };

            if let Err(e) = inner.insert(key, resolution) {
                tracing::error!(path = %path.display(), error = %e, "Skipping manifest");
            }
        }

        Ok(Self { dir: dir.to_path_buf(), inner })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Aggregator for ManifestAggregator {
    fn namespace_keys(&self) -> Vec<String> {
        self.inner.namespace_keys()
    }

    fn namespace(&self, key: &str) -> NamespaceResolution {
        self.inner.namespace(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::Verb;

    const REST_API: &str = r#"
namespace = "RestAPI"

[modules.ApiKeyManagement]
module_name = "Api Key Management"
controller = "rest_api::keys"
get_route = "api/keys"
display_in_modules = "true"

[modules.KeyUpdates]
controller = "rest_api::key_updates"
public_route = ""
post_route = "api/keys/update/:type/:handle"
display_in_modules = "false"
"#;

    #[test]
    fn test_parse_manifest() {
        let registry = parse_manifest(REST_API, Path::new("/srv/manifests/rest.toml")).unwrap();

        assert_eq!(registry.namespace_name, "RestAPI");
        let keys: Vec<&str> = registry.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["ApiKeyManagement", "KeyUpdates"]);

        let keys_module = registry.get("ApiKeyManagement").unwrap();
        assert_eq!(keys_module.module_name, "Api Key Management");
        assert_eq!(keys_module.module_path, "/srv/manifests/ApiKeyManagement");
        assert_eq!(keys_module.display_in_modules, Visibility::Visible);

        let updates = registry.get("KeyUpdates").unwrap();
        assert_eq!(updates.module_name, "KeyUpdates");
        assert_eq!(updates.route(Verb::Get), None);
        assert_eq!(updates.route(Verb::Post), Some("api/keys/update/:type/:handle"));
        assert!(updates.display_in_modules.is_hidden());
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let err = parse_manifest(
            "namespace = \"X\"\n[modules.A]\nget_rout = \"a\"\n",
            Path::new("x.toml"),
        )
        .unwrap_err();
        assert!(matches!(err, ManifestError::Parse { .. }));
    }

    #[test]
    fn test_load_directory_isolates_broken_manifests() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a_rest.toml"), REST_API).unwrap();
        fs::write(dir.path().join("b_broken.toml"), "namespace = ").unwrap();
        fs::write(dir.path().join("c_dup.toml"), "namespace = \"RestAPI\"\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let aggregator = ManifestAggregator::load(dir.path()).unwrap();

        assert_eq!(aggregator.namespace_keys(), vec!["RestAPI", "b_broken"]);
        assert!(aggregator.namespace("RestAPI").is_ok());
        let broken = aggregator.namespace("b_broken");
        assert!(broken.error.contains("failed to parse manifest"));
        assert!(broken.registry().is_none());
    }

    #[test]
    fn test_missing_directory_yields_no_namespaces() {
        let dir = tempfile::tempdir().unwrap();
        let aggregator = ManifestAggregator::load(&dir.path().join("absent")).unwrap();
        assert!(aggregator.namespace_keys().is_empty());
    }
}
