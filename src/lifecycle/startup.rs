//! Startup orchestration.
//!
//! # Responsibilities
//! - Assemble the namespace index (built-ins, then manifests)
//! - Register every controller the built-in namespaces need
//! - Hand both to the HTTP server, which freezes the route table
//!
//! # Design Decisions
//! - Fail fast: an unreadable manifest directory is fatal
//! - Individual broken manifests are not; they surface as skipped namespaces
//! - The route table is complete before the listener accepts traffic

use std::path::Path;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::controller::ControllerRegistry;
use crate::namespace::{Aggregator, ManifestAggregator, ManifestError, StaticAggregator};
use crate::namespaces;

/// Everything the server needs to build its routes.
pub struct Bootstrap {
    pub aggregator: Arc<StaticAggregator>,
    pub controllers: ControllerRegistry,
}

/// Build the namespace index described by `config`.
pub fn build_aggregator(config: &AppConfig) -> Result<StaticAggregator, ManifestError> {
    let mut aggregator = StaticAggregator::from_registrations(&namespaces::registrations(
        config.manifests.include_samples,
    ));

    if let Some(dir) = &config.manifests.directory {
        let manifests = ManifestAggregator::load(Path::new(dir))?;
        tracing::info!(
            dir = %manifests.dir().display(),
            namespaces = manifests.namespace_keys().len(),
            "Manifests loaded"
        );
        aggregator.merge(&manifests);
    }

    Ok(aggregator)
}

/// Build the namespace index and the controllers for it.
pub fn bootstrap(config: &AppConfig) -> Result<Bootstrap, ManifestError> {
    let aggregator = Arc::new(build_aggregator(config)?);

    let mut controllers = ControllerRegistry::new();
    namespaces::register_controllers(&mut controllers, aggregator.clone(), &config.dispatcher);

    tracing::info!(
        namespaces = aggregator.len(),
        controllers = controllers.len(),
        "Namespaces indexed"
    );
    Ok(Bootstrap { aggregator, controllers })
}
