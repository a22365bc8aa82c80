//! Namespaces compiled into the binary.
//!
//! `DisplayModules` is always present; it serves the module listing.
//! `RestAPI` is a sample namespace and can be switched off in config.

use std::sync::Arc;

use crate::config::DispatcherConfig;
use crate::controller::ControllerRegistry;
use crate::manifest::Registration;
use crate::namespace::Aggregator;

pub mod display_modules;
pub mod rest_api;

/// Registration functions of the built-in namespaces, in serving order.
pub fn registrations(include_samples: bool) -> Vec<Registration> {
    let mut registrations: Vec<Registration> = vec![display_modules::registration];
    if include_samples {
        registrations.push(rest_api::registration);
    }
    registrations
}

/// Register the controllers the built-in namespaces point at.
///
/// The listing controller reads `aggregator` on every request.
pub fn register_controllers(
    registry: &mut ControllerRegistry,
    aggregator: Arc<dyn Aggregator>,
    config: &DispatcherConfig,
) {
    registry.register(
        display_modules::CONTROLLER,
        display_modules::ListingController::new(aggregator, config.display_module.clone()),
    );
    rest_api::register_controllers(registry);
}
