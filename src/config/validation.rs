//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, sizes > 0)
//! - Keep the controller timeout inside the request timeout
//! - Validate addresses and paths
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system
//! - Manifests are not validated here; a bad module fails at request time

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::AppConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Check every semantic rule, collecting all failures.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("{:?} is not a socket address", config.listener.bind_address),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    let listing_path = &config.dispatcher.listing_path;
    if !listing_path.starts_with('/') || listing_path == "/" {
        errors.push(ValidationError::new(
            "dispatcher.listing_path",
            "must start with '/' and not be the root",
        ));
    }

    if config.dispatcher.display_module.trim().is_empty() {
        errors.push(ValidationError::new("dispatcher.display_module", "must not be empty"));
    }

    match config.dispatcher.controller_timeout_secs {
        Some(0) => errors.push(ValidationError::new(
            "dispatcher.controller_timeout_secs",
            "must be greater than 0 when set",
        )),
        Some(secs) if secs >= config.timeouts.request_secs => errors.push(ValidationError::new(
            "dispatcher.controller_timeout_secs",
            format!(
                "must be less than timeouts.request_secs ({})",
                config.timeouts.request_secs
            ),
        )),
        _ => {}
    }

    if config.dispatcher.max_body_size == 0 {
        errors.push(ValidationError::new("dispatcher.max_body_size", "must be greater than 0"));
    }

    if !matches!(config.observability.log_format.as_str(), "pretty" | "json") {
        errors.push(ValidationError::new(
            "observability.log_format",
            format!("unknown format {:?}, expected \"pretty\" or \"json\"", config.observability.log_format),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("{:?} is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&AppConfig::default()), Ok(()));
    }

    #[test]
    fn test_all_errors_are_reported() {
        let mut config = AppConfig::default();
        config.listener.bind_address = "nowhere".into();
        config.dispatcher.listing_path = "/".into();
        config.dispatcher.controller_timeout_secs = Some(0);
        config.observability.log_format = "xml".into();

        let fields: Vec<&str> = validate_config(&config)
            .unwrap_err()
            .iter()
            .map(|e| e.field)
            .collect();
        assert_eq!(
            fields,
            vec![
                "listener.bind_address",
                "dispatcher.listing_path",
                "dispatcher.controller_timeout_secs",
                "observability.log_format",
            ]
        );
    }

    #[test]
    fn test_controller_timeout_must_fit_inside_request_timeout() {
        let mut config = AppConfig::default();
        config.timeouts.request_secs = 1;
        config.dispatcher.controller_timeout_secs = Some(5);

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "dispatcher.controller_timeout_secs");
        assert_eq!(errors[0].message, "must be less than timeouts.request_secs (1)");

        config.dispatcher.controller_timeout_secs = Some(1);
        assert!(validate_config(&config).is_err());

        config.timeouts.request_secs = 2;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_metrics_address_only_checked_when_enabled() {
        let mut config = AppConfig::default();
        config.observability.metrics_address = "bogus".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
