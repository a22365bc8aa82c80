//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dispatcher.toml");
        fs::write(
            &path,
            "[manifests]\ndirectory = \"namespaces\"\ninclude_samples = false\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.manifests.directory.as_deref(), Some("namespaces"));
        assert!(!config.manifests.include_samples);
    }

    #[test]
    fn test_validation_errors_are_joined() {
        let err = parse_config("[dispatcher]\nlisting_path = \"modules\"\nmax_body_size = 0\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: dispatcher.listing_path: must start with '/' and not be the root, \
             dispatcher.max_body_size: must be greater than 0"
        );
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
