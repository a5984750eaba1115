//! Configuration error types.

use thiserror::Error;

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found.
    #[error("configuration file not found: {0}")]
    NotFound(std::path::PathBuf),

    /// Invalid TOML syntax.
    #[error("invalid TOML: {0}")]
    InvalidToml(#[from] toml::de::Error),

    /// A setting required by the current command is not set.
    #[error("missing setting `{key}` (set it in plugsmith.toml or via {env})")]
    Missing {
        /// Dotted key in the configuration file.
        key: &'static str,
        /// Environment variable that can provide it.
        env: &'static str,
    },

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_not_found_display() {
        let err = ConfigError::NotFound(PathBuf::from("/path/to/plugsmith.toml"));
        assert_eq!(
            err.to_string(),
            "configuration file not found: /path/to/plugsmith.toml"
        );
    }

    #[test]
    fn test_missing_display() {
        let err = ConfigError::Missing {
            key: "paths.link_dir",
            env: "LINK_BASE_DIRECTORY",
        };
        assert_eq!(
            err.to_string(),
            "missing setting `paths.link_dir` (set it in plugsmith.toml or via LINK_BASE_DIRECTORY)"
        );
    }

    #[test]
    fn test_invalid_display() {
        let err = ConfigError::Invalid("lint.command is empty".to_string());
        assert_eq!(
            err.to_string(),
            "invalid configuration: lint.command is empty"
        );
    }

    #[test]
    fn test_error_is_debug() {
        let err = ConfigError::Invalid("test".to_string());
        let debug = format!("{err:?}");
        assert!(debug.contains("Invalid"));
    }
}
