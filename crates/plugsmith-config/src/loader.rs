//! Configuration loader.

use std::path::Path;

use tracing::debug;

use crate::{Config, ConfigError, ConfigResult, apply_env_overrides};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "plugsmith.toml";

/// Loads configuration from the given path.
///
/// Relative paths inside the file are resolved against the directory
/// containing it.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<Config> {
    let path = path.as_ref();
    debug!(?path, "loading configuration");

    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    Ok(config.resolve_relative_to(base))
}

/// Finds and loads configuration starting from the given directory.
///
/// Walks up the directory tree until a configuration file is found.
///
/// # Errors
///
/// Returns an error if no configuration file is found or it cannot be parsed.
pub fn find_and_load_config_from(start_dir: impl AsRef<Path>) -> ConfigResult<Config> {
    let start_dir = start_dir.as_ref();
    let mut dir = start_dir;

    loop {
        let config_path = dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return load_config(config_path);
        }

        match dir.parent() {
            Some(parent) => dir = parent,
            None => break,
        }
    }

    Err(ConfigError::NotFound(start_dir.join(CONFIG_FILE_NAME)))
}

/// Loads the configuration a command runs with.
///
/// An explicit path must exist. Without one, the nearest `plugsmith.toml`
/// is used, falling back to defaults relative to the current directory.
/// Environment overrides are applied last.
///
/// # Errors
///
/// Returns an error if an explicit file is missing or any file found
/// cannot be parsed.
pub fn load_effective_config(explicit: Option<&Path>) -> ConfigResult<Config> {
    let mut config = match explicit {
        Some(path) => load_config(path)?,
        None => {
            let current_dir = std::env::current_dir()?;
            match find_and_load_config_from(&current_dir) {
                Ok(config) => config,
                Err(ConfigError::NotFound(_)) => {
                    debug!("no configuration file found, using defaults");
                    Config::default().resolve_relative_to(&current_dir)
                }
                Err(e) => return Err(e),
            }
        }
    };

    apply_env_overrides(&mut config);
    Ok(config)
}
