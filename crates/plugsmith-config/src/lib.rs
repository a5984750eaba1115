//! Configuration management for Plugsmith.
//!
//! This crate handles loading the `plugsmith.toml` configuration file and
//! layering environment variable overrides on top of it.

mod env;
mod error;
mod loader;
mod schema;

pub use env::{ENV_VARS, apply_env_overrides, apply_overrides};
pub use error::{ConfigError, ConfigResult};
pub use loader::{
    CONFIG_FILE_NAME, find_and_load_config_from, load_config, load_effective_config,
};
pub use schema::{Config, LayoutConfig, LintConfig, PathsConfig, TemplatesConfig};
