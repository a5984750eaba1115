//! Environment variable overrides.

use std::path::PathBuf;

use tracing::debug;

use crate::Config;

/// Environment variables recognised as configuration overrides.
pub const ENV_VARS: [&str; 14] = [
    "STARTDIR",
    "RELEASE_DIRECTORY",
    "LINK_BASE_DIRECTORY",
    "PLUGIN_BASE_PATH",
    "CONFIG_BASE_PATH",
    "DATA_BASE_PATH",
    "DOCS_BASE_PATH",
    "EVENTS_BASE_PATH",
    "LOGS_BASE_PATH",
    "SOUND_BASE_PATH",
    "TRANSLATIONS_BASE_PATH",
    "PLUGIN_PRIMARY_FILES_DIR",
    "PLUGIN_ROOT_FILES_DIR",
    "AUTHOR",
];

/// Applies overrides from the process environment.
pub fn apply_env_overrides(config: &mut Config) {
    apply_overrides(config, |name| std::env::var(name).ok());
}

/// Applies overrides from the given lookup.
///
/// Values are stripped of surrounding double quotes so that `.env`-style
/// exports such as `STARTDIR="C:\plugins"` work unchanged. Empty values
/// are ignored.
pub fn apply_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    for name in ENV_VARS {
        let Some(raw) = lookup(name) else {
            continue;
        };
        let value = raw.trim_matches('"').to_string();
        if value.is_empty() {
            continue;
        }
        debug!(%name, %value, "applying environment override");

        match name {
            "STARTDIR" => config.paths.start_dir = PathBuf::from(value),
            "RELEASE_DIRECTORY" => config.paths.release_dir = PathBuf::from(value),
            "LINK_BASE_DIRECTORY" => config.paths.link_dir = Some(PathBuf::from(value)),
            "PLUGIN_BASE_PATH" => config.layout.plugin = value,
            "CONFIG_BASE_PATH" => config.layout.config = value,
            "DATA_BASE_PATH" => config.layout.data = value,
            "DOCS_BASE_PATH" => config.layout.docs = value,
            "EVENTS_BASE_PATH" => config.layout.events = value,
            "LOGS_BASE_PATH" => config.layout.logs = value,
            "SOUND_BASE_PATH" => config.layout.sound = value,
            "TRANSLATIONS_BASE_PATH" => config.layout.translations = value,
            "PLUGIN_PRIMARY_FILES_DIR" => config.templates.primary_dir = Some(PathBuf::from(value)),
            "PLUGIN_ROOT_FILES_DIR" => config.templates.root_dir = Some(PathBuf::from(value)),
            "AUTHOR" => config.templates.author = value,
            _ => {}
        }
    }
}
