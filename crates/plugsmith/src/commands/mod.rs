//! Subcommand implementations.

pub mod check;
pub mod create;
pub mod link;
pub mod release;

use anyhow::{Context, Result};
use plugsmith_config::Config;
use plugsmith_core::{PluginSelection, Prompter, list_plugins, parse_selection, pick_plugin};

/// Plugins available under the configured start directory.
fn available_plugins(config: &Config) -> Result<Vec<String>> {
    let start_dir = &config.paths.start_dir;
    list_plugins(start_dir)
        .with_context(|| format!("failed to list plugins in {}", start_dir.display()))
}

/// Resolves the plugin given on the command line, or asks for one.
///
/// Returns `None` when the picker was cancelled.
fn select_plugins(
    given: Option<&str>,
    plugins: &[String],
    prompter: &mut dyn Prompter,
    action: &str,
    allow_all: bool,
) -> Result<Option<PluginSelection>> {
    match given {
        Some(value) => Ok(Some(parse_selection(value, plugins, allow_all)?)),
        None => pick_plugin(prompter, plugins, action, allow_all)
            .context("failed to read plugin choice"),
    }
}
