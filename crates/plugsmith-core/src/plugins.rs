//! Plugin discovery and selection.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

use crate::prompt::{Prompter, ask_until};
use crate::{CoreError, CoreResult};

/// Selection value meaning "every plugin".
pub const ALL_PLUGINS: &str = "ALL";

/// Plugins chosen for a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginSelection {
    /// A single plugin.
    One(String),
    /// Every plugin in the start directory.
    All,
}

impl PluginSelection {
    /// Expands the selection into plugin names.
    #[must_use]
    pub fn names(&self, plugins: &[String]) -> Vec<String> {
        match self {
            Self::One(name) => vec![name.clone()],
            Self::All => plugins.to_vec(),
        }
    }
}

/// Lists plugin working copies under `start_dir`, sorted by name.
///
/// Directories starting with `.` or `_` are skipped.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn list_plugins(start_dir: &Path) -> CoreResult<Vec<String>> {
    let mut plugins = Vec::new();
    for entry in fs::read_dir(start_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with(['.', '_']) {
            continue;
        }
        plugins.push(name);
    }
    plugins.sort();
    Ok(plugins)
}

/// Returns whether `name` is usable as a plugin name.
///
/// Names must be non-empty and contain only ASCII alphanumerics and `_`.
#[must_use]
pub fn validate_plugin_name(name: &str) -> bool {
    let stripped: String = name.chars().filter(|c| *c != '_').collect();
    !stripped.is_empty() && stripped.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Resolves a plugin given on the command line.
///
/// # Errors
///
/// Returns an error if the plugin is unknown, or `ALL` is given where
/// batch mode is not allowed.
pub fn parse_selection(
    value: &str,
    plugins: &[String],
    allow_all: bool,
) -> CoreResult<PluginSelection> {
    if value == ALL_PLUGINS {
        return if allow_all {
            Ok(PluginSelection::All)
        } else {
            Err(CoreError::AllNotAllowed)
        };
    }

    if plugins.iter().any(|p| p == value) {
        Ok(PluginSelection::One(value.to_string()))
    } else {
        Err(CoreError::UnknownPlugin(value.to_string()))
    }
}

/// Interactively picks a plugin.
///
/// Accepts a menu number or a plugin name. Blank input cancels and
/// returns `None`.
///
/// # Errors
///
/// Returns an error if input cannot be read.
pub fn pick_plugin(
    prompter: &mut dyn Prompter,
    plugins: &[String],
    action: &str,
    allow_all: bool,
) -> io::Result<Option<PluginSelection>> {
    let mut choices: Vec<&str> = plugins.iter().map(String::as_str).collect();
    if allow_all {
        choices.push(ALL_PLUGINS);
    }

    let mut message = format!("Which plugin would you like to {action}?\n\n");
    for (number, choice) in choices.iter().enumerate() {
        let _ = writeln!(message, "\t({}) {choice}", number + 1);
    }
    message.push_str("\nLeave blank to cancel.\n\n");

    ask_until(prompter, &message, |answer| {
        if answer.is_empty() {
            return Some(None);
        }

        let chosen = answer
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|index| choices.get(index).copied())
            .or_else(|| choices.iter().copied().find(|choice| *choice == answer))?;

        Some(Some(if chosen == ALL_PLUGINS {
            PluginSelection::All
        } else {
            PluginSelection::One(chosen.to_string())
        }))
    })
}
