//! Configuration schema.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{ConfigError, ConfigResult};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Workspace locations.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Plugin sub-directory roles.
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Scaffolding templates.
    #[serde(default)]
    pub templates: TemplatesConfig,

    /// Lint command.
    #[serde(default)]
    pub lint: LintConfig,
}

impl Config {
    /// Resolves relative filesystem locations against `base`.
    ///
    /// Layout entries are repository-relative and stay untouched.
    #[must_use]
    pub fn resolve_relative_to(mut self, base: &Path) -> Self {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };

        resolve(&mut self.paths.start_dir);
        resolve(&mut self.paths.release_dir);
        if let Some(link_dir) = self.paths.link_dir.as_mut() {
            resolve(link_dir);
        }
        if let Some(primary_dir) = self.templates.primary_dir.as_mut() {
            resolve(primary_dir);
        }
        if let Some(root_dir) = self.templates.root_dir.as_mut() {
            resolve(root_dir);
        }
        self
    }

    /// Returns the live server tree plugins are linked into.
    ///
    /// # Errors
    ///
    /// Returns an error if no link directory is configured.
    pub fn link_dir(&self) -> ConfigResult<&Path> {
        self.paths
            .link_dir
            .as_deref()
            .ok_or(ConfigError::Missing {
                key: "paths.link_dir",
                env: "LINK_BASE_DIRECTORY",
            })
    }

    /// Returns the template directory rendered into the plugin's own directory.
    ///
    /// # Errors
    ///
    /// Returns an error if it is not configured.
    pub fn primary_templates(&self) -> ConfigResult<&Path> {
        self.templates
            .primary_dir
            .as_deref()
            .ok_or(ConfigError::Missing {
                key: "templates.primary_dir",
                env: "PLUGIN_PRIMARY_FILES_DIR",
            })
    }

    /// Returns the template directory copied into the repository root.
    ///
    /// # Errors
    ///
    /// Returns an error if it is not configured.
    pub fn root_templates(&self) -> ConfigResult<&Path> {
        self.templates
            .root_dir
            .as_deref()
            .ok_or(ConfigError::Missing {
                key: "templates.root_dir",
                env: "PLUGIN_ROOT_FILES_DIR",
            })
    }

    /// Returns the lint program and its leading arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if the command is empty.
    pub fn lint_command(&self) -> ConfigResult<(&str, &[String])> {
        self.lint
            .command
            .split_first()
            .map(|(program, args)| (program.as_str(), args))
            .ok_or_else(|| ConfigError::Invalid("lint.command is empty".to_string()))
    }
}

/// Workspace locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding one working copy per plugin.
    #[serde(default = "default_start_dir")]
    pub start_dir: PathBuf,

    /// Root directory for release archives.
    #[serde(default = "default_release_dir")]
    pub release_dir: PathBuf,

    /// Live server tree that plugins are linked into.
    pub link_dir: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            start_dir: default_start_dir(),
            release_dir: default_release_dir(),
            link_dir: None,
        }
    }
}

fn default_start_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_release_dir() -> PathBuf {
    PathBuf::from("releases")
}

/// Plugin sub-directory roles, relative to a plugin's repository root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Python package root.
    pub plugin: String,
    /// Server configuration files.
    pub config: String,
    /// Data files.
    pub data: String,
    /// Documentation.
    pub docs: String,
    /// Custom event definitions.
    pub events: String,
    /// Log files.
    pub logs: String,
    /// Sounds.
    pub sound: String,
    /// Translation files.
    pub translations: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            plugin: "addons/source-python/plugins".to_string(),
            config: "cfg/source-python".to_string(),
            data: "addons/source-python/data/plugins".to_string(),
            docs: "addons/source-python/docs/source-python/source/plugins".to_string(),
            events: "resource/source-python/events".to_string(),
            logs: "logs/source-python".to_string(),
            sound: "sound/source-python".to_string(),
            translations: "resource/source-python/translations".to_string(),
        }
    }
}

/// Scaffolding templates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplatesConfig {
    /// Files rendered into the new plugin's own directory.
    pub primary_dir: Option<PathBuf>,

    /// Files copied verbatim into the new repository root.
    pub root_dir: Option<PathBuf>,

    /// Author substituted into rendered templates.
    #[serde(default)]
    pub author: String,
}

/// Lint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LintConfig {
    /// Program followed by its arguments; the plugin directory is appended.
    #[serde(default = "default_lint_command")]
    pub command: Vec<String>,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            command: default_lint_command(),
        }
    }
}

fn default_lint_command() -> Vec<String> {
    vec!["ruff".to_string(), "check".to_string()]
}
