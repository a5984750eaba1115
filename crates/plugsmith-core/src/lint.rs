//! Running the configured linter over a plugin.

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use plugsmith_config::LayoutConfig;
use tracing::debug;

use crate::{CoreError, CoreResult};

/// Returns the directory holding a plugin's Python package.
#[must_use]
pub fn plugin_source_dir(start_dir: &Path, layout: &LayoutConfig, plugin: &str) -> PathBuf {
    start_dir.join(plugin).join(&layout.plugin).join(plugin)
}

/// External lint command run against one plugin at a time.
pub struct Linter<'a> {
    program: &'a str,
    args: &'a [String],
    start_dir: &'a Path,
    layout: &'a LayoutConfig,
}

impl<'a> Linter<'a> {
    /// Creates a linter running `program` with `args`, then the plugin directory.
    #[must_use]
    pub fn new(
        program: &'a str,
        args: &'a [String],
        start_dir: &'a Path,
        layout: &'a LayoutConfig,
    ) -> Self {
        Self {
            program,
            args,
            start_dir,
            layout,
        }
    }

    /// Lints `plugin`, inheriting stdio, and returns the linter's exit status.
    ///
    /// # Errors
    ///
    /// Returns an error if the plugin is not in `plugins` or the program
    /// cannot be started.
    pub fn check(&self, plugin: &str, plugins: &[String]) -> CoreResult<ExitStatus> {
        if !plugins.iter().any(|p| p == plugin) {
            return Err(CoreError::UnknownPlugin(plugin.to_string()));
        }

        let dir = plugin_source_dir(self.start_dir, self.layout, plugin);
        debug!(program = self.program, ?dir, "running linter");

        Command::new(self.program)
            .args(self.args)
            .arg(&dir)
            .status()
            .map_err(|source| CoreError::LintLaunch {
                program: self.program.to_string(),
                source,
            })
    }
}
