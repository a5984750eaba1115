//! Check command.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use tracing::warn;

use plugsmith_config::Config;
use plugsmith_core::{Linter, PluginSelection, TerminalPrompter, clear_screen};

use super::{available_plugins, select_plugins};

/// Arguments for the check command.
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Plugin to check, or ALL (asked interactively when omitted)
    pub plugin: Option<String>,
}

/// Runs the check command.
///
/// Fails when the linter reports problems for any checked plugin.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: CheckArgs, config: &Config) -> Result<ExitCode> {
    let (program, lint_args) = config.lint_command()?;
    let plugins = available_plugins(config)?;
    let mut prompter = TerminalPrompter::new();

    let Some(selection) =
        select_plugins(args.plugin.as_deref(), &plugins, &mut prompter, "check", true)?
    else {
        return Ok(ExitCode::SUCCESS);
    };
    if args.plugin.is_none() {
        clear_screen()?;
    }

    let linter = Linter::new(program, lint_args, &config.paths.start_dir, &config.layout);
    let batch = selection == PluginSelection::All;
    let mut failed = 0_usize;

    for plugin in selection.names(&plugins) {
        if batch {
            println!("Checking plugin \"{plugin}\"");
        }
        let status = linter.check(&plugin, &plugins)?;
        if !status.success() {
            warn!(%plugin, %status, "linter reported problems");
            failed += 1;
        }
    }

    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
