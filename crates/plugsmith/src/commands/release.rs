//! Release command.

use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::Args;
use tracing::info;

use plugsmith_config::Config;
use plugsmith_core::{PluginSelection, ReleaseBuilder, TerminalPrompter};

use super::{available_plugins, select_plugins};

/// Arguments for the release command.
#[derive(Debug, Args)]
pub struct ReleaseArgs {
    /// Plugin to release (asked interactively when omitted)
    pub plugin: Option<String>,
}

/// Runs the release command.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: ReleaseArgs, config: &Config) -> Result<ExitCode> {
    let plugins = available_plugins(config)?;
    let mut prompter = TerminalPrompter::new();

    let plugin = match select_plugins(
        args.plugin.as_deref(),
        &plugins,
        &mut prompter,
        "release",
        false,
    )? {
        Some(PluginSelection::One(plugin)) => plugin,
        Some(PluginSelection::All) => bail!("\"ALL\" is not supported by this command"),
        None => return Ok(ExitCode::SUCCESS),
    };

    let builder = ReleaseBuilder::from_config(config);
    match builder.run(&plugin, &mut prompter) {
        Ok(outcome) => {
            info!(plugin = %outcome.plugin, version = %outcome.version, "release completed");
            println!(
                "Successfully created {} version {} release:\n\t\"{}\"\n",
                outcome.plugin,
                outcome.version,
                outcome.archive.display()
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if e.is_abort() => {
            eprintln!("{e}");
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e).with_context(|| format!("failed to release plugin \"{plugin}\"")),
    }
}
