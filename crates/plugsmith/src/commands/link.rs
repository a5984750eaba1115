//! Link command.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;

use plugsmith_config::Config;
use plugsmith_core::{Linker, TerminalPrompter, clear_screen};

use super::{available_plugins, select_plugins};

/// Arguments for the link command.
#[derive(Debug, Args)]
pub struct LinkArgs {
    /// Plugin to link, or ALL (asked interactively when omitted)
    pub plugin: Option<String>,
}

/// Runs the link command.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: LinkArgs, config: &Config) -> Result<ExitCode> {
    let link_dir = config.link_dir()?;
    let plugins = available_plugins(config)?;
    let mut prompter = TerminalPrompter::new();

    let Some(selection) =
        select_plugins(args.plugin.as_deref(), &plugins, &mut prompter, "link", true)?
    else {
        return Ok(ExitCode::SUCCESS);
    };
    if args.plugin.is_none() {
        clear_screen()?;
    }

    let linker = Linker::new(&config.paths.start_dir, link_dir, &config.layout);
    for plugin in selection.names(&plugins) {
        let links = linker
            .link_plugin(&plugin)
            .with_context(|| format!("failed to link plugin \"{plugin}\""))?;

        if links.is_empty() {
            println!("Nothing to link for plugin \"{plugin}\"");
        }
        for link in links {
            println!(
                "Linked {} -> {}",
                link.destination.display(),
                link.source.display()
            );
        }
    }

    Ok(ExitCode::SUCCESS)
}
