//! Create command.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;

use plugsmith_config::Config;
use plugsmith_core::{
    CoreError, Scaffolder, TerminalPrompter, ask_plugin_name, ask_scaffold_options, list_plugins,
    validate_plugin_name,
};

/// Arguments for the create command.
#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Name of the new plugin (asked interactively when omitted)
    pub name: Option<String>,
}

/// Runs the create command.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: CreateArgs, config: &Config) -> Result<ExitCode> {
    let primary_templates = config.primary_templates()?;
    let root_templates = config.root_templates()?;

    let start_dir = &config.paths.start_dir;
    let existing = if start_dir.is_dir() {
        list_plugins(start_dir)?
    } else {
        Vec::new()
    };

    let mut prompter = TerminalPrompter::new();
    let name = match args.name {
        // Refuse before asking anything else.
        Some(name) if !validate_plugin_name(&name) => {
            return Err(CoreError::InvalidPluginName(name).into());
        }
        Some(name) if existing.contains(&name) => {
            return Err(CoreError::PluginExists(start_dir.join(name)).into());
        }
        Some(name) => name,
        None => match ask_plugin_name(&mut prompter, &existing)
            .context("failed to read plugin name")?
        {
            Some(name) => name,
            None => return Ok(ExitCode::SUCCESS),
        },
    };

    let options = ask_scaffold_options(&mut prompter).context("failed to read plugin options")?;

    let scaffolder = Scaffolder::new(
        start_dir,
        &config.layout,
        primary_templates,
        root_templates,
        &config.templates.author,
    );
    let repo_root = scaffolder
        .create_plugin(&name, &options)
        .with_context(|| format!("failed to create plugin \"{name}\""))?;

    println!(
        "Successfully created plugin \"{name}\":\n\t\"{}\"\n",
        repo_root.display()
    );
    Ok(ExitCode::SUCCESS)
}
