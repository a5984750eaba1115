//! CLI definition.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use plugsmith_config::load_effective_config;
use tracing::debug;

use crate::commands;

/// Scaffold, link, lint and release Source.Python plugins.
#[derive(Debug, Parser)]
#[command(name = "plugsmith")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to the nearest plugsmith.toml)
    #[arg(short, long, global = true, env = "PLUGSMITH_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new plugin from the templates
    Create(commands::create::CreateArgs),

    /// Symlink a plugin into the live server tree
    Link(commands::link::LinkArgs),

    /// Run the linter over a plugin
    Check(commands::check::CheckArgs),

    /// Cut a release archive, optionally bumping the version
    Release(commands::release::ReleaseArgs),
}

impl Cli {
    /// Runs the CLI command.
    pub fn run(self) -> Result<ExitCode> {
        let config =
            load_effective_config(self.config.as_deref()).context("failed to load configuration")?;
        debug!(start_dir = ?config.paths.start_dir, "loaded configuration");

        match self.command {
            Commands::Create(args) => commands::create::run(args, &config),
            Commands::Link(args) => commands::link::run(args, &config),
            Commands::Check(args) => commands::check::run(args, &config),
            Commands::Release(args) => commands::release::run(args, &config),
        }
    }
}
