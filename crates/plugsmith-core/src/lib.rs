//! Core library for Plugsmith.
//!
//! This crate provides the plugin workflows: scaffolding new plugins,
//! linking them into a live server tree, linting them and cutting
//! versioned release archives.

mod archive;
mod error;
mod filter;
mod link;
mod lint;
mod metadata;
mod plugins;
mod prompt;
mod release;
mod scaffold;
mod version;

pub use archive::ReleaseArchive;
pub use error::{CoreError, CoreResult, ReleaseError, ReleaseResult};
pub use filter::{FileTypeAllowList, FileTypeRule};
pub use link::{CreatedLink, Linker};
pub use lint::{Linter, plugin_source_dir};
pub use metadata::{INFO_FILE_NAME, info_file_path, read_version, write_version};
pub use plugins::{
    ALL_PLUGINS, PluginSelection, list_plugins, parse_selection, pick_plugin,
    validate_plugin_name,
};
pub use prompt::{Prompter, TerminalPrompter, ask_until, clear_screen, confirm};
pub use release::{
    CleanCheckout, PUSH_REMOTE, ReleaseBuilder, ReleaseOutcome, VersionBump, VersionedCheckout,
};
pub use scaffold::{
    RoleChoice, ScaffoldOptions, Scaffolder, ask_plugin_name, ask_scaffold_options,
    render_template,
};
pub use version::{BumpType, PluginVersion, SEMANTIC_VERSIONING_COUNT};
