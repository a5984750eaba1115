//! Core error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from scaffolding, linking, linting and plugin selection.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Plugin name contains characters other than ASCII alphanumerics and `_`.
    #[error(
        "invalid plugin name \"{0}\": only alpha-numeric characters and underscores are allowed"
    )]
    InvalidPluginName(String),

    /// A plugin with that name already exists.
    #[error("plugin already exists: {0}")]
    PluginExists(PathBuf),

    /// Plugin not found in the start directory.
    #[error("invalid plugin name \"{0}\"")]
    UnknownPlugin(String),

    /// Batch mode requested where only a single plugin is allowed.
    #[error("\"ALL\" is not supported by this command")]
    AllNotAllowed,

    /// Template directory does not exist.
    #[error("template directory not found: {0}")]
    TemplateDirMissing(PathBuf),

    /// The lint program could not be started.
    #[error("failed to run `{program}`: {source}")]
    LintLaunch {
        /// Program that was invoked.
        program: String,
        /// Underlying launch failure.
        #[source]
        source: std::io::Error,
    },

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] plugsmith_config::ConfigError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that end a release run.
#[derive(Debug, Error)]
pub enum ReleaseError {
    /// The plugin directory is not a git working copy.
    #[error("plugin \"{plugin}\" is not a git repository")]
    NotARepository {
        /// Plugin name.
        plugin: String,
        /// Directory that was opened.
        path: PathBuf,
    },

    /// The working copy has staged, unstaged or untracked changes.
    #[error(
        "plugin \"{plugin}\" has uncommitted changes ({staged} staged, {unstaged} unstaged, {untracked} untracked)"
    )]
    DirtyWorkingCopy {
        /// Plugin name.
        plugin: String,
        /// Number of staged paths.
        staged: usize,
        /// Number of modified but unstaged paths.
        unstaged: usize,
        /// Number of untracked files.
        untracked: usize,
    },

    /// The plugin has no metadata file.
    #[error("no info.ini file found at {0}")]
    MissingMetadataFile(PathBuf),

    /// The metadata file has no top-level `version` key.
    #[error("\"version\" not found in {0}")]
    MissingVersionKey(PathBuf),

    /// The version is not three dot-separated integers.
    #[error("invalid \"version\" in info.ini: \"{0}\"")]
    MalformedVersion(String),

    /// An archive for this version already exists.
    #[error("release already exists for current version: {0}")]
    ArchiveAlreadyExists(PathBuf),

    /// The version commit was created locally but could not be pushed.
    #[error("created commit {commit} but failed to push it: {source}")]
    PushFailed {
        /// Id of the local commit left behind.
        commit: String,
        /// Underlying push failure.
        #[source]
        source: plugsmith_git::GitError,
    },

    /// Git error.
    #[error("git error: {0}")]
    Git(#[from] plugsmith_git::GitError),

    /// Archive error.
    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReleaseError {
    /// Returns true for validation failures that end a run cleanly.
    ///
    /// Nothing has been written when one of these is returned.
    #[must_use]
    pub fn is_abort(&self) -> bool {
        matches!(
            self,
            Self::NotARepository { .. }
                | Self::DirtyWorkingCopy { .. }
                | Self::MissingMetadataFile(_)
                | Self::MissingVersionKey(_)
                | Self::MalformedVersion(_)
                | Self::ArchiveAlreadyExists(_)
        )
    }
}

/// Result type for release operations.
pub type ReleaseResult<T> = Result<T, ReleaseError>;
