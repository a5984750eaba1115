//! Release orchestration.
//!
//! A run moves a plugin through explicit states, each step consuming the
//! previous one:
//!
//! ```text
//! validate_diff -> CleanCheckout
//!   validate_version_exists -> VersionedCheckout
//!     find_new_version -> Option<VersionBump>
//!       commit_update -> VersionedCheckout (bumped)
//!     create_release -> archive path
//! ```
//!
//! The version commit is pushed before the archive is written. A failed
//! push leaves the commit in the local repository.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use plugsmith_config::Config;
use plugsmith_git::Repository;
use tracing::{debug, info};

use crate::prompt::{Prompter, ask_until};
use crate::{
    BumpType, FileTypeAllowList, INFO_FILE_NAME, PluginVersion, ReleaseArchive, ReleaseError,
    ReleaseResult, info_file_path, read_version, write_version,
};

/// Remote that version commits are pushed to.
pub const PUSH_REMOTE: &str = "origin";

/// A plugin working copy with no pending changes.
pub struct CleanCheckout {
    plugin: String,
    root: PathBuf,
    repo: Repository,
}

impl CleanCheckout {
    /// Plugin name.
    #[must_use]
    pub fn plugin(&self) -> &str {
        &self.plugin
    }

    /// Repository root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// A clean working copy whose metadata holds a valid version.
pub struct VersionedCheckout {
    checkout: CleanCheckout,
    info_file: PathBuf,
    version: PluginVersion,
}

impl VersionedCheckout {
    /// Plugin name.
    #[must_use]
    pub fn plugin(&self) -> &str {
        self.checkout.plugin()
    }

    /// The underlying checkout.
    #[must_use]
    pub fn checkout(&self) -> &CleanCheckout {
        &self.checkout
    }

    /// Metadata file the version was read from.
    #[must_use]
    pub fn info_file(&self) -> &Path {
        &self.info_file
    }

    /// Current version.
    #[must_use]
    pub fn version(&self) -> &PluginVersion {
        &self.version
    }

    /// Returns the bump to apply for `kind`, or `None` when nothing changes.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseError::MalformedVersion`] if the version cannot be
    /// incremented.
    pub fn bumped(&self, kind: BumpType) -> ReleaseResult<Option<VersionBump>> {
        match kind {
            BumpType::None => Ok(None),
            kind => Ok(Some(VersionBump {
                kind,
                version: self.version.bump(kind)?,
            })),
        }
    }
}

/// A chosen version increment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionBump {
    /// Component that was incremented.
    pub kind: BumpType,
    /// Version after the increment.
    pub version: PluginVersion,
}

/// Result of a successful release run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseOutcome {
    /// Plugin name.
    pub plugin: String,
    /// Released version.
    pub version: PluginVersion,
    /// Archive that was written.
    pub archive: PathBuf,
    /// Bump committed during the run, if any.
    pub bump: Option<VersionBump>,
}

/// Builds release archives for plugins under a start directory.
pub struct ReleaseBuilder {
    start_dir: PathBuf,
    release_dir: PathBuf,
    plugin_base: String,
    allow_list: FileTypeAllowList,
}

impl ReleaseBuilder {
    /// Creates a release builder.
    #[must_use]
    pub fn new(
        start_dir: impl Into<PathBuf>,
        release_dir: impl Into<PathBuf>,
        plugin_base: impl Into<String>,
        allow_list: FileTypeAllowList,
    ) -> Self {
        Self {
            start_dir: start_dir.into(),
            release_dir: release_dir.into(),
            plugin_base: plugin_base.into(),
            allow_list,
        }
    }

    /// Creates a release builder from configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.paths.start_dir,
            &config.paths.release_dir,
            &config.layout.plugin,
            FileTypeAllowList::from_layout(&config.layout),
        )
    }

    /// Runs a full release for `plugin`.
    ///
    /// # Errors
    ///
    /// Returns an abort error when a validation step fails, or the
    /// underlying failure of a git, archive or IO operation.
    pub fn run(&self, plugin: &str, prompter: &mut dyn Prompter) -> ReleaseResult<ReleaseOutcome> {
        let checkout = self.validate_diff(plugin)?;
        let mut checkout = self.validate_version_exists(checkout)?;

        let bump = self.find_new_version(&checkout, prompter)?;
        let target = bump.as_ref().map_or(checkout.version(), |b| &b.version);

        // Refuse before committing anything.
        let archive_path = self.archive_path(plugin, target);
        if archive_path.exists() {
            return Err(ReleaseError::ArchiveAlreadyExists(archive_path));
        }

        if let Some(bump) = &bump {
            checkout = self.commit_update(checkout, bump)?;
        }

        let archive = self.create_release(&checkout)?;
        Ok(ReleaseOutcome {
            plugin: plugin.to_string(),
            version: checkout.version,
            archive,
            bump,
        })
    }

    /// Opens the plugin repository and checks it has no pending changes.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseError::NotARepository`] or
    /// [`ReleaseError::DirtyWorkingCopy`].
    pub fn validate_diff(&self, plugin: &str) -> ReleaseResult<CleanCheckout> {
        let root = self.start_dir.join(plugin);
        let repo = Repository::open(&root).map_err(|_| ReleaseError::NotARepository {
            plugin: plugin.to_string(),
            path: root.clone(),
        })?;

        let staged = repo.staged_changes()?.len();
        let unstaged = repo.unstaged_changes()?.len();
        let untracked = repo.untracked_files()?.len();
        if staged + unstaged + untracked > 0 {
            return Err(ReleaseError::DirtyWorkingCopy {
                plugin: plugin.to_string(),
                staged,
                unstaged,
                untracked,
            });
        }

        info!(plugin, "working copy is clean");
        Ok(CleanCheckout {
            plugin: plugin.to_string(),
            root,
            repo,
        })
    }

    /// Reads the plugin's version from its metadata file.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseError::MissingMetadataFile`],
    /// [`ReleaseError::MissingVersionKey`] or
    /// [`ReleaseError::MalformedVersion`].
    pub fn validate_version_exists(
        &self,
        checkout: CleanCheckout,
    ) -> ReleaseResult<VersionedCheckout> {
        let info_file = info_file_path(&checkout.root, &self.plugin_base, &checkout.plugin);
        let version = read_version(&info_file)?;

        info!(plugin = %checkout.plugin, %version, "read current version");
        Ok(VersionedCheckout {
            checkout,
            info_file,
            version,
        })
    }

    /// Asks which version component to bump, re-asking on invalid input.
    ///
    /// Returns `None` when the user keeps the current version.
    ///
    /// # Errors
    ///
    /// Returns an error if input cannot be read, or
    /// [`ReleaseError::MalformedVersion`] if the chosen component cannot be
    /// incremented.
    #[allow(clippy::unused_self)]
    pub fn find_new_version(
        &self,
        checkout: &VersionedCheckout,
        prompter: &mut dyn Prompter,
    ) -> ReleaseResult<Option<VersionBump>> {
        let mut message = String::from("Which type of version update should this be?\n\n");
        for (number, kind) in BumpType::MENU {
            let _ = writeln!(message, "\t({number}) {}", kind.label());
        }
        message.push('\n');

        let kind = ask_until(prompter, &message, |answer| {
            if answer.is_empty() || !answer.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            answer.parse().ok().and_then(BumpType::from_choice)
        })?;

        let bump = checkout.bumped(kind)?;
        match &bump {
            Some(bump) => info!(kind = %bump.kind, version = %bump.version, "version bump chosen"),
            None => info!("keeping current version"),
        }
        Ok(bump)
    }

    /// Writes the bumped version, commits it and pushes to [`PUSH_REMOTE`].
    ///
    /// # Errors
    ///
    /// Returns an error if the metadata cannot be written or the commit
    /// fails, or [`ReleaseError::PushFailed`] if the commit was created but
    /// could not be pushed.
    pub fn commit_update(
        &self,
        checkout: VersionedCheckout,
        bump: &VersionBump,
    ) -> ReleaseResult<VersionedCheckout> {
        write_version(&checkout.info_file, &bump.version)?;

        let plugin = checkout.plugin();
        let relative = Path::new(&self.plugin_base)
            .join(plugin)
            .join(INFO_FILE_NAME);
        let repo = &checkout.checkout.repo;
        repo.stage_file(&relative)?;

        let message = format!("{} version update ({})", bump.kind.label(), bump.version);
        let commit = repo.commit(&message)?;
        info!(plugin, %commit, %message, "committed version update");

        repo.push(PUSH_REMOTE)
            .map_err(|source| ReleaseError::PushFailed { commit, source })?;
        info!(plugin, remote = PUSH_REMOTE, "pushed version update");

        Ok(VersionedCheckout {
            version: bump.version.clone(),
            ..checkout
        })
    }

    /// Writes the release archive for the checkout's current version.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseError::ArchiveAlreadyExists`] without writing if
    /// the archive is already present, or the failure that interrupted
    /// writing. An interrupted archive is removed.
    pub fn create_release(&self, checkout: &VersionedCheckout) -> ReleaseResult<PathBuf> {
        let path = self.archive_path(checkout.plugin(), checkout.version());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tracked = checkout.checkout.repo.tracked_files()?;
        let mut archive = ReleaseArchive::create_new(&path)?;

        let root = checkout.checkout.root();
        let written = tracked
            .iter()
            .filter(|file| self.validate_file_by_base_path(file))
            .try_for_each(|file| archive.add_file(root, file));
        if let Err(e) = written {
            archive.discard();
            return Err(e);
        }

        let entries = archive.entry_names().len();
        let path = archive.finish()?;

        info!(plugin = checkout.plugin(), ?path, entries, "created release archive");
        Ok(path)
    }

    /// Returns whether a tracked file belongs in the release.
    #[must_use]
    pub fn validate_file_by_base_path(&self, relative_path: &str) -> bool {
        let allowed = self.allow_list.allows(relative_path);
        debug!(relative_path, allowed, "checked release file");
        allowed
    }

    /// Returns where the archive for `plugin` at `version` is written.
    #[must_use]
    pub fn archive_path(&self, plugin: &str, version: &PluginVersion) -> PathBuf {
        self.release_dir
            .join(plugin)
            .join(format!("{plugin} - v{version}.zip"))
    }
}
