//! Linking plugin working copies into a live server tree.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use plugsmith_config::LayoutConfig;
use tracing::{debug, info};

use crate::CoreResult;

/// A symlink created by [`Linker::link_plugin`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedLink {
    /// Path inside the plugin working copy.
    pub source: PathBuf,
    /// New link inside the live tree.
    pub destination: PathBuf,
}

/// Mirrors a plugin's role directories into the live tree as symlinks.
pub struct Linker<'a> {
    start_dir: &'a Path,
    link_dir: &'a Path,
    layout: &'a LayoutConfig,
}

impl<'a> Linker<'a> {
    /// Creates a linker.
    #[must_use]
    pub fn new(start_dir: &'a Path, link_dir: &'a Path, layout: &'a LayoutConfig) -> Self {
        Self {
            start_dir,
            link_dir,
            layout,
        }
    }

    /// Links every role of `plugin` that exists in its working copy.
    ///
    /// Existing destinations are left alone.
    ///
    /// # Errors
    ///
    /// Returns an error if a parent directory or a link cannot be created.
    pub fn link_plugin(&self, plugin: &str) -> CoreResult<Vec<CreatedLink>> {
        let repo_root = self.start_dir.join(plugin);
        let ini_name = format!("{plugin}.ini");
        let mut created = Vec::new();

        for role in self.roles() {
            let source_dir = repo_root.join(role).join(plugin);
            let dest_dir = self.link_dir.join(role).join(plugin);
            if source_dir.is_dir() && !occupied(&dest_dir) {
                create_link(&source_dir, &dest_dir, LinkKind::Directory)?;
                created.push(CreatedLink {
                    source: source_dir,
                    destination: dest_dir,
                });
            }

            let source_file = repo_root.join(role).join(&ini_name);
            let dest_file = self.link_dir.join(role).join(&ini_name);
            if source_file.is_file() && !occupied(&dest_file) {
                create_link(&source_file, &dest_file, LinkKind::File)?;
                created.push(CreatedLink {
                    source: source_file,
                    destination: dest_file,
                });
            }
        }

        info!(plugin, links = created.len(), "linked plugin");
        Ok(created)
    }

    fn roles(&self) -> [&str; 8] {
        [
            &self.layout.config,
            &self.layout.data,
            &self.layout.docs,
            &self.layout.events,
            &self.layout.logs,
            &self.layout.plugin,
            &self.layout.sound,
            &self.layout.translations,
        ]
    }
}

#[derive(Clone, Copy)]
enum LinkKind {
    Directory,
    File,
}

/// True when anything, including a dangling link, sits at `path`.
fn occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

fn create_link(source: &Path, destination: &Path, kind: LinkKind) -> io::Result<()> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }

    #[cfg(unix)]
    {
        let _ = kind;
        std::os::unix::fs::symlink(source, destination)?;
    }

    #[cfg(windows)]
    match kind {
        LinkKind::Directory => std::os::windows::fs::symlink_dir(source, destination)?,
        LinkKind::File => std::os::windows::fs::symlink_file(source, destination)?,
    }

    debug!(?source, ?destination, "created link");
    Ok(())
}
