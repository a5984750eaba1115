//! Release archive writer.

use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::{ReleaseError, ReleaseResult};

/// A deflate-compressed zip archive being written for one release.
///
/// Every file entry is accompanied by explicit entries for each of its
/// parent directories, written once each.
pub struct ReleaseArchive {
    writer: ZipWriter<File>,
    path: PathBuf,
    options: SimpleFileOptions,
    entries: Vec<String>,
    seen: HashSet<String>,
}

impl ReleaseArchive {
    /// Creates a new archive, refusing to touch an existing file.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseError::ArchiveAlreadyExists`] if the path is taken,
    /// or an IO error if the file cannot be created.
    pub fn create_new(path: impl Into<PathBuf>) -> ReleaseResult<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => ReleaseError::ArchiveAlreadyExists(path.clone()),
                _ => ReleaseError::Io(e),
            })?;

        debug!(?path, "created archive");
        Ok(Self {
            writer: ZipWriter::new(file),
            path,
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
            entries: Vec::new(),
            seen: HashSet::new(),
        })
    }

    /// Returns the entry names written so far, in write order.
    #[must_use]
    pub fn entry_names(&self) -> &[String] {
        &self.entries
    }

    /// Returns whether an entry with this exact name has been written.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.seen.contains(name)
    }

    /// Adds a file read from `repo_root` under its repository-relative
    /// path, followed by any parent directory entries not yet present.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or written.
    pub fn add_file(&mut self, repo_root: &Path, relative_path: &str) -> ReleaseResult<()> {
        let name = relative_path.replace('\\', "/");
        let bytes = fs::read(repo_root.join(&name))?;

        self.writer.start_file(name.clone(), self.options)?;
        self.writer.write_all(&bytes)?;
        self.record(name.clone());

        let mut current = name.as_str();
        while let Some((parent, _)) = current.rsplit_once('/') {
            let directory = format!("{parent}/");
            if !self.contains(&directory) {
                self.writer.add_directory(directory.clone(), self.options)?;
                self.record(directory);
            }
            current = parent;
        }

        Ok(())
    }

    /// Writes the central directory and closes the file.
    ///
    /// The file is removed if it cannot be finalised.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive cannot be finalised.
    pub fn finish(self) -> ReleaseResult<PathBuf> {
        let Self {
            writer,
            path,
            entries,
            ..
        } = self;
        if let Err(e) = writer.finish() {
            remove_incomplete(&path);
            return Err(e.into());
        }
        debug!(?path, entries = entries.len(), "finished archive");
        Ok(path)
    }

    /// Closes and deletes an archive that could not be completed.
    pub fn discard(self) {
        let Self { writer, path, .. } = self;
        drop(writer);
        remove_incomplete(&path);
    }

    fn record(&mut self, name: String) {
        self.seen.insert(name.clone());
        self.entries.push(name);
    }
}

fn remove_incomplete(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        warn!(?path, error = %e, "failed to remove incomplete archive");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn write_file(dir: &Path, relative: &str, content: &str) {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn archive_names(path: &Path) -> Vec<String> {
        let archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
        archive.file_names().map(String::from).collect()
    }

    #[test]
    fn test_shared_parents_written_once() {
        let repo = TempDir::new().unwrap();
        write_file(repo.path(), "a/b/c.py", "print('c')\n");
        write_file(repo.path(), "a/b/d.py", "print('d')\n");
        let out = TempDir::new().unwrap();

        let mut archive = ReleaseArchive::create_new(out.path().join("release.zip")).unwrap();
        archive.add_file(repo.path(), "a/b/c.py").unwrap();
        archive.add_file(repo.path(), "a/b/d.py").unwrap();
        assert_eq!(archive.entry_names(), ["a/b/c.py", "a/b/", "a/", "a/b/d.py"]);
        let path = archive.finish().unwrap();

        let mut names = archive_names(&path);
        names.sort();
        assert_eq!(names, vec!["a/", "a/b/", "a/b/c.py", "a/b/d.py"]);
    }

    #[test]
    fn test_top_level_file_has_no_directory_entries() {
        let repo = TempDir::new().unwrap();
        write_file(repo.path(), "readme.md", "# readme\n");
        let out = TempDir::new().unwrap();

        let mut archive = ReleaseArchive::create_new(out.path().join("release.zip")).unwrap();
        archive.add_file(repo.path(), "readme.md").unwrap();
        assert_eq!(archive.entry_names(), ["readme.md"]);
        archive.finish().unwrap();
    }

    #[test]
    fn test_file_contents_are_deflated() {
        let repo = TempDir::new().unwrap();
        let content = "x".repeat(4096);
        write_file(repo.path(), "data/big.txt", &content);
        let out = TempDir::new().unwrap();

        let mut archive = ReleaseArchive::create_new(out.path().join("release.zip")).unwrap();
        archive.add_file(repo.path(), "data/big.txt").unwrap();
        let path = archive.finish().unwrap();

        let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
        let mut entry = archive.by_name("data/big.txt").unwrap();
        assert_eq!(entry.compression(), CompressionMethod::Deflated);
        let mut read_back = String::new();
        entry.read_to_string(&mut read_back).unwrap();
        assert_eq!(read_back, content);

        drop(entry);
        assert!(archive.by_name("data/").unwrap().is_dir());
    }

    #[test]
    fn test_create_new_refuses_existing_file() {
        let out = TempDir::new().unwrap();
        let path = out.path().join("release.zip");
        fs::write(&path, b"previous release").unwrap();

        let result = ReleaseArchive::create_new(&path);
        assert!(matches!(result, Err(ReleaseError::ArchiveAlreadyExists(p)) if p == path));
        assert_eq!(fs::read(&path).unwrap(), b"previous release");
    }

    #[test]
    fn test_discard_removes_file() {
        let out = TempDir::new().unwrap();
        let path = out.path().join("release.zip");

        let archive = ReleaseArchive::create_new(&path).unwrap();
        archive.discard();
        assert!(!path.exists());
    }

    #[test]
    fn test_discard_tolerates_missing_file() {
        let out = TempDir::new().unwrap();
        let path = out.path().join("release.zip");

        let archive = ReleaseArchive::create_new(&path).unwrap();
        fs::remove_file(&path).unwrap();
        archive.discard();
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_source_file() {
        let repo = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();

        let mut archive = ReleaseArchive::create_new(out.path().join("release.zip")).unwrap();
        let result = archive.add_file(repo.path(), "missing.py");
        assert!(matches!(result, Err(ReleaseError::Io(_))));
    }
}
