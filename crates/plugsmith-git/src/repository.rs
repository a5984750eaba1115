//! Git repository wrapper.

use std::path::Path;

use git2::{
    Cred, CredentialType, Diff, ErrorCode, PushOptions, RemoteCallbacks, Repository as Git2Repo,
    Status, StatusOptions, Tree,
};
use tracing::debug;

use crate::{GitError, GitResult};

/// Credential callbacks are retried by libgit2 until they succeed.
const MAX_CREDENTIAL_ATTEMPTS: u32 = 3;

/// A Git repository wrapper.
pub struct Repository {
    inner: Git2Repo,
}

impl Repository {
    /// Opens a repository at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not a valid Git repository.
    pub fn open(path: impl AsRef<Path>) -> GitResult<Self> {
        let path = path.as_ref();
        let inner = Git2Repo::open(path).map_err(|_| GitError::NotARepo(path.to_path_buf()))?;
        Ok(Self { inner })
    }

    /// Returns paths staged in the index but not yet committed.
    ///
    /// On an unborn branch every index entry counts as staged.
    ///
    /// # Errors
    ///
    /// Returns an error if HEAD or the index cannot be read.
    pub fn staged_changes(&self) -> GitResult<Vec<String>> {
        let head_tree = self.head_tree()?;
        let diff = self
            .inner
            .diff_tree_to_index(head_tree.as_ref(), None, None)?;
        Ok(diff_paths(&diff))
    }

    /// Returns tracked paths modified in the working tree but not staged.
    ///
    /// # Errors
    ///
    /// Returns an error if the index or working tree cannot be read.
    pub fn unstaged_changes(&self) -> GitResult<Vec<String>> {
        let diff = self.inner.diff_index_to_workdir(None, None)?;
        Ok(diff_paths(&diff))
    }

    /// Returns files that are neither tracked nor ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository status cannot be read.
    pub fn untracked_files(&self) -> GitResult<Vec<String>> {
        let mut options = StatusOptions::new();
        options
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let statuses = self.inner.statuses(Some(&mut options))?;
        Ok(statuses
            .iter()
            .filter(|entry| entry.status().contains(Status::WT_NEW))
            .filter_map(|entry| entry.path().map(String::from))
            .collect())
    }

    /// Returns every path recorded in the index, in index order.
    ///
    /// # Errors
    ///
    /// Returns an error if the index cannot be read.
    pub fn tracked_files(&self) -> GitResult<Vec<String>> {
        let index = self.inner.index()?;
        let mut files: Vec<String> = index
            .iter()
            .map(|entry| String::from_utf8_lossy(&entry.path).into_owned())
            .collect();
        // Conflicted paths appear once per stage.
        files.dedup();
        Ok(files)
    }

    /// Stages a single file given relative to the repository root.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be added to the index.
    pub fn stage_file(&self, relative_path: impl AsRef<Path>) -> GitResult<()> {
        let relative_path = relative_path.as_ref();
        let mut index = self.inner.index()?;
        index.add_path(relative_path)?;
        index.write()?;
        debug!(path = %relative_path.display(), "staged file");
        Ok(())
    }

    /// Commits the current index on top of HEAD and returns the new commit id.
    ///
    /// # Errors
    ///
    /// Returns an error if no signature is configured or the commit fails.
    pub fn commit(&self, message: &str) -> GitResult<String> {
        let sig = self.inner.signature()?;
        let tree_id = {
            let mut index = self.inner.index()?;
            index.write_tree()?
        };
        let tree = self.inner.find_tree(tree_id)?;

        let parent = self.inner.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let oid = self
            .inner
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)?;
        debug!(%oid, "created commit");
        Ok(oid.to_string())
    }

    /// Pushes the current branch to the named remote.
    ///
    /// Authentication tries the SSH agent first, then the configured
    /// credential helper.
    ///
    /// # Errors
    ///
    /// Returns an error if HEAD is detached, the remote is unknown, the
    /// transport fails or the remote rejects the update.
    pub fn push(&self, remote_name: &str) -> GitResult<()> {
        let head = self.inner.head()?;
        if !head.is_branch() {
            return Err(GitError::DetachedHead);
        }
        let branch = head.shorthand().ok_or(GitError::DetachedHead)?;
        let refspec = format!("refs/heads/{branch}:refs/heads/{branch}");

        let mut remote = self
            .inner
            .find_remote(remote_name)
            .map_err(|_| GitError::RemoteNotFound(remote_name.to_string()))?;
        let config = self.inner.config()?;

        let mut rejected: Option<String> = None;
        {
            let mut attempts = 0;
            let mut callbacks = RemoteCallbacks::new();
            callbacks.credentials(|url, username, allowed| {
                attempts += 1;
                if attempts > MAX_CREDENTIAL_ATTEMPTS {
                    return Err(git2::Error::from_str("authentication failed"));
                }
                if allowed.contains(CredentialType::SSH_KEY) {
                    return Cred::ssh_key_from_agent(username.unwrap_or("git"));
                }
                if allowed.contains(CredentialType::USER_PASS_PLAINTEXT) {
                    return Cred::credential_helper(&config, url, username);
                }
                Cred::default()
            });
            callbacks.push_update_reference(|refname, status| {
                if let Some(message) = status {
                    rejected = Some(format!("{refname}: {message}"));
                }
                Ok(())
            });

            let mut options = PushOptions::new();
            options.remote_callbacks(callbacks);
            remote.push(&[refspec.as_str()], Some(&mut options))?;
        }

        if let Some(reason) = rejected {
            return Err(GitError::PushRejected(reason));
        }

        debug!(remote = remote_name, %branch, "pushed branch");
        Ok(())
    }

    fn head_tree(&self) -> GitResult<Option<Tree<'_>>> {
        match self.inner.head() {
            Ok(head) => Ok(Some(head.peel_to_tree()?)),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn diff_paths(diff: &Diff<'_>) -> Vec<String> {
    diff.deltas()
        .filter_map(|delta| delta.new_file().path().or_else(|| delta.old_file().path()))
        .map(|path| path.to_string_lossy().replace('\\', "/"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{IndexAddOption, Repository as Git2Repository};
    use std::fs;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, Repository) {
        let temp_dir = TempDir::new().unwrap();
        let git2_repo = Git2Repository::init(temp_dir.path()).unwrap();

        // Configure user for commits
        let mut config = git2_repo.config().unwrap();
        config.set_str("user.name", "Test User").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();

        let repo = Repository { inner: git2_repo };
        (temp_dir, repo)
    }

    fn write_file(dir: &Path, relative: &str, content: &str) {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn commit_all(repo: &Repository, message: &str) {
        let mut index = repo.inner.index().unwrap();
        index
            .add_all(["*"], IndexAddOption::DEFAULT, None)
            .unwrap();
        index.write().unwrap();
        repo.commit(message).unwrap();
    }

    #[test]
    fn test_open_valid_repo() {
        let (temp_dir, _repo) = create_test_repo();
        let result = Repository::open(temp_dir.path());
        assert!(result.is_ok());
    }

    #[test]
    fn test_open_not_a_repo() {
        let temp_dir = TempDir::new().unwrap();
        let result = Repository::open(temp_dir.path());
        assert!(matches!(result, Err(GitError::NotARepo(_))));
    }

    #[test]
    fn test_clean_repo_has_no_changes() {
        let (temp_dir, repo) = create_test_repo();
        write_file(temp_dir.path(), "readme.md", "hello\n");
        commit_all(&repo, "Initial commit");

        assert!(repo.staged_changes().unwrap().is_empty());
        assert!(repo.unstaged_changes().unwrap().is_empty());
        assert!(repo.untracked_files().unwrap().is_empty());
    }

    #[test]
    fn test_untracked_files() {
        let (temp_dir, repo) = create_test_repo();
        write_file(temp_dir.path(), "readme.md", "hello\n");
        commit_all(&repo, "Initial commit");
        write_file(temp_dir.path(), "nested/new.txt", "new\n");

        assert_eq!(repo.untracked_files().unwrap(), vec!["nested/new.txt"]);
        assert!(repo.staged_changes().unwrap().is_empty());
        assert!(repo.unstaged_changes().unwrap().is_empty());
    }

    #[test]
    fn test_ignored_files_are_not_untracked() {
        let (temp_dir, repo) = create_test_repo();
        write_file(temp_dir.path(), ".gitignore", "*.log\n");
        commit_all(&repo, "Initial commit");
        write_file(temp_dir.path(), "debug.log", "noise\n");

        assert!(repo.untracked_files().unwrap().is_empty());
    }

    #[test]
    fn test_unstaged_changes() {
        let (temp_dir, repo) = create_test_repo();
        write_file(temp_dir.path(), "readme.md", "hello\n");
        commit_all(&repo, "Initial commit");
        write_file(temp_dir.path(), "readme.md", "changed\n");

        assert_eq!(repo.unstaged_changes().unwrap(), vec!["readme.md"]);
        assert!(repo.staged_changes().unwrap().is_empty());
    }

    #[test]
    fn test_staged_changes() {
        let (temp_dir, repo) = create_test_repo();
        write_file(temp_dir.path(), "readme.md", "hello\n");
        commit_all(&repo, "Initial commit");
        write_file(temp_dir.path(), "readme.md", "changed\n");
        repo.stage_file("readme.md").unwrap();

        assert_eq!(repo.staged_changes().unwrap(), vec!["readme.md"]);
        assert!(repo.unstaged_changes().unwrap().is_empty());
    }

    #[test]
    fn test_staged_changes_on_unborn_branch() {
        let (temp_dir, repo) = create_test_repo();
        write_file(temp_dir.path(), "readme.md", "hello\n");
        repo.stage_file("readme.md").unwrap();

        assert_eq!(repo.staged_changes().unwrap(), vec!["readme.md"]);
    }

    #[test]
    fn test_tracked_files() {
        let (temp_dir, repo) = create_test_repo();
        write_file(temp_dir.path(), "b/second.txt", "2\n");
        write_file(temp_dir.path(), "a/first.txt", "1\n");
        commit_all(&repo, "Initial commit");
        write_file(temp_dir.path(), "untracked.txt", "?\n");

        let files = repo.tracked_files().unwrap();
        assert_eq!(files, vec!["a/first.txt", "b/second.txt"]);
    }

    #[test]
    fn test_commit_advances_head() {
        let (temp_dir, repo) = create_test_repo();
        write_file(temp_dir.path(), "readme.md", "hello\n");
        commit_all(&repo, "Initial commit");

        write_file(temp_dir.path(), "readme.md", "changed\n");
        repo.stage_file("readme.md").unwrap();
        let oid = repo.commit("Second commit").unwrap();

        let head = repo.inner.head().unwrap().peel_to_commit().unwrap();
        assert_eq!(head.id().to_string(), oid);
        assert_eq!(head.message(), Some("Second commit"));
        assert_eq!(head.parent_count(), 1);
        assert!(repo.staged_changes().unwrap().is_empty());
        assert!(repo.unstaged_changes().unwrap().is_empty());
    }

    #[test]
    fn test_push_to_local_remote() {
        let (temp_dir, repo) = create_test_repo();
        let remote_dir = TempDir::new().unwrap();
        Git2Repository::init_bare(remote_dir.path()).unwrap();
        repo.inner
            .remote("origin", remote_dir.path().to_str().unwrap())
            .unwrap();

        write_file(temp_dir.path(), "readme.md", "hello\n");
        commit_all(&repo, "Initial commit");
        repo.push("origin").unwrap();

        let head = repo.inner.head().unwrap();
        let branch = head.shorthand().unwrap();
        let local = head.peel_to_commit().unwrap().id();

        let remote_repo = Git2Repository::open_bare(remote_dir.path()).unwrap();
        let pushed = remote_repo
            .find_reference(&format!("refs/heads/{branch}"))
            .unwrap()
            .peel_to_commit()
            .unwrap()
            .id();
        assert_eq!(pushed, local);
    }

    #[test]
    fn test_push_unknown_remote() {
        let (temp_dir, repo) = create_test_repo();
        write_file(temp_dir.path(), "readme.md", "hello\n");
        commit_all(&repo, "Initial commit");

        let result = repo.push("origin");
        assert!(matches!(result, Err(GitError::RemoteNotFound(name)) if name == "origin"));
    }
}
