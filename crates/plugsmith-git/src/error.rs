//! Git error types.

use thiserror::Error;

/// Git-related errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not a git repository.
    #[error("not a git repository: {0}")]
    NotARepo(std::path::PathBuf),

    /// Remote not configured.
    #[error("remote not found: {0}")]
    RemoteNotFound(String),

    /// HEAD does not point at a branch.
    #[error("HEAD is not on a branch")]
    DetachedHead,

    /// The remote refused a pushed reference.
    #[error("push rejected: {0}")]
    PushRejected(String),

    /// Git2 error.
    #[error("git error: {0}")]
    Git2(#[from] git2::Error),
}

/// Result type for git operations.
pub type GitResult<T> = Result<T, GitError>;
