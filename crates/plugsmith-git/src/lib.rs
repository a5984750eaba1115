//! Git abstraction layer for Plugsmith.
//!
//! This crate provides the Git operations a plugin release needs:
//! - Working copy cleanliness (staged, unstaged, untracked)
//! - Staging, committing and pushing
//! - Listing tracked files

mod error;
mod repository;

pub use error::{GitError, GitResult};
pub use repository::Repository;
