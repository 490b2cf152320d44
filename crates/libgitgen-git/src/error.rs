use libgitgen_core::{EventLogError, GenError};
use thiserror::Error;

/// Errors that can occur while generating a repository
#[derive(Debug, Error)]
pub enum GitError {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    EventLog(#[from] EventLogError),

    #[error("A Git repository already exists in {0}")]
    RepoExists(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Branch has no commits yet: {0}")]
    Unborn(String),

    #[error("Merge of {theirs} has conflicts in: {}", paths.join(", "))]
    MergeConflict { theirs: String, paths: Vec<String> },

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

impl From<GitError> for GenError {
    fn from(err: GitError) -> Self {
        match err {
            GitError::EventLog(e) => GenError::EventLog(e),
            GitError::Io(e) => GenError::Io(e),
            GitError::RepoExists(dir) => GenError::RepoExists(dir),
            GitError::NotFound(msg) => GenError::NotFound(msg),
            GitError::MergeConflict { .. } => GenError::Conflict(err.to_string()),
            GitError::InvalidPath(msg) => GenError::InvalidArgs(format!("invalid path: {}", msg)),
            GitError::Git(_) | GitError::Unborn(_) => GenError::Backend(err.to_string()),
        }
    }
}
