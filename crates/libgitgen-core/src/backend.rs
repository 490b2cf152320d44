//! Capability interface to the version-control backend
//!
//! The executor only talks to a repository through this trait. `gitgen`
//! ships a libgit2 implementation in `libgitgen-git`; tests use an in-memory
//! recorder.

use serde::{Deserialize, Serialize};
use crate::types::command::{CommitInfo, Pathspec};

/// How a merge resolves conflicting hunks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Take the incoming branch's version
    #[default]
    Theirs,
    /// Keep the current branch's version
    Ours,
    /// Refuse to commit a conflicted merge
    Fail,
}

/// Version-control operations the executor needs.
///
/// Every method acts on the repository the backend was opened for, relative
/// to its root. Errors are returned to the caller unchanged.
pub trait Backend {
    type Error;

    /// Create the repository with `default_branch` as the unborn HEAD
    fn init(&mut self, default_branch: &str) -> Result<(), Self::Error>;

    /// Stage paths into the index
    fn stage(&mut self, paths: &Pathspec) -> Result<(), Self::Error>;

    /// Commit the index on HEAD, returning the new commit id
    fn commit(&mut self, info: &CommitInfo) -> Result<String, Self::Error>;

    /// Create a branch at HEAD without switching to it
    fn create_branch(&mut self, name: &str) -> Result<(), Self::Error>;

    /// Switch HEAD and the working tree to a branch, tag or commit
    fn checkout(&mut self, reference: &str) -> Result<(), Self::Error>;

    /// Name of the checked-out branch, `None` when HEAD is detached
    fn current_branch(&self) -> Result<Option<String>, Self::Error>;

    /// Merge `theirs` into HEAD, committing the result with `info`
    fn merge(
        &mut self,
        theirs: &str,
        info: &CommitInfo,
        fast_forward: bool,
        policy: ConflictPolicy,
    ) -> Result<(), Self::Error>;

    /// Lightweight tag at HEAD
    fn tag(&mut self, name: &str) -> Result<(), Self::Error>;

    /// Annotated tag at HEAD; `info` supplies message and tagger
    fn annotated_tag(&mut self, name: &str, info: &CommitInfo) -> Result<(), Self::Error>;

    /// Overwrite a working-tree file, creating parent directories
    fn write_file(&mut self, path: &str, content: &str) -> Result<(), Self::Error>;

    /// Append to a working-tree file, creating it if missing
    fn append_file(&mut self, path: &str, content: &str) -> Result<(), Self::Error>;
}
