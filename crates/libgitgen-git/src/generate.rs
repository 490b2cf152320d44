//! Repository generation entry point

use std::path::Path;

use libgitgen_core::{execute, normalize, Backend, Command, GenerateRequest};
use serde::Serialize;
use tracing::info;

use crate::repo::GitBackend;
use crate::GitError;

/// Summary of a generated repository
#[derive(Debug, Clone, Serialize)]
pub struct GenerateReport {
    pub dir: String,
    /// Number of commands executed
    pub commands: usize,
    /// Number of commit and merge commands among them
    pub commits: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<String>,
}

/// Fail if `dir` already holds a repository
pub fn ensure_no_repository(dir: &Path) -> Result<(), GitError> {
    if dir.join(".git").exists() {
        return Err(GitError::RepoExists(dir.display().to_string()));
    }
    Ok(())
}

/// Generate a repository in `dir` from a request.
///
/// The pre-existence check runs before the log is normalized, so a rejected
/// directory is never touched.
pub fn generate_repo(dir: &Path, request: GenerateRequest) -> Result<GenerateReport, GitError> {
    ensure_no_repository(dir)?;
    let conf = request.into_conf();
    let commands = normalize(&conf)?;
    generate_from_commands(dir, &commands)
}

/// Execute already-normalized commands into `dir`
pub fn generate_from_commands(dir: &Path, commands: &[Command]) -> Result<GenerateReport, GitError> {
    ensure_no_repository(dir)?;
    std::fs::create_dir_all(dir)?;

    let mut backend = GitBackend::new(dir);
    execute(&mut backend, commands)?;

    let branch = if backend.is_initialized() {
        backend.current_branch()?
    } else {
        None
    };
    let report = GenerateReport {
        dir: dir.display().to_string(),
        commands: commands.len(),
        commits: commands.iter().filter(|c| c.creates_commit()).count(),
        branch,
        head: backend.head_id()?,
    };
    info!(dir = %report.dir, commands = report.commands, "generated repository");
    Ok(report)
}
