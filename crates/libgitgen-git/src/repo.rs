//! libgit2 implementation of the backend capability interface

use std::borrow::Cow;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use git2::build::CheckoutBuilder;
use git2::{
    BranchType, Commit, ErrorCode, FileFavor, Index, IndexAddOption, IndexConflict, MergeOptions,
    Object, Repository, RepositoryInitOptions, Signature,
};
use libgitgen_core::{Backend, CommitInfo, ConflictPolicy, Pathspec};
use tracing::{debug, info, warn};

use crate::GitError;

/// Stage bits of `IndexEntry::flags`
const STAGE_MASK: u16 = 0x3000;

/// Backend over a repository rooted at `workdir`.
///
/// The repository itself is created by the `init` command; until then only
/// working-tree writes are possible.
pub struct GitBackend {
    workdir: PathBuf,
    repo: Option<Repository>,
}

impl GitBackend {
    /// Backend for a directory that does not hold a repository yet
    pub fn new(workdir: &Path) -> Self {
        Self {
            workdir: workdir.to_path_buf(),
            repo: None,
        }
    }

    /// Id of the commit HEAD points at, if any
    pub fn head_id(&self) -> Result<Option<String>, GitError> {
        match &self.repo {
            Some(repo) => Ok(head_commit(repo)?.map(|c| c.id().to_string())),
            None => Ok(None),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.repo.is_some()
    }

    fn repo(&self) -> Result<&Repository, GitError> {
        self.repo.as_ref().ok_or_else(|| {
            GitError::NotFound(format!(
                "no repository in {} (the log must start with init)",
                self.workdir.display()
            ))
        })
    }

    /// Resolve a path relative to the repository root, refusing escapes
    fn worktree_path(&self, path: &str) -> Result<PathBuf, GitError> {
        let rel = Path::new(path);
        let escapes = rel.components().any(|c| match c {
            Component::Normal(name) => name == ".git",
            Component::CurDir => false,
            _ => true,
        });
        if escapes || path.is_empty() {
            return Err(GitError::InvalidPath(path.to_string()));
        }
        Ok(self.workdir.join(rel))
    }
}

fn head_commit(repo: &Repository) -> Result<Option<Commit<'_>>, GitError> {
    match repo.head() {
        Ok(head) => Ok(Some(head.peel_to_commit()?)),
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn head_object<'r>(repo: &'r Repository, action: &str) -> Result<Object<'r>, GitError> {
    let commit = head_commit(repo)?.ok_or_else(|| {
        GitError::Unborn(format!("cannot {} before the first commit", action))
    })?;
    Ok(commit.into_object())
}

/// Resolve a branch, tag or revision to a commit
fn resolve_commit<'r>(repo: &'r Repository, reference: &str) -> Result<Commit<'r>, GitError> {
    if let Ok(branch) = repo.find_branch(reference, BranchType::Local) {
        return Ok(branch.get().peel_to_commit()?);
    }
    match repo.revparse_single(reference) {
        Ok(object) => Ok(object.peel_to_commit()?),
        Err(e) if e.code() == ErrorCode::NotFound || e.code() == ErrorCode::InvalidSpec => {
            Err(GitError::NotFound(format!("ref '{}'", reference)))
        }
        Err(e) => Err(e.into()),
    }
}

/// Messages end with a newline, as git itself writes them
fn git_message(message: &str) -> Cow<'_, str> {
    if message.ends_with('\n') {
        Cow::Borrowed(message)
    } else {
        Cow::Owned(format!("{}\n", message))
    }
}

fn conflict_path(conflict: &IndexConflict) -> Option<String> {
    conflict
        .our
        .as_ref()
        .or(conflict.their.as_ref())
        .or(conflict.ancestor.as_ref())
        .map(|entry| String::from_utf8_lossy(&entry.path).into_owned())
}

/// Replace every conflicted path in a merge index with one side's entry
fn resolve_conflicts(index: &mut Index, theirs: &str, policy: ConflictPolicy) -> Result<(), GitError> {
    let conflicts = index.conflicts()?.collect::<Result<Vec<_>, _>>()?;
    if policy == ConflictPolicy::Fail {
        return Err(GitError::MergeConflict {
            theirs: theirs.to_string(),
            paths: conflicts.iter().filter_map(conflict_path).collect(),
        });
    }

    for conflict in conflicts {
        let path = conflict_path(&conflict)
            .ok_or_else(|| GitError::InvalidPath("conflict without entries".to_string()))?;
        let keep = match policy {
            ConflictPolicy::Ours => conflict.our,
            _ => conflict.their,
        };
        debug!(%path, ?policy, deleted = keep.is_none(), "resolving conflict");

        index.conflict_remove(Path::new(&path))?;
        if let Some(mut entry) = keep {
            entry.flags &= !STAGE_MASK;
            index.add(&entry)?;
        }
    }
    Ok(())
}

impl Backend for GitBackend {
    type Error = GitError;

    fn init(&mut self, default_branch: &str) -> Result<(), GitError> {
        let mut opts = RepositoryInitOptions::new();
        opts.initial_head(default_branch);
        opts.mkpath(true);
        let repo = Repository::init_opts(&self.workdir, &opts)?;
        info!(dir = %self.workdir.display(), default_branch, "initialized repository");
        self.repo = Some(repo);
        Ok(())
    }

    fn stage(&mut self, paths: &Pathspec) -> Result<(), GitError> {
        let repo = self.repo()?;
        let mut index = repo.index()?;
        match paths {
            Pathspec::All => {
                index.add_all(["*"], IndexAddOption::DEFAULT, None)?;
                // Pick up deletions too
                index.update_all(["*"], None)?;
            }
            Pathspec::File(file) => index.add_path(Path::new(file))?,
        }
        index.write()?;
        Ok(())
    }

    fn commit(&mut self, info: &CommitInfo) -> Result<String, GitError> {
        let repo = self.repo()?;
        let sig = Signature::now(&info.author, &info.email)?;
        let tree_oid = repo.index()?.write_tree()?;
        let tree = repo.find_tree(tree_oid)?;

        let parent = head_commit(repo)?;
        let parents: Vec<&Commit> = parent.iter().collect();
        let message = git_message(&info.message);
        let oid = repo.commit(Some("HEAD"), &sig, &sig, &message, &tree, &parents)?;
        Ok(oid.to_string())
    }

    fn create_branch(&mut self, name: &str) -> Result<(), GitError> {
        let repo = self.repo()?;
        let head = head_commit(repo)?.ok_or_else(|| {
            GitError::Unborn(format!("cannot create branch {} before the first commit", name))
        })?;
        repo.branch(name, &head, false)?;
        Ok(())
    }

    fn checkout(&mut self, reference: &str) -> Result<(), GitError> {
        let repo = self.repo()?;
        let mut opts = CheckoutBuilder::new();
        opts.force();

        if let Ok(branch) = repo.find_branch(reference, BranchType::Local) {
            let refname = branch
                .get()
                .name()
                .ok_or_else(|| GitError::InvalidPath(reference.to_string()))?
                .to_string();
            let commit = branch.get().peel_to_commit()?;
            repo.checkout_tree(commit.as_object(), Some(&mut opts))?;
            repo.set_head(&refname)?;
        } else {
            let commit = resolve_commit(repo, reference)?;
            repo.checkout_tree(commit.as_object(), Some(&mut opts))?;
            repo.set_head_detached(commit.id())?;
        }
        debug!(reference, "checked out");
        Ok(())
    }

    fn current_branch(&self) -> Result<Option<String>, GitError> {
        let repo = self.repo()?;
        match repo.head() {
            Ok(head) if head.is_branch() => Ok(head.shorthand().map(str::to_string)),
            Ok(_) => Ok(None),
            Err(e) if e.code() == ErrorCode::UnbornBranch => {
                let head = repo.find_reference("HEAD")?;
                Ok(head
                    .symbolic_target()
                    .and_then(|target| target.strip_prefix("refs/heads/"))
                    .map(str::to_string))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn merge(
        &mut self,
        theirs: &str,
        info: &CommitInfo,
        fast_forward: bool,
        policy: ConflictPolicy,
    ) -> Result<(), GitError> {
        let repo = self.repo()?;
        let ours = head_commit(repo)?.ok_or_else(|| {
            GitError::Unborn(format!("cannot merge {} before the first commit", theirs))
        })?;
        let their_commit = resolve_commit(repo, theirs)?;

        let annotated = repo.find_annotated_commit(their_commit.id())?;
        let (analysis, _) = repo.merge_analysis(&[&annotated])?;
        if analysis.is_up_to_date() {
            warn!(theirs, "already up to date, no merge commit created");
            return Ok(());
        }

        if fast_forward && analysis.is_fast_forward() {
            let mut head = repo.head()?;
            head.set_target(their_commit.id(), &format!("merge {}: Fast-forward", theirs))?;
            repo.checkout_head(Some(CheckoutBuilder::new().force()))?;
            debug!(theirs, "fast-forwarded");
            return Ok(());
        }

        let mut opts = MergeOptions::new();
        opts.file_favor(match policy {
            ConflictPolicy::Theirs => FileFavor::Theirs,
            ConflictPolicy::Ours => FileFavor::Ours,
            ConflictPolicy::Fail => FileFavor::Normal,
        });
        let mut index = repo.merge_commits(&ours, &their_commit, Some(&opts))?;
        if index.has_conflicts() {
            resolve_conflicts(&mut index, theirs, policy)?;
        }

        let tree_oid = index.write_tree_to(repo)?;
        let tree = repo.find_tree(tree_oid)?;
        let sig = Signature::now(&info.author, &info.email)?;
        let oid = repo.commit(
            Some("HEAD"),
            &sig,
            &sig,
            &git_message(&info.message),
            &tree,
            &[&ours, &their_commit],
        )?;
        debug!(theirs, %oid, "created merge commit");
        Ok(())
    }

    fn tag(&mut self, name: &str) -> Result<(), GitError> {
        let repo = self.repo()?;
        let target = head_object(repo, &format!("tag {}", name))?;
        repo.tag_lightweight(name, &target, false)?;
        Ok(())
    }

    fn annotated_tag(&mut self, name: &str, info: &CommitInfo) -> Result<(), GitError> {
        let repo = self.repo()?;
        let target = head_object(repo, &format!("tag {}", name))?;
        let tagger = Signature::now(&info.author, &info.email)?;
        repo.tag(name, &target, &tagger, &git_message(&info.message), false)?;
        Ok(())
    }

    fn write_file(&mut self, path: &str, content: &str) -> Result<(), GitError> {
        let full = self.worktree_path(path)?;
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&full, content)?;
        Ok(())
    }

    fn append_file(&mut self, path: &str, content: &str) -> Result<(), GitError> {
        let full = self.worktree_path(path)?;
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(&full)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}
