//! Sequential command execution against a [`Backend`]

use tracing::{debug, info};

use crate::backend::{Backend, ConflictPolicy};
use crate::types::command::{Command, Pathspec};

/// Conflict policy used for every `merge` command
pub const MERGE_POLICY: ConflictPolicy = ConflictPolicy::Theirs;

/// Apply commands in order, stopping at the first backend error.
///
/// Already-applied commands are not rolled back.
pub fn execute<B: Backend>(backend: &mut B, commands: &[Command]) -> Result<(), B::Error> {
    for (i, command) in commands.iter().enumerate() {
        debug!(index = i, ?command, "executing command");
        apply(backend, command)?;
    }
    info!(count = commands.len(), "executed commands");
    Ok(())
}

fn apply<B: Backend>(backend: &mut B, command: &Command) -> Result<(), B::Error> {
    match command {
        Command::Init { default_branch } => backend.init(default_branch),
        Command::Commit(info) => {
            backend.stage(&Pathspec::All)?;
            let oid = backend.commit(info)?;
            debug!(%oid, message = %info.message, "committed");
            Ok(())
        }
        Command::Branch { name } => backend.create_branch(name),
        Command::Checkout { reference } => backend.checkout(reference),
        Command::Merge { theirs, info } => {
            let current = backend.current_branch()?;
            backend.merge(theirs, info, false, MERGE_POLICY)?;
            // Refresh the working tree from the merge commit
            backend.checkout(current.as_deref().unwrap_or("HEAD"))
        }
        Command::Tag(tag) => match &tag.annotation {
            Some(info) => backend.annotated_tag(&tag.name, info),
            None => backend.tag(&tag.name),
        },
        Command::CreateFile { file, content } | Command::ChangeContent { file, content } => {
            backend.write_file(file, content)
        }
        Command::Add(paths) => backend.stage(paths),
        Command::AppendContent { file, content, new_line } => {
            if *new_line {
                backend.append_file(file, &format!("\n{}", content))
            } else {
                backend.append_file(file, content)
            }
        }
    }
}
