//! Git backend for gitgen
//!
//! This crate applies canonical commands to a real repository:
//! - [`GitBackend`]: libgit2 implementation of [`libgitgen_core::Backend`]
//! - [`generate_repo`]: pre-existence guard, normalization and execution

mod error;
mod generate;
mod repo;

pub use error::GitError;
pub use generate::{ensure_no_repository, generate_from_commands, generate_repo, GenerateReport};
pub use repo::GitBackend;
